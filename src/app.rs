use bon::Builder;
use std::sync::Arc;

use crate::{
    adapters::outbound::{
        http::HttpDownloader,
        memory::{InMemoryManagerFactory, InMemoryProvider},
        qiniu::QiniuManagerFactory,
    },
    domain::errors::{ConfigError, ConfigResult},
    ports::{ManagerFactory, ObjectDownloader},
    services::StorageFacade,
};

/// Environment variables read by [`FacadeConfig::from_env`]
pub const ENV_ACCESS_KEY: &str = "QINIU_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "QINIU_SECRET_KEY";
pub const ENV_DOMAIN: &str = "QINIU_DOMAIN";
pub const ENV_BUCKET: &str = "QINIU_BUCKET";
pub const ENV_SECURE: &str = "QINIU_SECURE";

/// Static per-instance configuration of a facade
#[derive(Clone, PartialEq, Eq, Builder)]
pub struct FacadeConfig {
    #[builder(into)]
    pub access_key: String,
    #[builder(into)]
    pub secret_key: String,
    /// Public domain objects are served from, e.g. `cdn.example.com`
    #[builder(into)]
    pub domain: String,
    /// Default bucket for uploads and processing jobs
    #[builder(into)]
    pub bucket: String,
    /// Serve public URLs over https
    #[builder(default)]
    pub secure: bool,
}

impl FacadeConfig {
    /// Fail on the first blank required field
    pub fn validate(&self) -> ConfigResult<()> {
        let required = [
            ("access key", &self.access_key),
            ("secret key", &self.secret_key),
            ("domain", &self.domain),
            ("bucket", &self.bucket),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField { field });
            }
        }
        Ok(())
    }

    /// Load and validate configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::MissingEnv { var });

        let secure = match lookup(ENV_SECURE) {
            None => false,
            Some(value) => match value.trim().to_lowercase().as_str() {
                "" | "false" | "0" => false,
                "true" | "1" => true,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "secure",
                        value,
                    })
                }
            },
        };

        let config = FacadeConfig {
            access_key: required(ENV_ACCESS_KEY)?,
            secret_key: required(ENV_SECRET_KEY)?,
            domain: required(ENV_DOMAIN)?,
            bucket: required(ENV_BUCKET)?,
            secure,
        };
        config.validate()?;
        Ok(config)
    }
}

impl std::fmt::Debug for FacadeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacadeConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("domain", &self.domain)
            .field("bucket", &self.bucket)
            .field("secure", &self.secure)
            .finish()
    }
}

/// Wires a [`StorageFacade`] from configuration and SDK collaborators
pub struct FacadeBuilder {
    config: FacadeConfig,
    downloader: Option<Arc<dyn ObjectDownloader>>,
}

impl FacadeBuilder {
    pub fn new(config: FacadeConfig) -> Self {
        Self {
            config,
            downloader: None,
        }
    }

    /// Replace the HTTP downloader used by batch downloads
    pub fn with_downloader(mut self, downloader: Arc<dyn ObjectDownloader>) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Validate the configuration and build every collaborator once
    pub fn build(self, factory: &dyn ManagerFactory) -> ConfigResult<StorageFacade> {
        let downloader = match self.downloader {
            Some(downloader) => downloader,
            None => Arc::new(HttpDownloader::new()),
        };
        StorageFacade::new(self.config, factory, downloader)
    }
}

/// Create a facade over the in-memory provider for development and testing.
///
/// The returned provider handle shares state with the facade.
pub fn create_in_memory_facade(
    config: FacadeConfig,
) -> ConfigResult<(StorageFacade, InMemoryProvider)> {
    let provider = InMemoryProvider::new();
    let factory = InMemoryManagerFactory::new(provider.clone());
    let facade = FacadeBuilder::new(config).build(&factory)?;
    Ok((facade, provider))
}

/// Create a facade from environment variables with the given SDK factory
pub fn create_facade_from_env(factory: &dyn ManagerFactory) -> ConfigResult<StorageFacade> {
    FacadeBuilder::new(FacadeConfig::from_env()?).build(factory)
}

/// Create a facade from environment variables talking to the provider's public hosts
pub fn create_qiniu_facade_from_env() -> ConfigResult<StorageFacade> {
    create_facade_from_env(&QiniuManagerFactory::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> FacadeConfig {
        FacadeConfig::builder()
            .access_key("ak")
            .secret_key("sk")
            .domain("cdn.example.com")
            .bucket("media")
            .build()
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_secure_defaults_to_false() {
        assert!(!config().secure);
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let mut cfg = config();
        cfg.secret_key = "  ".to_string();
        cfg.bucket = String::new();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MissingField {
                field: "secret key"
            })
        );

        let mut cfg = config();
        cfg.bucket = String::new();
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: bucket must be configured");
    }

    #[test]
    fn test_from_lookup() {
        let cfg = FacadeConfig::from_lookup(lookup(&[
            (ENV_ACCESS_KEY, "ak"),
            (ENV_SECRET_KEY, "sk"),
            (ENV_DOMAIN, "cdn.example.com"),
            (ENV_BUCKET, "media"),
            (ENV_SECURE, "TRUE"),
        ]))
        .unwrap();
        assert!(cfg.secure);
        assert_eq!(cfg.bucket, "media");
    }

    #[test]
    fn test_from_lookup_missing_and_invalid() {
        let err = FacadeConfig::from_lookup(lookup(&[(ENV_ACCESS_KEY, "ak")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnv { var: ENV_SECRET_KEY });

        let err = FacadeConfig::from_lookup(lookup(&[
            (ENV_ACCESS_KEY, "ak"),
            (ENV_SECRET_KEY, "sk"),
            (ENV_DOMAIN, "d"),
            (ENV_BUCKET, "b"),
            (ENV_SECURE, "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "secure", .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let printed = format!("{:?}", config());
        assert!(!printed.contains("\"sk\""));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut cfg = config();
        cfg.domain = String::new();
        let result = create_in_memory_facade(cfg);
        assert!(matches!(
            result,
            Err(ConfigError::MissingField { field: "domain" })
        ));
    }

    #[test]
    fn test_create_in_memory_facade() {
        let (facade, _provider) = create_in_memory_facade(config()).unwrap();
        assert_eq!(facade.bucket(), "media");
        assert_eq!(facade.public_url("a.png"), "http://cdn.example.com/a.png");
    }
}
