use tracing::warn;

use crate::domain::{
    errors::ProviderResult,
    models::{Envelope, PutRet, UploadResult},
};

/// Reshapes manager results into [`Envelope`]s.
///
/// Holds the public domain and scheme used to build object URLs. No retry
/// happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseNormalizer {
    domain: String,
    secure: bool,
}

impl ResponseNormalizer {
    pub fn new(domain: impl Into<String>, secure: bool) -> Self {
        Self {
            domain: domain.into(),
            secure,
        }
    }

    /// Public URL of an object: `scheme://domain/file_name`, trailing
    /// slashes of the domain removed
    pub fn public_url(&self, file_name: &str) -> String {
        format!(
            "{}{}/{}",
            if self.secure { "https://" } else { "http://" },
            self.domain.trim_end_matches('/'),
            file_name
        )
    }

    /// Normalize an upload outcome; `result` is present on both paths
    pub fn upload(&self, outcome: ProviderResult<PutRet>, file_name: &str) -> Envelope<UploadResult> {
        match outcome {
            Ok(ret) => Envelope::ok(UploadResult {
                hash: ret.hash,
                key: ret.key,
                url: self.public_url(file_name),
            }),
            Err(err) => {
                warn!(code = err.code(), error = err.message(), file_name, "upload failed");
                Envelope::from_error(&err).with_result(UploadResult::empty())
            }
        }
    }

    /// Normalize an outcome without payload; `result` is never present
    pub fn unit(&self, outcome: ProviderResult<()>) -> Envelope<()> {
        match outcome {
            Ok(()) => Envelope::ok_empty(),
            Err(err) => {
                warn!(code = err.code(), error = err.message(), "operation failed");
                Envelope::from_error(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ProviderError;

    fn put_ret() -> PutRet {
        PutRet {
            hash: "FhQ".to_string(),
            key: "avatar.png".to_string(),
        }
    }

    #[test]
    fn test_public_url_scheme_follows_secure_flag() {
        let plain = ResponseNormalizer::new("cdn.example.com", false);
        let secure = ResponseNormalizer::new("cdn.example.com", true);
        assert_eq!(plain.public_url("a.png"), "http://cdn.example.com/a.png");
        assert_eq!(secure.public_url("a.png"), "https://cdn.example.com/a.png");
    }

    #[test]
    fn test_public_url_trims_trailing_slashes() {
        let normalizer = ResponseNormalizer::new("cdn.example.com//", true);
        assert_eq!(
            normalizer.public_url("dir/a.png"),
            "https://cdn.example.com/dir/a.png"
        );
    }

    #[test]
    fn test_upload_success() {
        let normalizer = ResponseNormalizer::new("cdn.example.com/", false);
        let envelope = normalizer.upload(Ok(put_ret()), "avatar.png");
        assert_eq!(envelope.code, 0);
        assert_eq!(envelope.message, "ok");
        assert_eq!(
            envelope.result,
            Some(UploadResult {
                hash: "FhQ".to_string(),
                key: "avatar.png".to_string(),
                url: "http://cdn.example.com/avatar.png".to_string(),
            })
        );
    }

    #[test]
    fn test_upload_failure_keeps_empty_fields() {
        let normalizer = ResponseNormalizer::new("cdn.example.com", false);
        let envelope = normalizer.upload(Err(ProviderError::new(631, "no such bucket")), "a");
        assert_eq!(envelope.code, 631);
        assert_eq!(envelope.message, "no such bucket");
        assert_eq!(envelope.result, Some(UploadResult::empty()));
    }

    #[test]
    fn test_unit_envelopes() {
        let normalizer = ResponseNormalizer::new("d", false);
        let ok = normalizer.unit(Ok(()));
        assert_eq!(ok, Envelope::ok_empty());

        let failed = normalizer.unit(Err(ProviderError::new(612, "no such file or directory")));
        assert_eq!(failed.code, 612);
        assert!(failed.result.is_none());
    }
}
