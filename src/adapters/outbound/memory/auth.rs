use serde_json::Value;

use crate::{
    domain::{
        encoding::{urlsafe_base64, urlsafe_base64_decode},
        models::{deadline_after, Credentials, PutPolicy},
    },
    ports::Auth,
};

/// Credential holder of the in-memory provider.
///
/// Tokens are `access_key:digest:encoded_policy` where the digest is a keyed
/// md5. They only need to be understood by the in-memory managers.
#[derive(Clone, Debug)]
pub struct InMemoryAuth {
    credentials: Credentials,
}

impl InMemoryAuth {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    fn digest(&self, data: &str) -> String {
        let keyed = format!("{}{}", self.credentials.secret_key, data);
        format!("{:x}", md5::compute(keyed.as_bytes()))
    }
}

impl Auth for InMemoryAuth {
    fn access_key(&self) -> &str {
        &self.credentials.access_key
    }

    fn upload_token(
        &self,
        bucket: &str,
        key: Option<&str>,
        expires: u64,
        policy: Option<&PutPolicy>,
        strict_policy: bool,
    ) -> String {
        let scope = match key {
            Some(key) => format!("{}:{}", bucket, key),
            None => bucket.to_string(),
        };
        let document = policy
            .cloned()
            .unwrap_or_default()
            .to_document(&scope, deadline_after(expires), strict_policy);
        let encoded = urlsafe_base64(document.to_string());
        format!(
            "{}:{}:{}",
            self.credentials.access_key,
            self.digest(&encoded),
            encoded
        )
    }

    fn private_download_url(&self, base_url: &str, expires: u64) -> String {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}e={}", base_url, separator, deadline_after(expires));
        let token = format!("{}:{}", self.credentials.access_key, self.digest(&url));
        format!("{}&token={}", url, token)
    }

    fn authorization(&self, path_and_query: &str, form_body: Option<&[u8]>) -> String {
        let mut data = format!("{}\n", path_and_query);
        if let Some(body) = form_body {
            data.push_str(&String::from_utf8_lossy(body));
        }
        format!("QBox {}:{}", self.credentials.access_key, self.digest(&data))
    }
}

/// Policy fields an upload manager reads back out of a token
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TokenPolicy {
    pub bucket: String,
    pub key: Option<String>,
    pub deadline: u64,
    pub insert_only: bool,
}

/// Decode an upload token produced by [`InMemoryAuth`]
pub(crate) fn decode_token(token: &str) -> Option<TokenPolicy> {
    let encoded = token.rsplit(':').next()?;
    let raw = urlsafe_base64_decode(encoded).ok()?;
    let document: Value = serde_json::from_slice(&raw).ok()?;

    let scope = document.get("scope")?.as_str()?;
    let (bucket, key) = match scope.split_once(':') {
        Some((bucket, key)) => (bucket.to_string(), Some(key.to_string())),
        None => (scope.to_string(), None),
    };

    Some(TokenPolicy {
        bucket,
        key,
        deadline: document.get("deadline")?.as_u64()?,
        insert_only: document
            .get("insertOnly")
            .and_then(Value::as_u64)
            .map_or(false, |v| v != 0),
    })
}
