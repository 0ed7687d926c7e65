use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::{
    domain::{
        encoding::urlsafe_base64,
        models::{deadline_after, Credentials, PutPolicy},
    },
    ports::Auth,
};

type HmacSha1 = Hmac<Sha1>;

/// Signs tokens, private URLs and management requests with HMAC-SHA1
#[derive(Clone, Debug)]
pub struct QiniuAuth {
    credentials: Credentials,
}

impl QiniuAuth {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// URL-safe base64 of the keyed digest of `data`
    fn sign(&self, data: &[u8]) -> String {
        HmacSha1::new_from_slice(self.credentials.secret_key.as_bytes())
            .map(|mut mac| {
                mac.update(data);
                urlsafe_base64(mac.finalize().into_bytes())
            })
            .unwrap_or_default()
    }

    fn token(&self, data: &[u8]) -> String {
        format!("{}:{}", self.credentials.access_key, self.sign(data))
    }
}

impl Auth for QiniuAuth {
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
        format!("{}:{}", self.token(encoded.as_bytes()), encoded)
    }

    fn private_download_url(&self, base_url: &str, expires: u64) -> String {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}e={}", base_url, separator, deadline_after(expires));
        let token = self.token(url.as_bytes());
        format!("{}&token={}", url, token)
    }

    fn authorization(&self, path_and_query: &str, form_body: Option<&[u8]>) -> String {
        let mut data = format!("{}\n", path_and_query).into_bytes();
        if let Some(body) = form_body {
            data.extend_from_slice(body);
        }
        format!("QBox {}", self.token(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::encoding::urlsafe_base64_decode;
    use serde_json::Value;

    fn auth() -> QiniuAuth {
        QiniuAuth::new(Credentials::new("ak", "sk"))
    }

    #[test]
    fn test_sign_matches_reference_digest() {
        let auth = QiniuAuth::new(Credentials::new("ak", "key"));
        assert_eq!(
            auth.sign(b"The quick brown fox jumps over the lazy dog"),
            "3nybhbi3iqa8ino29wqQcBydtNk="
        );
    }

    #[test]
    fn test_management_authorization() {
        assert_eq!(
            auth().authorization("/stat/abc", None),
            "QBox ak:nEPrJVt3mJoe-S1nmUuHXK0UKh4="
        );
        assert_eq!(
            auth().authorization("/batch", Some(b"op=%2Fstat%2Fx")),
            "QBox ak:_maxKCdVlEj6HNKopv1PEjURUk0="
        );
    }

    #[test]
    fn test_upload_token_layout() {
        let token = auth().upload_token("media", Some("a.txt"), 3600, None, true);
        let parts: Vec<&str> = token.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ak");
        assert_eq!(parts[1], auth().sign(parts[2].as_bytes()));

        let policy: Value =
            serde_json::from_slice(&urlsafe_base64_decode(parts[2]).unwrap()).unwrap();
        assert_eq!(policy["scope"], "media:a.txt");
        assert!(policy["deadline"].as_u64().unwrap() > chrono::Utc::now().timestamp() as u64);
    }

    #[test]
    fn test_private_download_url_signs_deadline() {
        let signed = auth().private_download_url("http://cdn.example.com/a.pdf", 60);
        let (url, token) = signed.split_once("&token=").unwrap();
        assert!(url.starts_with("http://cdn.example.com/a.pdf?e="));
        assert_eq!(token, format!("ak:{}", auth().sign(url.as_bytes())));

        let with_query = auth().private_download_url("http://cdn.example.com/a.jpg?imageView2/1", 60);
        assert!(with_query.starts_with("http://cdn.example.com/a.jpg?imageView2/1&e="));
    }
}
