use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use std::path::Path;
use tracing::debug;

use super::client::{checked, decode, transport_error, NETWORK_ERROR};
use crate::{
    domain::{
        errors::{ProviderError, ProviderResult},
        models::PutRet,
    },
    ports::UploadManager,
};

/// Form uploads to the region's upload host
#[derive(Clone)]
pub struct QiniuUploadManager {
    http: Client,
    host: String,
}

impl QiniuUploadManager {
    pub fn new(http: Client, host: impl Into<String>) -> Self {
        Self {
            http,
            host: host.into(),
        }
    }
}

#[async_trait]
impl UploadManager for QiniuUploadManager {
    async fn put(&self, token: &str, key: &str, data: Bytes) -> ProviderResult<PutRet> {
        debug!(key, size = data.len(), "form upload");
        let form = Form::new()
            .text("token", token.to_string())
            .text("key", key.to_string())
            .part("file", Part::bytes(data.to_vec()).file_name(key.to_string()));

        let response = self
            .http
            .post(format!("{}/", self.host.trim_end_matches('/')))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        decode(checked(response).await?).await
    }

    async fn put_file(&self, token: &str, key: &str, path: &Path) -> ProviderResult<PutRet> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            ProviderError::new(
                NETWORK_ERROR,
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;
        self.put(token, key, Bytes::from(data)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::{qiniu::client::http_client, test_server::OneShotServer};
    use std::io::Write;

    #[tokio::test]
    async fn test_put_sends_multipart_form() {
        let server = OneShotServer::respond(200, r#"{"hash":"FhQ","key":"a.txt"}"#).await;
        let manager = QiniuUploadManager::new(http_client(), server.base_url.clone());

        let ret = manager
            .put("ak:sig:policy", "a.txt", Bytes::from_static(b"hello"))
            .await
            .unwrap();
        assert_eq!(ret.key, "a.txt");
        assert_eq!(ret.hash, "FhQ");

        let request = server.request().await;
        assert_eq!(request.method, "POST");
        assert_eq!(request.target, "/");
        assert!(request
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data"));
        let body = request.body_text();
        assert!(body.contains("name=\"token\""));
        assert!(body.contains("ak:sig:policy"));
        assert!(body.contains("filename=\"a.txt\""));
        assert!(body.contains("hello"));
    }

    #[tokio::test]
    async fn test_put_file_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from disk").unwrap();

        let server = OneShotServer::respond(614, r#"{"error":"file exists"}"#).await;
        let manager = QiniuUploadManager::new(http_client(), server.base_url.clone());
        let err = manager.put_file("t", "b.txt", file.path()).await.unwrap_err();
        assert_eq!(err.code(), 614);
        assert!(server.request().await.body_text().contains("from disk"));

        let err = manager
            .put_file("t", "c.txt", Path::new("/definitely/not/here"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), NETWORK_ERROR);
    }
}
