use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;

use crate::{domain::errors::DownloadError, ports::ObjectDownloader};

/// Downloads signed URLs over HTTP
#[derive(Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Use a preconfigured client (proxies, custom timeouts)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectDownloader for HttpDownloader {
    async fn download(&self, url: &str) -> Result<Bytes, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::Http {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Http {
                url: url.to_string(),
                message: format!("unexpected status {}", status),
            });
        }

        response.bytes().await.map_err(|e| DownloadError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
