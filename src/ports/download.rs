use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::DownloadError;

/// Port for fetching the body behind a signed download URL
#[async_trait]
pub trait ObjectDownloader: Send + Sync + 'static {
    async fn download(&self, url: &str) -> Result<Bytes, DownloadError>;
}
