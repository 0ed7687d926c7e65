use std::io;
use thiserror::Error;

/// Errors raised while saving signed downloads to disk
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error fetching {url}: {message}")]
    Http { url: String, message: String },
}
