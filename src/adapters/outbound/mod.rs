// Infrastructure implementations of the SDK ports
pub mod http;
pub mod memory;
pub mod qiniu;

#[cfg(test)]
pub(crate) mod test_server;

pub use http::HttpDownloader;
pub use memory::{InMemoryAuth, InMemoryManagerFactory, InMemoryProvider};
pub use qiniu::{QiniuAuth, QiniuEndpoints, QiniuManagerFactory};
