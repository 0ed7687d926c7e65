//! Provider adapter talking to the Qiniu REST API.
//!
//! Management calls are signed with the account's `Auth` and sent with
//! reqwest. Uploads use the multipart form endpoint.

mod auth;
mod bucket;
mod client;
mod factory;
mod fop;
mod upload;

pub use auth::QiniuAuth;
pub use bucket::QiniuBucketManager;
pub use client::{QiniuEndpoints, NETWORK_ERROR};
pub use factory::QiniuManagerFactory;
pub use fop::QiniuFop;
pub use upload::QiniuUploadManager;
