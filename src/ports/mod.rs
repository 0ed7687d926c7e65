pub mod auth;
pub mod download;
pub mod managers;
pub mod processing;

// Re-export all port traits for convenience
pub use auth::Auth;
pub use download::ObjectDownloader;
pub use managers::{BucketManager, ManagerFactory, UploadManager};
pub use processing::PersistentFop;
