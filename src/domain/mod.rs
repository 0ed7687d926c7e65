pub mod encoding;
pub mod errors;
pub mod models;
pub mod value_objects;

// Re-export commonly used types
pub use errors::{ConfigError, DownloadError, JobError, ProviderError};
pub use models::*;
pub use value_objects::*;
