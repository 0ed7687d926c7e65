mod config_errors;
mod download_errors;
mod job_errors;
mod provider_errors;

pub use config_errors::*;
pub use download_errors::*;
pub use job_errors::*;
pub use provider_errors::*;
