mod file_type;
mod gravity;
mod job_id;

pub use file_type::{FileStatus, FileType};
pub use gravity::Gravity;
pub use job_id::JobId;
