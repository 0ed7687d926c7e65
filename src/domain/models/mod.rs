mod batch;
mod credentials;
mod envelope;
mod job;
mod object;
mod policy;

pub use batch::{BatchItemResult, BatchOperation};
pub use credentials::Credentials;
pub use envelope::{Envelope, UploadResult, CODE_SUCCESS, MESSAGE_SUCCESS};
pub use job::{JobItem, JobState, JobStatus, ProcessingJob};
pub use object::{FetchResult, FileInfo, ListFilesResult, ListItem, ListOptions, PutRet};
pub use policy::{deadline_after, PutPolicy};
