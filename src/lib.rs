pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - response shapes, provider models and value objects
pub use domain::{
    BatchItemResult,
    BatchOperation,
    // Errors
    ConfigError,
    Credentials,
    DownloadError,
    // Models
    Envelope,
    FetchResult,
    FileInfo,
    // Value objects
    FileStatus,
    FileType,
    Gravity,
    JobError,
    JobId,
    JobState,
    JobStatus,
    ListFilesResult,
    ListOptions,
    ProcessingJob,
    ProviderError,
    PutPolicy,
    PutRet,
    UploadResult,
};

// Port types - interfaces to the provider SDK
pub use ports::{Auth, BucketManager, ManagerFactory, ObjectDownloader, PersistentFop, UploadManager};

// Services - the facade and its command builders
pub use services::{
    AudioEncode, FopCommand, ImageWatermark, PollPolicy, ResponseNormalizer, StorageFacade,
    TextWatermark, Thumbnail, VideoEncode, VideoImageWatermark, VideoMute, VideoTextWatermark,
    DEFAULT_EXPIRES,
};

// Application factory and configuration
pub use app::{
    create_facade_from_env, create_in_memory_facade, create_qiniu_facade_from_env, FacadeBuilder,
    FacadeConfig,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    HttpDownloader, InMemoryManagerFactory, InMemoryProvider, QiniuEndpoints, QiniuManagerFactory,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_facade_from_env, create_in_memory_facade, create_qiniu_facade_from_env, AudioEncode,
        BatchOperation, Envelope, FacadeBuilder, FacadeConfig, Gravity, InMemoryManagerFactory,
        InMemoryProvider, JobError, JobState, ListOptions, ManagerFactory, PollPolicy,
        ProviderError, QiniuManagerFactory, StorageFacade, UploadResult, VideoEncode,
    };
}
