pub mod facade;
pub mod fops;
pub mod image_url;
pub mod job_poller;
pub mod normalizer;

pub use facade::{StorageFacade, DEFAULT_EXPIRES};
pub use fops::{
    AudioEncode, FopCommand, VideoEncode, VideoImageWatermark, VideoMute, VideoTextWatermark,
};
pub use image_url::{ImageWatermark, TextWatermark, Thumbnail};
pub use job_poller::PollPolicy;
pub use normalizer::ResponseNormalizer;
