//! Persistent processing command strings.
//!
//! A command is an operation name followed by `/`-separated parameter/value
//! pairs in a fixed order. Stages are chained with `|`. Free text and URLs
//! are base64url-encoded before interpolation because `/` is the field
//! delimiter.

use bon::Builder;

use crate::domain::{
    encoding::{encoded_entry, urlsafe_base64},
    value_objects::Gravity,
};

/// Anything that renders to a processing command
pub trait FopCommand {
    fn to_fops(&self) -> String;
}

/// Audio transcode: `avthumb/<format>/ab/<bitrate>/aq/<quality>/ar/<samplerate>`.
///
/// Empty parameters are interpolated as-is.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct AudioEncode {
    /// Target container/format, e.g. `mp3`
    #[builder(into)]
    pub format: String,
    /// Bit rate such as `128k`
    #[builder(into, default)]
    pub bit_rate: String,
    /// 0-9 for mp3, 10-500 for aac
    #[builder(into, default)]
    pub audio_quality: String,
    /// Sampling rate in Hz, e.g. `44100`
    #[builder(into, default)]
    pub sampling_rate: String,
}

impl FopCommand for AudioEncode {
    fn to_fops(&self) -> String {
        format!(
            "avthumb/{}/ab/{}/aq/{}/ar/{}",
            self.format, self.bit_rate, self.audio_quality, self.sampling_rate
        )
    }
}

/// Video transcode with trimming, scaling and rotation
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct VideoEncode {
    #[builder(into)]
    pub format: String,
    #[builder(into)]
    pub frame_rate: String,
    #[builder(into)]
    pub bit_rate: String,
    #[builder(into)]
    pub video_codec: String,
    #[builder(into)]
    pub audio_codec: String,
    /// Trim start in seconds, millisecond precision
    #[builder(into, default = "0".to_string())]
    pub start: String,
    #[builder(into)]
    pub duration: String,
    /// `<width>x<height>`
    #[builder(into)]
    pub resolution: String,
    /// 90, 180, 270 or auto
    #[builder(into)]
    pub rotate: String,
}

impl FopCommand for VideoEncode {
    fn to_fops(&self) -> String {
        format!(
            "avthumb/{}/r/{}/vb/{}/vcodec/{}/acodec/{}/ss/{}/t/{}/s/{}/rotate/{}",
            self.format,
            self.frame_rate,
            self.bit_rate,
            self.video_codec,
            self.audio_codec,
            self.start,
            self.duration,
            self.resolution,
            self.rotate
        )
    }
}

/// Strip the audio track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoMute;

impl FopCommand for VideoMute {
    fn to_fops(&self) -> String {
        "avthumb/an/1".to_string()
    }
}

/// Overlay an image on an mp4 video
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct VideoImageWatermark {
    #[builder(into)]
    pub watermark_url: String,
    #[builder(default)]
    pub gravity: Gravity,
    #[builder(default)]
    pub offset_x: i32,
    #[builder(default)]
    pub offset_y: i32,
}

impl FopCommand for VideoImageWatermark {
    fn to_fops(&self) -> String {
        format!(
            "avthumb/mp4/wmImage/{}/wmGravity/{}/wmOffsetX/{}/wmOffsetY/{}",
            urlsafe_base64(&self.watermark_url),
            self.gravity,
            self.offset_x,
            self.offset_y
        )
    }
}

/// Overlay text on an mp4 video
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct VideoTextWatermark {
    #[builder(into, default)]
    pub text: String,
    #[builder(default)]
    pub gravity: Gravity,
    /// Chinese text needs a Chinese font
    #[builder(into, default = "黑体".to_string())]
    pub font: String,
    /// Color name or `#RRGGBB`
    #[builder(into, default = "black".to_string())]
    pub font_color: String,
    /// In twips (1/20 pt); 0 selects the default size
    #[builder(default)]
    pub font_size: u32,
    #[builder(default)]
    pub offset_x: i32,
    #[builder(default)]
    pub offset_y: i32,
}

impl FopCommand for VideoTextWatermark {
    fn to_fops(&self) -> String {
        format!(
            "avthumb/mp4/wmText/{}/wmGravityText/{}/wmOffsetX/{}/wmOffsetY/{}/wmFont/{}/wmFontColor/{}/wmFontSize/{}",
            urlsafe_base64(&self.text),
            self.gravity,
            self.offset_x,
            self.offset_y,
            urlsafe_base64(&self.font),
            urlsafe_base64(&self.font_color),
            self.font_size
        )
    }
}

/// `saveas` stage redirecting output to `bucket:key`
pub fn save_as(bucket: &str, key: &str) -> String {
    format!("saveas/{}", encoded_entry(bucket, key))
}

/// Join stages into a single pipe-separated command
pub fn chain<I, S>(stages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    stages
        .into_iter()
        .map(|stage| stage.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// Render `command` and send its output to `bucket:new_key`
pub fn saved_to(command: &impl FopCommand, bucket: &str, new_key: &str) -> String {
    chain([command.to_fops(), save_as(bucket, new_key)])
}
