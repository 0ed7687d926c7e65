//! Image processing URL suffixes (`imageView2`, `watermark`).
//!
//! These are pure string builders. Invalid input leaves the URL unchanged,
//! so callers can always use the returned URL.

use bon::Builder;
use reqwest::Url;
use tracing::debug;

use crate::domain::{encoding::urlsafe_base64, value_objects::Gravity};

/// Output formats accepted by `imageView2`
pub const THUMBNAIL_FORMATS: [&str; 7] = ["psd", "jpeg", "png", "gif", "webp", "tiff", "bmp"];

/// Highest `imageView2` mode
pub const MAX_THUMBNAIL_MODE: u8 = 5;

/// Thumbnail parameters
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Thumbnail {
    /// Scaling mode, 0 to 5
    pub mode: u8,
    pub width: u32,
    pub height: u32,
    #[builder(into)]
    pub format: Option<String>,
    /// 1 enables progressive rendering
    pub interlace: Option<u8>,
    pub quality: Option<u8>,
    #[builder(default = 1)]
    pub ignore_error: u8,
}

/// Image watermark parameters
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ImageWatermark {
    /// URL of the watermark image
    #[builder(into)]
    pub image: String,
    /// Opacity, 0 to 100
    #[builder(default = 100)]
    pub dissolve: u8,
    #[builder(default)]
    pub gravity: Gravity,
    pub dx: Option<i32>,
    pub dy: Option<i32>,
    /// Watermark size relative to the short edge of the source, in (0, 1)
    pub scale: Option<f64>,
}

/// Text watermark parameters
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct TextWatermark {
    #[builder(into)]
    pub text: String,
    #[builder(into, default = "黑体".to_string())]
    pub font: String,
    #[builder(default)]
    pub font_size: u32,
    #[builder(into)]
    pub font_color: Option<String>,
    #[builder(default = 100)]
    pub dissolve: u8,
    #[builder(default)]
    pub gravity: Gravity,
    pub dx: Option<i32>,
    pub dy: Option<i32>,
}

/// An http(s) URL with a host and a path. The path is checked on the raw
/// input because parsing normalizes `http://host` to `http://host/`.
fn is_http_url(url: &str) -> bool {
    let parsed_ok = match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    };
    parsed_ok && has_path(url)
}

fn has_path(url: &str) -> bool {
    url.split_once("://")
        .and_then(|(_, rest)| rest.find(&['/', '?', '#'][..]).map(|idx| &rest[idx..]))
        .map_or(false, |tail| tail.starts_with('/'))
}

/// Attach a processing stage, chaining with `|` when a query already exists
fn append_stage(url: &str, stage: &str) -> String {
    let has_query = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.query().map(|q| !q.is_empty()))
        .unwrap_or(false);
    format!("{}{}{}", url, if has_query { '|' } else { '?' }, stage)
}

fn push_position(stage: &mut String, dissolve: u8, gravity: Gravity, dx: Option<i32>, dy: Option<i32>) {
    if dissolve <= 100 {
        stage.push_str(&format!("dissolve/{}/", dissolve));
    }
    stage.push_str(&format!("gravity/{}/", gravity));
    if let Some(dx) = dx {
        stage.push_str(&format!("dx/{}/", dx));
    }
    if let Some(dy) = dy {
        stage.push_str(&format!("dy/{}/", dy));
    }
}

/// Append an `imageView2` thumbnail stage to `url`
pub fn thumbnail(url: &str, params: &Thumbnail) -> String {
    if !is_http_url(url) {
        debug!(url, "not an http url, thumbnail skipped");
        return url.to_string();
    }
    if params.mode > MAX_THUMBNAIL_MODE || params.width == 0 || params.height == 0 {
        debug!(url, mode = params.mode, "invalid thumbnail geometry, skipped");
        return url.to_string();
    }

    let mut stage = format!(
        "imageView2/{}/w/{}/h/{}/",
        params.mode, params.width, params.height
    );
    if let Some(format) = params
        .format
        .as_deref()
        .filter(|f| THUMBNAIL_FORMATS.contains(f))
    {
        stage.push_str(&format!("format/{}/", format));
    }
    if let Some(interlace) = params.interlace.filter(|i| *i <= 1) {
        stage.push_str(&format!("interlace/{}/", interlace));
    }
    if let Some(quality) = params.quality.filter(|q| *q <= 100) {
        stage.push_str(&format!("q/{}/", quality));
    }
    stage.push_str(&format!("ignore-error/{}/", params.ignore_error));

    append_stage(url, &stage)
}

/// Append an image watermark stage to `url`
pub fn water_img(url: &str, params: &ImageWatermark) -> String {
    if !is_http_url(url) {
        debug!(url, "not an http url, watermark skipped");
        return url.to_string();
    }

    let mut stage = format!("watermark/1/image/{}/", urlsafe_base64(&params.image));
    push_position(&mut stage, params.dissolve, params.gravity, params.dx, params.dy);
    if let Some(scale) = params.scale.filter(|s| *s > 0.0 && *s < 1.0) {
        stage.push_str(&format!("ws/{}/", scale));
    }

    append_stage(url, &stage)
}

/// Append a text watermark stage to `url`
pub fn water_text(url: &str, params: &TextWatermark) -> String {
    if !is_http_url(url) {
        debug!(url, "not an http url, watermark skipped");
        return url.to_string();
    }

    let mut stage = format!(
        "watermark/2/text/{}/font/{}/fontsize/{}/",
        urlsafe_base64(&params.text),
        urlsafe_base64(&params.font),
        params.font_size
    );
    if let Some(color) = params.font_color.as_deref().filter(|c| !c.is_empty()) {
        stage.push_str(&format!("fill/{}/", urlsafe_base64(color)));
    }
    push_position(&mut stage, params.dissolve, params.gravity, params.dx, params.dy);

    append_stage(url, &stage)
}
