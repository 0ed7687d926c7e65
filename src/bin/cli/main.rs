use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use qiniu_facade::{
    create_qiniu_facade_from_env,
    services::{fops::saved_to, image_url},
    AudioEncode, FacadeConfig, FopCommand, Gravity, ImageWatermark, JobId, ListOptions,
    StorageFacade, TextWatermark, Thumbnail, VideoEncode, VideoImageWatermark, VideoMute,
    VideoTextWatermark,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "qiniu-facade-cli")]
#[command(about = "Build processing commands and check facade configuration", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render persistent processing commands
    Fops {
        #[command(subcommand)]
        command: FopsCommands,
    },

    /// Build image processing URLs
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// Inspect configuration loaded from the environment
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Call the provider with the configured credentials
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },
}

/// Optional `saveas` target appended to a command
#[derive(Args, Debug)]
struct SaveAs {
    /// Bucket receiving the output (requires --save-key)
    #[arg(long, requires = "save_key")]
    save_bucket: Option<String>,

    /// Key the output is saved under
    #[arg(long, requires = "save_bucket")]
    save_key: Option<String>,
}

impl SaveAs {
    fn render(&self, command: &impl FopCommand) -> String {
        match (&self.save_bucket, &self.save_key) {
            (Some(bucket), Some(key)) => saved_to(command, bucket, key),
            _ => command.to_fops(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum FopsCommands {
    /// Audio transcode
    Audio {
        format: String,
        #[arg(long, default_value = "")]
        bit_rate: String,
        #[arg(long, default_value = "")]
        audio_quality: String,
        #[arg(long, default_value = "")]
        sampling_rate: String,
        #[command(flatten)]
        save: SaveAs,
    },

    /// Video transcode
    Video {
        format: String,
        #[arg(long)]
        frame_rate: String,
        #[arg(long)]
        bit_rate: String,
        #[arg(long)]
        video_codec: String,
        #[arg(long)]
        audio_codec: String,
        #[arg(long, default_value = "0")]
        start: String,
        #[arg(long)]
        duration: String,
        #[arg(long)]
        resolution: String,
        #[arg(long)]
        rotate: String,
        #[command(flatten)]
        save: SaveAs,
    },

    /// Strip the audio track
    Mute {
        #[command(flatten)]
        save: SaveAs,
    },

    /// Image watermark on a video
    WaterVideo {
        watermark_url: String,
        #[arg(long, default_value_t = Gravity::default())]
        gravity: Gravity,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset_x: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset_y: i32,
        #[command(flatten)]
        save: SaveAs,
    },

    /// Text watermark on a video
    WaterText {
        text: String,
        #[arg(long, default_value_t = Gravity::default())]
        gravity: Gravity,
        #[arg(long, default_value = "黑体")]
        font: String,
        #[arg(long, default_value = "black")]
        font_color: String,
        #[arg(long, default_value_t = 0)]
        font_size: u32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset_x: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset_y: i32,
        #[command(flatten)]
        save: SaveAs,
    },
}

#[derive(Subcommand, Debug)]
enum ImageCommands {
    /// Append an imageView2 thumbnail stage
    Thumbnail {
        url: String,
        #[arg(long, default_value_t = 1)]
        mode: u8,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        interlace: Option<u8>,
        #[arg(long)]
        quality: Option<u8>,
    },

    /// Append an image watermark stage
    WaterImg {
        url: String,
        /// URL of the watermark image
        #[arg(long)]
        image: String,
        #[arg(long, default_value_t = 100)]
        dissolve: u8,
        #[arg(long, default_value_t = Gravity::default())]
        gravity: Gravity,
        #[arg(long, allow_negative_numbers = true)]
        dx: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        dy: Option<i32>,
        #[arg(long)]
        scale: Option<f64>,
    },

    /// Append a text watermark stage
    WaterText {
        url: String,
        #[arg(long)]
        text: String,
        #[arg(long, default_value = "黑体")]
        font: String,
        #[arg(long, default_value_t = 0)]
        font_size: u32,
        #[arg(long)]
        font_color: Option<String>,
        #[arg(long, default_value_t = 100)]
        dissolve: u8,
        #[arg(long, default_value_t = Gravity::default())]
        gravity: Gravity,
        #[arg(long, allow_negative_numbers = true)]
        dx: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        dy: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate the QINIU_* variables
    Check,
}

#[derive(Subcommand, Debug)]
enum RemoteCommands {
    /// Upload a local file into the configured bucket
    Put {
        path: PathBuf,
        /// Key to store under (defaults to the file name)
        #[arg(long)]
        key: Option<String>,
    },

    /// Show object metadata
    Stat {
        key: String,
        /// Bucket (defaults to the configured bucket)
        #[arg(long)]
        bucket: Option<String>,
    },

    /// List one page of objects
    List {
        #[arg(long)]
        bucket: Option<String>,
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long)]
        marker: Option<String>,
        #[arg(long)]
        delimiter: Option<String>,
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// Delete an object
    Delete {
        key: String,
        #[arg(long)]
        bucket: Option<String>,
    },

    /// Query a processing job
    Job { id: String },
}

fn render_fops(command: FopsCommands) -> String {
    match command {
        FopsCommands::Audio {
            format,
            bit_rate,
            audio_quality,
            sampling_rate,
            save,
        } => save.render(
            &AudioEncode::builder()
                .format(format)
                .bit_rate(bit_rate)
                .audio_quality(audio_quality)
                .sampling_rate(sampling_rate)
                .build(),
        ),
        FopsCommands::Video {
            format,
            frame_rate,
            bit_rate,
            video_codec,
            audio_codec,
            start,
            duration,
            resolution,
            rotate,
            save,
        } => save.render(
            &VideoEncode::builder()
                .format(format)
                .frame_rate(frame_rate)
                .bit_rate(bit_rate)
                .video_codec(video_codec)
                .audio_codec(audio_codec)
                .start(start)
                .duration(duration)
                .resolution(resolution)
                .rotate(rotate)
                .build(),
        ),
        FopsCommands::Mute { save } => save.render(&VideoMute),
        FopsCommands::WaterVideo {
            watermark_url,
            gravity,
            offset_x,
            offset_y,
            save,
        } => save.render(
            &VideoImageWatermark::builder()
                .watermark_url(watermark_url)
                .gravity(gravity)
                .offset_x(offset_x)
                .offset_y(offset_y)
                .build(),
        ),
        FopsCommands::WaterText {
            text,
            gravity,
            font,
            font_color,
            font_size,
            offset_x,
            offset_y,
            save,
        } => save.render(
            &VideoTextWatermark::builder()
                .text(text)
                .gravity(gravity)
                .font(font)
                .font_color(font_color)
                .font_size(font_size)
                .offset_x(offset_x)
                .offset_y(offset_y)
                .build(),
        ),
    }
}

fn render_image(command: ImageCommands) -> String {
    match command {
        ImageCommands::Thumbnail {
            url,
            mode,
            width,
            height,
            format,
            interlace,
            quality,
        } => {
            let params = Thumbnail::builder()
                .mode(mode)
                .width(width)
                .height(height)
                .maybe_format(format)
                .maybe_interlace(interlace)
                .maybe_quality(quality)
                .build();
            image_url::thumbnail(&url, &params)
        }
        ImageCommands::WaterImg {
            url,
            image,
            dissolve,
            gravity,
            dx,
            dy,
            scale,
        } => {
            let params = ImageWatermark::builder()
                .image(image)
                .dissolve(dissolve)
                .gravity(gravity)
                .maybe_dx(dx)
                .maybe_dy(dy)
                .maybe_scale(scale)
                .build();
            image_url::water_img(&url, &params)
        }
        ImageCommands::WaterText {
            url,
            text,
            font,
            font_size,
            font_color,
            dissolve,
            gravity,
            dx,
            dy,
        } => {
            let params = TextWatermark::builder()
                .text(text)
                .font(font)
                .font_size(font_size)
                .maybe_font_color(font_color)
                .dissolve(dissolve)
                .gravity(gravity)
                .maybe_dx(dx)
                .maybe_dy(dy)
                .build();
            image_url::water_text(&url, &params)
        }
    }
}

fn check_config() -> Result<String> {
    let config = FacadeConfig::from_env().context("Failed to load facade configuration")?;
    info!(bucket = %config.bucket, domain = %config.domain, "configuration is valid");
    Ok(format!("{:#?}", config))
}

async fn run_remote(facade: &StorageFacade, command: RemoteCommands) -> Result<String> {
    let default_bucket = facade.bucket().to_string();
    let output = match command {
        RemoteCommands::Put { path, key } => {
            let key = match key {
                Some(key) => key,
                None => path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .context("Path has no file name; pass --key")?,
            };
            serde_json::to_string_pretty(&facade.put_file(&key, &path).await)?
        }
        RemoteCommands::Stat { key, bucket } => {
            let bucket = bucket.unwrap_or(default_bucket);
            let info = facade
                .stat(&bucket, &key)
                .await
                .with_context(|| format!("Failed to stat {}:{}", bucket, key))?;
            serde_json::to_string_pretty(&info)?
        }
        RemoteCommands::List {
            bucket,
            prefix,
            marker,
            delimiter,
            limit,
        } => {
            let bucket = bucket.unwrap_or(default_bucket);
            let options = ListOptions::builder()
                .maybe_prefix(prefix)
                .maybe_marker(marker)
                .maybe_delimiter(delimiter)
                .limit(limit)
                .build();
            let page = facade
                .list_files(&bucket, &options)
                .await
                .with_context(|| format!("Failed to list {}", bucket))?;
            serde_json::to_string_pretty(&page)?
        }
        RemoteCommands::Delete { key, bucket } => {
            let bucket = bucket.unwrap_or(default_bucket);
            serde_json::to_string_pretty(&facade.delete(&bucket, &key).await)?
        }
        RemoteCommands::Job { id } => {
            let status = facade
                .job_status(&JobId::new(id))
                .await
                .context("Failed to query job")?;
            serde_json::to_string_pretty(&status)?
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(command = ?cli.command, "running");

    let output = match cli.command {
        Commands::Fops { command } => render_fops(command),
        Commands::Image { command } => render_image(command),
        Commands::Config {
            command: ConfigCommands::Check,
        } => check_config()?,
        Commands::Remote { command } => {
            let facade =
                create_qiniu_facade_from_env().context("Failed to configure the provider")?;
            run_remote(&facade, command).await?
        }
    };
    println!("{}", output);

    Ok(())
}
