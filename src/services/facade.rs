use bytes::Bytes;
use std::{collections::BTreeMap, path::Path, sync::Arc};
use tracing::{debug, info, warn};

use crate::{
    app::FacadeConfig,
    domain::{
        errors::{ConfigResult, DownloadError, JobError, JobResult, ProviderResult},
        models::{
            BatchItemResult, BatchOperation, Credentials, Envelope, FetchResult, FileInfo,
            JobStatus, ListFilesResult, ListOptions, ProcessingJob, PutPolicy, UploadResult,
        },
        value_objects::{FileStatus, FileType, JobId},
    },
    ports::{Auth, BucketManager, ManagerFactory, ObjectDownloader, PersistentFop, UploadManager},
    services::{
        fops::{
            saved_to, AudioEncode, FopCommand, VideoEncode, VideoImageWatermark, VideoMute,
            VideoTextWatermark,
        },
        image_url::{self, ImageWatermark, TextWatermark, Thumbnail},
        job_poller::{self, PollPolicy},
        normalizer::ResponseNormalizer,
    },
};

/// Lifetime of upload tokens and signed download URLs, in seconds
pub const DEFAULT_EXPIRES: u64 = 3600;

/// Configuration-driven entry point to the storage provider.
///
/// All SDK collaborators are built once, when the facade is built, and held
/// as named fields. Every call uses this instance's own credentials.
#[derive(Clone)]
pub struct StorageFacade {
    config: FacadeConfig,
    auth: Arc<dyn Auth>,
    upload_manager: Arc<dyn UploadManager>,
    bucket_manager: Arc<dyn BucketManager>,
    persistent_fop: Arc<dyn PersistentFop>,
    downloader: Arc<dyn ObjectDownloader>,
    normalizer: ResponseNormalizer,
}

impl StorageFacade {
    /// Validate `config` and build every collaborator through `factory`
    pub fn new(
        config: FacadeConfig,
        factory: &dyn ManagerFactory,
        downloader: Arc<dyn ObjectDownloader>,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let credentials = Credentials::new(config.access_key.clone(), config.secret_key.clone());
        let auth = factory.auth(&credentials);
        let upload_manager = factory.upload_manager();
        let bucket_manager = factory.bucket_manager(auth.clone());
        let persistent_fop = factory.persistent_fop(auth.clone());
        let normalizer = ResponseNormalizer::new(config.domain.clone(), config.secure);

        info!(bucket = %config.bucket, domain = %config.domain, secure = config.secure, "storage facade ready");

        Ok(Self {
            config,
            auth,
            upload_manager,
            bucket_manager,
            persistent_fop,
            downloader,
            normalizer,
        })
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Configured default bucket
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    /// Public URL an object would be served from
    pub fn public_url(&self, file_name: &str) -> String {
        self.normalizer.public_url(file_name)
    }

    //-------------------------------------
    // Upload
    //-------------------------------------

    /// Upload `data` as `file_name` into the configured bucket
    pub async fn put(&self, file_name: &str, data: impl Into<Bytes>) -> Envelope<UploadResult> {
        let token = self.default_upload_token();
        debug!(bucket = %self.config.bucket, key = file_name, "put");
        let outcome = self.upload_manager.put(&token, file_name, data.into()).await;
        self.normalizer.upload(outcome, file_name)
    }

    /// Upload the local file at `path` as `file_name` into the configured bucket
    pub async fn put_file(&self, file_name: &str, path: impl AsRef<Path>) -> Envelope<UploadResult> {
        let token = self.default_upload_token();
        let path = path.as_ref();
        debug!(bucket = %self.config.bucket, key = file_name, path = %path.display(), "put_file");
        let outcome = self.upload_manager.put_file(&token, file_name, path).await;
        self.normalizer.upload(outcome, file_name)
    }

    /// Sign an upload token with a strict policy.
    ///
    /// `bucket` defaults to the configured bucket.
    pub fn upload_token(
        &self,
        bucket: Option<&str>,
        key: Option<&str>,
        expires: u64,
        policy: Option<&PutPolicy>,
    ) -> String {
        let bucket = bucket.unwrap_or(&self.config.bucket);
        self.auth.upload_token(bucket, key, expires, policy, true)
    }

    fn default_upload_token(&self) -> String {
        self.auth
            .upload_token(&self.config.bucket, None, DEFAULT_EXPIRES, None, true)
    }

    //-------------------------------------
    // Private downloads
    //-------------------------------------

    /// Map every private object URL to a signed download URL
    pub fn private_download_urls<I, S>(&self, urls: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        urls.into_iter()
            .map(|url| {
                let url = url.into();
                let signed = self.auth.private_download_url(&url, DEFAULT_EXPIRES);
                (url, signed)
            })
            .collect()
    }

    /// Sign every URL and save each body into `dir`, named after the last
    /// path segment of the URL. Returns the url→signed-url map.
    pub async fn batch_download<I, S>(
        &self,
        urls: I,
        dir: impl AsRef<Path>,
    ) -> Result<BTreeMap<String, String>, DownloadError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let signed = self.private_download_urls(urls);
        if signed.is_empty() {
            return Ok(signed);
        }

        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        for (url, signed_url) in &signed {
            let name = url.rsplit('/').next().unwrap_or(url.as_str());
            let body = self.downloader.download(signed_url).await?;
            tokio::fs::write(dir.join(name), &body).await?;
            debug!(url = %url, bytes = body.len(), "downloaded");
        }

        Ok(signed)
    }

    //-------------------------------------
    // Bucket management
    //-------------------------------------

    pub async fn buckets(&self, shared: bool) -> ProviderResult<Vec<String>> {
        self.bucket_manager.buckets(shared).await
    }

    pub async fn domains(&self, bucket: &str) -> ProviderResult<Vec<String>> {
        self.bucket_manager.domains(bucket).await
    }

    pub async fn list_files(
        &self,
        bucket: &str,
        options: &ListOptions,
    ) -> ProviderResult<ListFilesResult> {
        debug!(bucket, prefix = ?options.prefix, limit = options.limit, "list_files");
        self.bucket_manager.list_files(bucket, options).await
    }

    pub async fn stat(&self, bucket: &str, key: &str) -> ProviderResult<FileInfo> {
        self.bucket_manager.stat(bucket, key).await
    }

    /// Delete an object. The envelope never carries a `result`.
    pub async fn delete(&self, bucket: &str, key: &str) -> Envelope<()> {
        debug!(bucket, key, "delete");
        let outcome = self.bucket_manager.delete(bucket, key).await;
        self.normalizer.unit(outcome)
    }

    pub async fn rename(&self, bucket: &str, old_key: &str, new_key: &str) -> ProviderResult<()> {
        self.bucket_manager.rename(bucket, old_key, new_key).await
    }

    pub async fn copy(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
        force: bool,
    ) -> ProviderResult<()> {
        self.bucket_manager
            .copy(from_bucket, from_key, to_bucket, to_key, force)
            .await
    }

    pub async fn move_object(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
        force: bool,
    ) -> ProviderResult<()> {
        self.bucket_manager
            .move_object(from_bucket, from_key, to_bucket, to_key, force)
            .await
    }

    pub async fn change_mime(&self, bucket: &str, key: &str, mime: &str) -> ProviderResult<()> {
        self.bucket_manager.change_mime(bucket, key, mime).await
    }

    pub async fn change_type(
        &self,
        bucket: &str,
        key: &str,
        file_type: FileType,
    ) -> ProviderResult<()> {
        self.bucket_manager.change_type(bucket, key, file_type).await
    }

    pub async fn change_status(
        &self,
        bucket: &str,
        key: &str,
        status: FileStatus,
    ) -> ProviderResult<()> {
        self.bucket_manager.change_status(bucket, key, status).await
    }

    pub async fn fetch(
        &self,
        url: &str,
        bucket: &str,
        key: Option<&str>,
    ) -> ProviderResult<FetchResult> {
        self.bucket_manager.fetch(url, bucket, key).await
    }

    pub async fn prefetch(&self, bucket: &str, key: &str) -> ProviderResult<()> {
        self.bucket_manager.prefetch(bucket, key).await
    }

    pub async fn batch(
        &self,
        operations: &[BatchOperation],
    ) -> ProviderResult<Vec<BatchItemResult>> {
        self.bucket_manager.batch(operations).await
    }

    pub async fn delete_after_days(&self, bucket: &str, key: &str, days: u32) -> ProviderResult<()> {
        self.bucket_manager.delete_after_days(bucket, key, days).await
    }

    //-------------------------------------
    // Image URLs
    //-------------------------------------

    pub fn thumbnail(&self, url: &str, params: &Thumbnail) -> String {
        image_url::thumbnail(url, params)
    }

    pub fn water_img(&self, url: &str, params: &ImageWatermark) -> String {
        image_url::water_img(url, params)
    }

    pub fn water_text(&self, url: &str, params: &TextWatermark) -> String {
        image_url::water_text(url, params)
    }

    //-------------------------------------
    // Persistent processing
    //-------------------------------------

    /// Submit `fops` against `key` in the configured bucket.
    ///
    /// Status is not queried here; use [`job_status`](Self::job_status) or
    /// [`wait_for_job`](Self::wait_for_job).
    pub async fn submit_job(
        &self,
        key: &str,
        fops: &str,
        pipeline: Option<&str>,
        notify_url: Option<&str>,
        force: bool,
    ) -> JobResult<ProcessingJob> {
        let id = self
            .persistent_fop
            .execute(&self.config.bucket, key, fops, pipeline, notify_url, force)
            .await
            .map_err(|err| {
                warn!(code = err.code(), error = err.message(), key, fops, "job submission failed");
                JobError::Submission(err)
            })?;

        info!(job = %id, key, fops, "job submitted");
        Ok(ProcessingJob {
            id,
            fops: fops.to_string(),
            pipeline: pipeline.map(str::to_string),
            notify_url: notify_url.map(str::to_string),
        })
    }

    /// Query a job's status once
    pub async fn job_status(&self, id: &JobId) -> JobResult<JobStatus> {
        job_poller::query_status(self.persistent_fop.as_ref(), id).await
    }

    /// Poll a job until it reaches a terminal state
    pub async fn wait_for_job(&self, id: &JobId, policy: &PollPolicy) -> JobResult<JobStatus> {
        job_poller::wait_for_terminal(self.persistent_fop.as_ref(), id, policy).await
    }

    /// Transcode audio
    pub async fn audio_encode(
        &self,
        key: &str,
        params: &AudioEncode,
        pipeline: Option<&str>,
        notify_url: Option<&str>,
    ) -> JobResult<ProcessingJob> {
        self.submit_job(key, &params.to_fops(), pipeline, notify_url, false)
            .await
    }

    /// Transcode video
    pub async fn video_encode(
        &self,
        key: &str,
        params: &VideoEncode,
        pipeline: Option<&str>,
        notify_url: Option<&str>,
    ) -> JobResult<ProcessingJob> {
        self.submit_job(key, &params.to_fops(), pipeline, notify_url, false)
            .await
    }

    /// Remove the audio track of a video
    pub async fn video_mute(
        &self,
        key: &str,
        pipeline: Option<&str>,
        notify_url: Option<&str>,
    ) -> JobResult<ProcessingJob> {
        self.submit_job(key, &VideoMute.to_fops(), pipeline, notify_url, false)
            .await
    }

    /// Watermark a video with an image and save the result as `new_key`
    pub async fn water_video(
        &self,
        key: &str,
        new_key: &str,
        params: &VideoImageWatermark,
        pipeline: Option<&str>,
        notify_url: Option<&str>,
    ) -> JobResult<ProcessingJob> {
        let fops = saved_to(params, &self.config.bucket, new_key);
        self.submit_job(key, &fops, pipeline, notify_url, false).await
    }

    /// Watermark a video with text and save the result as `new_key`
    pub async fn water_video_text(
        &self,
        key: &str,
        new_key: &str,
        params: &VideoTextWatermark,
        pipeline: Option<&str>,
        notify_url: Option<&str>,
    ) -> JobResult<ProcessingJob> {
        let fops = saved_to(params, &self.config.bucket, new_key);
        self.submit_job(key, &fops, pipeline, notify_url, false).await
    }
}
