use async_trait::async_trait;
use bytes::Bytes;
use qiniu_facade::{
    adapters::outbound::memory::ConstructionCounts, create_in_memory_facade, BatchOperation,
    DownloadError, FacadeBuilder, FacadeConfig, FileStatus, FileType, InMemoryManagerFactory,
    InMemoryProvider, ListOptions, ObjectDownloader, StorageFacade,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn config(secure: bool) -> FacadeConfig {
    FacadeConfig::builder()
        .access_key("test-ak")
        .secret_key("test-sk")
        .domain("cdn.example.com/")
        .bucket("media")
        .secure(secure)
        .build()
}

async fn setup(secure: bool) -> (StorageFacade, InMemoryProvider) {
    let (facade, provider) = create_in_memory_facade(config(secure)).unwrap();
    provider.create_bucket("media", &["cdn.example.com"]).await;
    (facade, provider)
}

#[tokio::test]
async fn put_returns_success_envelope() {
    let (facade, provider) = setup(false).await;

    let envelope = facade.put("hello.txt", "hello world").await;

    assert!(envelope.is_ok());
    assert_eq!(envelope.message, "ok");
    let result = envelope.result.unwrap();
    assert_eq!(result.key, "hello.txt");
    assert_eq!(result.url, "http://cdn.example.com/hello.txt");
    assert!(!result.hash.is_empty());

    let (data, info) = provider.object("media", "hello.txt").await.unwrap();
    assert_eq!(data, Bytes::from("hello world"));
    assert_eq!(info.hash, result.hash);
    assert_eq!(info.mime_type, "text/plain");
}

#[tokio::test]
async fn put_uses_https_when_secure() {
    let (facade, _provider) = setup(true).await;

    let envelope = facade.put("a.png", vec![1u8, 2, 3]).await;

    assert_eq!(envelope.result.unwrap().url, "https://cdn.example.com/a.png");
}

#[tokio::test]
async fn put_failure_keeps_result_fields() {
    let (facade, _provider) = setup(false).await;

    facade.put("note.txt", "first").await;
    let envelope = facade.put("note.txt", "second").await;

    assert_eq!(envelope.code, 614);
    assert_eq!(envelope.message, "file exists");
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({
            "code": 614,
            "message": "file exists",
            "result": { "hash": "", "key": "", "url": "" }
        })
    );
}

#[tokio::test]
async fn put_identical_body_twice_succeeds() {
    let (facade, _provider) = setup(false).await;

    let first = facade.put("same.txt", "body").await;
    let second = facade.put("same.txt", "body").await;

    assert!(second.is_ok());
    assert_eq!(first.result.unwrap().hash, second.result.unwrap().hash);
}

#[tokio::test]
async fn put_into_missing_bucket_fails() {
    let (facade, _provider) = create_in_memory_facade(config(false)).unwrap();

    let envelope = facade.put("x.txt", "x").await;

    assert_eq!(envelope.code, 631);
    assert_eq!(envelope.result.unwrap().url, "");
}

#[tokio::test]
async fn put_file_uploads_local_file() {
    let (facade, provider) = setup(false).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    tokio::fs::write(&path, br#"{"ok":true}"#).await.unwrap();

    let envelope = facade.put_file("reports/report.json", &path).await;

    assert!(envelope.is_ok());
    assert_eq!(
        envelope.result.unwrap().url,
        "http://cdn.example.com/reports/report.json"
    );
    let (_, info) = provider.object("media", "reports/report.json").await.unwrap();
    assert_eq!(info.mime_type, "application/json");
}

#[tokio::test]
async fn put_file_missing_path_is_local_error() {
    let (facade, _provider) = setup(false).await;
    let dir = tempfile::tempdir().unwrap();

    let envelope = facade.put_file("gone.txt", dir.path().join("gone.txt")).await;

    assert_eq!(envelope.code, -1);
    assert!(envelope.result.is_some());
}

#[tokio::test]
async fn delete_envelope_has_no_result() {
    let (facade, provider) = setup(false).await;
    facade.put("old.txt", "bye").await;

    let envelope = facade.delete("media", "old.txt").await;

    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({ "code": 0, "message": "ok" })
    );
    assert!(provider.object("media", "old.txt").await.is_none());

    let envelope = facade.delete("media", "old.txt").await;
    assert_eq!(
        serde_json::to_value(&envelope).unwrap(),
        json!({ "code": 612, "message": "no such file or directory" })
    );
}

#[tokio::test]
async fn managers_are_built_once() {
    let provider = InMemoryProvider::new();
    provider.create_bucket("media", &["cdn.example.com"]).await;
    let factory = InMemoryManagerFactory::new(provider.clone());

    let facade = FacadeBuilder::new(config(false)).build(&factory).unwrap();
    facade.put("a.txt", "a").await;
    facade.put("b.txt", "b").await;
    facade.stat("media", "a.txt").await.unwrap();
    facade.delete("media", "b.txt").await;
    let _ = facade.video_mute("a.txt", None, None).await;

    assert_eq!(
        factory.constructed(),
        ConstructionCounts {
            auth: 1,
            upload: 1,
            bucket: 1,
            fop: 1,
        }
    );
}

#[tokio::test]
async fn invalid_config_builds_nothing() {
    let factory = InMemoryManagerFactory::new(InMemoryProvider::new());
    let mut cfg = config(false);
    cfg.access_key = String::new();

    let err = FacadeBuilder::new(cfg).build(&factory).err().unwrap();

    assert_eq!(
        err.to_string(),
        "Configuration error: access key must be configured"
    );
    assert_eq!(factory.constructed(), ConstructionCounts::default());
}

#[tokio::test]
async fn bucket_listing_and_domains() {
    let (facade, provider) = setup(false).await;
    provider.create_bucket("archive", &[]).await;
    provider.create_shared_bucket("partner").await;

    assert_eq!(facade.buckets(false).await.unwrap(), vec!["archive", "media"]);
    assert_eq!(
        facade.buckets(true).await.unwrap(),
        vec!["archive", "media", "partner"]
    );
    assert_eq!(
        facade.domains("media").await.unwrap(),
        vec!["cdn.example.com"]
    );
    assert_eq!(facade.domains("nope").await.unwrap_err().code(), 631);
}

#[tokio::test]
async fn list_files_with_prefix_delimiter_and_marker() {
    let (facade, _provider) = setup(false).await;
    for key in ["img/a.png", "img/b.png", "img/thumbs/a.png", "doc/readme.txt"] {
        facade.put(key, key.to_string()).await;
    }

    let options = ListOptions::builder().prefix("img/").delimiter("/").build();
    let listing = facade.list_files("media", &options).await.unwrap();
    let keys: Vec<_> = listing.items.iter().map(|item| item.key.as_str()).collect();
    assert_eq!(keys, vec!["img/a.png", "img/b.png"]);
    assert_eq!(listing.common_prefixes, vec!["img/thumbs/"]);
    assert!(listing.marker.is_none());

    let page = ListOptions::builder().limit(2).build();
    let first = facade.list_files("media", &page).await.unwrap();
    assert_eq!(first.items.len(), 2);
    let marker = first.marker.clone().unwrap();
    assert_eq!(marker, "img/a.png");

    let next = ListOptions::builder().limit(2).marker(marker).build();
    let second = facade.list_files("media", &next).await.unwrap();
    let keys: Vec<_> = second.items.iter().map(|item| item.key.as_str()).collect();
    assert_eq!(keys, vec!["img/b.png", "img/thumbs/a.png"]);
    assert!(second.marker.is_none());
}

#[tokio::test]
async fn paging_never_repeats_a_common_prefix() {
    let factory = InMemoryManagerFactory::new(InMemoryProvider::new());
    factory.provider().create_bucket("media", &[]).await;
    let facade = FacadeBuilder::new(config(false)).build(&factory).unwrap();
    for key in ["a/1", "a/2", "b"] {
        facade.put(key, key.to_string()).await;
    }

    let mut prefixes = Vec::new();
    let mut keys = Vec::new();
    let mut marker: Option<String> = None;
    loop {
        let options = ListOptions::builder()
            .delimiter("/")
            .limit(1)
            .maybe_marker(marker.take())
            .build();
        let page = facade.list_files("media", &options).await.unwrap();
        prefixes.extend(page.common_prefixes);
        keys.extend(page.items.into_iter().map(|item| item.key));
        marker = page.marker;
        if marker.is_none() {
            break;
        }
    }

    assert_eq!(prefixes, vec!["a/"]);
    assert_eq!(keys, vec!["b"]);
}

#[tokio::test]
async fn rename_copy_and_move() {
    let (facade, provider) = setup(false).await;
    provider.create_bucket("backup", &[]).await;
    facade.put("a.txt", "A").await;
    facade.put("b.txt", "B").await;

    facade.rename("media", "a.txt", "c.txt").await.unwrap();
    assert_eq!(provider.object_keys("media").await, vec!["b.txt", "c.txt"]);

    let err = facade.rename("media", "b.txt", "c.txt").await.unwrap_err();
    assert_eq!(err.code(), 614);

    facade
        .copy("media", "b.txt", "backup", "b.txt", false)
        .await
        .unwrap();
    facade
        .move_object("media", "c.txt", "backup", "b.txt", true)
        .await
        .unwrap();

    assert_eq!(provider.object_keys("media").await, vec!["b.txt"]);
    let (data, _) = provider.object("backup", "b.txt").await.unwrap();
    assert_eq!(data, Bytes::from("A"));
}

#[tokio::test]
async fn change_metadata() {
    let (facade, provider) = setup(false).await;
    facade.put("clip.bin", "xyz").await;

    facade
        .change_mime("media", "clip.bin", "video/mp4")
        .await
        .unwrap();
    facade
        .change_type("media", "clip.bin", FileType::InfrequentAccess)
        .await
        .unwrap();
    facade
        .change_status("media", "clip.bin", FileStatus::Disabled)
        .await
        .unwrap();
    facade
        .delete_after_days("media", "clip.bin", 7)
        .await
        .unwrap();

    let info = facade.stat("media", "clip.bin").await.unwrap();
    assert_eq!(info.mime_type, "video/mp4");
    assert_eq!(info.file_type, FileType::InfrequentAccess);
    assert_eq!(info.status, FileStatus::Disabled);
    assert_eq!(provider.expiry_days("media", "clip.bin").await, Some(7));

    let err = facade.change_mime("media", "missing", "text/plain").await.unwrap_err();
    assert_eq!(err.code(), 612);
}

#[tokio::test]
async fn fetch_and_prefetch() {
    let (facade, provider) = setup(false).await;
    provider
        .add_remote("http://origin.example.com/logo.png", "PNG")
        .await;

    let fetched = facade
        .fetch("http://origin.example.com/logo.png", "media", Some("logo.png"))
        .await
        .unwrap();
    assert_eq!(fetched.key, "logo.png");
    assert_eq!(fetched.fsize, 3);
    assert_eq!(fetched.mime_type, "image/png");

    let unnamed = facade
        .fetch("http://origin.example.com/logo.png", "media", None)
        .await
        .unwrap();
    assert_eq!(unnamed.key, unnamed.hash);

    let err = facade
        .fetch("http://origin.example.com/missing", "media", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), 478);

    assert_eq!(facade.prefetch("media", "logo.png").await.unwrap_err().code(), 400);
    assert!(provider.set_mirror("media", "http://origin.example.com/").await);
    provider
        .add_remote("http://origin.example.com/logo.png", "PNG v2")
        .await;
    facade.prefetch("media", "logo.png").await.unwrap();
    let (data, _) = provider.object("media", "logo.png").await.unwrap();
    assert_eq!(data, Bytes::from("PNG v2"));
}

#[tokio::test]
async fn batch_reports_per_item_results() {
    let (facade, provider) = setup(false).await;
    facade.put("a.txt", "A").await;
    facade.put("b.txt", "B").await;

    let stats = facade
        .batch(&BatchOperation::stat_all("media", ["a.txt", "missing.txt"]))
        .await
        .unwrap();
    assert_eq!(stats.len(), 2);
    assert!(stats[0].is_success());
    assert_eq!(stats[0].data.as_ref().unwrap()["fsize"], 1);
    assert_eq!(stats[1].code, 612);
    assert_eq!(
        stats[1].data,
        Some(json!({ "error": "no such file or directory" }))
    );

    let deleted = facade
        .batch(&BatchOperation::delete_all("media", ["a.txt", "b.txt"]))
        .await
        .unwrap();
    assert!(deleted.iter().all(|item| item.is_success()));
    assert!(provider.object_keys("media").await.is_empty());

    assert_eq!(facade.batch(&[]).await.unwrap_err().code(), 400);
}

#[tokio::test]
async fn upload_token_defaults_to_configured_bucket() {
    let (facade, _provider) = setup(false).await;

    let token = facade.upload_token(None, None, 3600, None);
    let parts: Vec<&str> = token.split(':').collect();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "test-ak");
    let policy = qiniu_facade::domain::encoding::urlsafe_base64_decode(parts[2]).unwrap();
    let policy: serde_json::Value = serde_json::from_slice(&policy).unwrap();
    assert_eq!(policy["scope"], "media");

    let token = facade.upload_token(Some("archive"), Some("k.txt"), 60, None);
    let encoded = token.rsplit(':').next().unwrap();
    let policy = qiniu_facade::domain::encoding::urlsafe_base64_decode(encoded).unwrap();
    let policy: serde_json::Value = serde_json::from_slice(&policy).unwrap();
    assert_eq!(policy["scope"], "archive:k.txt");
}

#[tokio::test]
async fn private_download_urls_are_signed() {
    let (facade, _provider) = setup(false).await;

    let urls = facade.private_download_urls([
        "http://cdn.example.com/a.txt",
        "http://cdn.example.com/b.txt?v=2",
    ]);

    assert_eq!(urls.len(), 2);
    let a = &urls["http://cdn.example.com/a.txt"];
    assert!(a.starts_with("http://cdn.example.com/a.txt?e="));
    assert!(a.contains("&token=test-ak:"));
    let b = &urls["http://cdn.example.com/b.txt?v=2"];
    assert!(b.starts_with("http://cdn.example.com/b.txt?v=2&e="));
}

/// Serves a fixed body per request and records the URLs asked for
#[derive(Default)]
struct RecordingDownloader {
    requested: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl ObjectDownloader for RecordingDownloader {
    async fn download(&self, url: &str) -> Result<Bytes, DownloadError> {
        self.requested.lock().unwrap().push(url.to_string());
        if self.fail {
            return Err(DownloadError::Http {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            });
        }
        Ok(Bytes::from(format!("body of {}", url.split('?').next().unwrap())))
    }
}

#[tokio::test]
async fn batch_download_saves_files() {
    let provider = InMemoryProvider::new();
    let factory = InMemoryManagerFactory::new(provider);
    let downloader = Arc::new(RecordingDownloader::default());
    let facade = FacadeBuilder::new(config(false))
        .with_downloader(downloader.clone())
        .build(&factory)
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("downloads");

    let signed = facade
        .batch_download(
            [
                "http://cdn.example.com/docs/a.txt",
                "http://cdn.example.com/b.txt",
            ],
            &target,
        )
        .await
        .unwrap();

    assert_eq!(signed.len(), 2);
    let requested = downloader.requested.lock().unwrap().clone();
    assert_eq!(requested.len(), 2);
    assert!(requested.iter().all(|url| url.contains("&token=test-ak:")));

    let a = tokio::fs::read_to_string(target.join("a.txt")).await.unwrap();
    assert_eq!(a, "body of http://cdn.example.com/docs/a.txt");
    assert!(target.join("b.txt").exists());
}

#[tokio::test]
async fn batch_download_reports_http_failure() {
    let factory = InMemoryManagerFactory::new(InMemoryProvider::new());
    let downloader = Arc::new(RecordingDownloader {
        fail: true,
        ..Default::default()
    });
    let facade = FacadeBuilder::new(config(false))
        .with_downloader(downloader)
        .build(&factory)
        .unwrap();
    let dir = tempfile::tempdir().unwrap();

    let err = facade
        .batch_download(["http://cdn.example.com/a.txt"], dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Http { .. }));
}

#[tokio::test]
async fn batch_download_with_no_urls_touches_nothing() {
    let (facade, _provider) = setup(false).await;
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("never");

    let signed = facade
        .batch_download(Vec::<String>::new(), &target)
        .await
        .unwrap();

    assert!(signed.is_empty());
    assert!(!target.exists());
}
