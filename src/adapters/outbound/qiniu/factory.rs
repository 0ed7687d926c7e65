use reqwest::Client;
use std::sync::Arc;

use super::{
    client::{http_client, QiniuEndpoints},
    QiniuAuth, QiniuBucketManager, QiniuFop, QiniuUploadManager,
};
use crate::{
    domain::models::Credentials,
    ports::{Auth, BucketManager, ManagerFactory, PersistentFop, UploadManager},
};

/// Builds REST collaborators for one region, sharing a single HTTP client
#[derive(Clone)]
pub struct QiniuManagerFactory {
    http: Client,
    endpoints: QiniuEndpoints,
}

impl QiniuManagerFactory {
    pub fn new(endpoints: QiniuEndpoints) -> Self {
        Self {
            http: http_client(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &QiniuEndpoints {
        &self.endpoints
    }
}

impl Default for QiniuManagerFactory {
    fn default() -> Self {
        Self::new(QiniuEndpoints::default())
    }
}

impl ManagerFactory for QiniuManagerFactory {
    fn auth(&self, credentials: &Credentials) -> Arc<dyn Auth> {
        Arc::new(QiniuAuth::new(credentials.clone()))
    }

    fn upload_manager(&self) -> Arc<dyn UploadManager> {
        Arc::new(QiniuUploadManager::new(
            self.http.clone(),
            self.endpoints.up.clone(),
        ))
    }

    fn bucket_manager(&self, auth: Arc<dyn Auth>) -> Arc<dyn BucketManager> {
        Arc::new(QiniuBucketManager::new(
            self.http.clone(),
            auth,
            self.endpoints.clone(),
        ))
    }

    fn persistent_fop(&self, auth: Arc<dyn Auth>) -> Arc<dyn PersistentFop> {
        Arc::new(QiniuFop::new(
            self.http.clone(),
            auth,
            self.endpoints.api.clone(),
        ))
    }
}
