use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use super::{
    InMemoryAuth, InMemoryBucketManager, InMemoryFop, InMemoryProvider, InMemoryUploadManager,
};
use crate::{
    domain::models::Credentials,
    ports::{Auth, BucketManager, ManagerFactory, PersistentFop, UploadManager},
};

/// How many of each collaborator a factory has built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstructionCounts {
    pub auth: usize,
    pub upload: usize,
    pub bucket: usize,
    pub fop: usize,
}

#[derive(Debug, Default)]
struct Counters {
    auth: AtomicUsize,
    upload: AtomicUsize,
    bucket: AtomicUsize,
    fop: AtomicUsize,
}

/// Builds in-memory collaborators sharing one provider, counting constructions
#[derive(Clone)]
pub struct InMemoryManagerFactory {
    provider: InMemoryProvider,
    counters: Arc<Counters>,
}

impl InMemoryManagerFactory {
    pub fn new(provider: InMemoryProvider) -> Self {
        Self {
            provider,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn provider(&self) -> &InMemoryProvider {
        &self.provider
    }

    pub fn constructed(&self) -> ConstructionCounts {
        ConstructionCounts {
            auth: self.counters.auth.load(Ordering::SeqCst),
            upload: self.counters.upload.load(Ordering::SeqCst),
            bucket: self.counters.bucket.load(Ordering::SeqCst),
            fop: self.counters.fop.load(Ordering::SeqCst),
        }
    }
}

impl ManagerFactory for InMemoryManagerFactory {
    fn auth(&self, credentials: &Credentials) -> Arc<dyn Auth> {
        self.counters.auth.fetch_add(1, Ordering::SeqCst);
        Arc::new(InMemoryAuth::new(credentials.clone()))
    }

    fn upload_manager(&self) -> Arc<dyn UploadManager> {
        self.counters.upload.fetch_add(1, Ordering::SeqCst);
        Arc::new(InMemoryUploadManager::new(self.provider.clone()))
    }

    fn bucket_manager(&self, auth: Arc<dyn Auth>) -> Arc<dyn BucketManager> {
        self.counters.bucket.fetch_add(1, Ordering::SeqCst);
        Arc::new(InMemoryBucketManager::new(self.provider.clone(), auth))
    }

    fn persistent_fop(&self, auth: Arc<dyn Auth>) -> Arc<dyn PersistentFop> {
        self.counters.fop.fetch_add(1, Ordering::SeqCst);
        Arc::new(InMemoryFop::new(self.provider.clone(), auth))
    }
}
