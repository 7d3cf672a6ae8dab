use simple_service::service::{CachedSimpleService, InstrumentedSimpleService, ServiceMetrics};
use simple_service::{
    build_service, seed_samples, AppError, MemorySimpleRepository, ServerConfig, SimpleObject, SimpleRepository,
    SimpleService, SimpleServiceImpl,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

fn memory() -> (MemorySimpleRepository, Arc<dyn SimpleRepository>) {
    let repo = MemorySimpleRepository::new();
    let shared: Arc<dyn SimpleRepository> = Arc::new(repo.clone());
    (repo, shared)
}

fn configs() -> Vec<ServerConfig> {
    let mut out = Vec::new();
    for cache_enabled in [false, true] {
        for metrics_enabled in [false, true] {
            out.push(ServerConfig {
                cache_enabled,
                metrics_enabled,
                ..ServerConfig::default()
            });
        }
    }
    out
}

#[tokio::test]
async fn create_assigns_id_and_round_trips() {
    for config in configs() {
        let (_, repo) = memory();
        let service = build_service(repo, &config).service;

        let created = service.create(SimpleObject::new("hello")).await.unwrap();
        let id = created.id.expect("store assigns an id");
        assert_eq!(created.text, "hello");
        assert_eq!(service.find_one(id).await.unwrap(), Some(created));
    }
}

#[tokio::test]
async fn create_with_id_fails_without_mutation() {
    for config in configs() {
        let (store, repo) = memory();
        let service = build_service(repo, &config).service;

        let err = service.create(SimpleObject::with_id(4, "preset")).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
        assert!(store.is_empty().await);
    }
}

#[tokio::test]
async fn update_of_missing_id_fails_without_mutation() {
    for config in configs() {
        let (store, repo) = memory();
        let service = build_service(repo, &config).service;
        service.create(SimpleObject::new("existing")).await.unwrap();

        let err = service.update(SimpleObject::with_id(999, "ghost")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.len().await, 1);
        assert_eq!(service.find_one(999).await.unwrap(), None);
    }
}

#[tokio::test]
async fn update_without_id_is_not_found() {
    let (_, repo) = memory();
    let service = SimpleServiceImpl::new(repo);
    let err = service.update(SimpleObject::new("no id")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn update_replaces_text() {
    for config in configs() {
        let (_, repo) = memory();
        let service = build_service(repo, &config).service;
        let created = service.create(SimpleObject::new("draft")).await.unwrap();
        let id = created.id.unwrap();

        // Prime the cache when one is configured.
        service.find_one(id).await.unwrap();

        let updated = service.update(SimpleObject::with_id(id, "updated")).await.unwrap();
        assert_eq!(updated, SimpleObject::with_id(id, "updated"));
        assert_eq!(service.find_one(id).await.unwrap(), Some(updated));
    }
}

#[tokio::test]
async fn delete_is_idempotent() {
    for config in configs() {
        let (store, repo) = memory();
        let service = build_service(repo, &config).service;
        let id = service.create(SimpleObject::new("doomed")).await.unwrap().id.unwrap();
        service.find_one(id).await.unwrap();

        service.delete(id).await.unwrap();
        assert_eq!(service.find_one(id).await.unwrap(), None);
        service.delete(id).await.unwrap();
        assert_eq!(service.find_one(id).await.unwrap(), None);
        assert!(store.is_empty().await);
    }
}

#[tokio::test]
async fn find_all_returns_every_entity() {
    let (_, repo) = memory();
    let service = build_service(repo, &ServerConfig::default()).service;
    let seeded = seed_samples(service.as_ref()).await.unwrap();
    assert_eq!(seeded.len(), 10);

    let all = service.find_all().await.unwrap();
    assert_eq!(all.len(), 10);
    assert_eq!(all[0].text, "Simple Object #0");
    assert_eq!(all[9].text, "Simple Object #9");
}

#[tokio::test]
async fn cache_serves_hits_and_skips_misses() {
    let (store, repo) = memory();
    let cached = CachedSimpleService::new(SimpleServiceImpl::new(repo));

    assert_eq!(cached.find_one(1).await.unwrap(), None);
    assert_eq!(cached.cached_len(), 0);

    let created = cached.create(SimpleObject::new("cached")).await.unwrap();
    let id = created.id.unwrap();
    assert_eq!(cached.find_one(id).await.unwrap(), Some(created.clone()));
    assert_eq!(cached.cached_len(), 1);

    // The gateway changes underneath; the cached copy keeps answering.
    store.save(&SimpleObject::with_id(id, "changed behind the cache")).await.unwrap();
    assert_eq!(cached.find_one(id).await.unwrap(), Some(created));

    cached.delete(id).await.unwrap();
    assert_eq!(cached.cached_len(), 0);
    assert_eq!(cached.find_one(id).await.unwrap(), None);
}

/// Pauses the first `find_one` after it has read from the store, until released.
struct PausingService {
    inner: SimpleServiceImpl,
    armed: AtomicBool,
    reached: Notify,
    release: Notify,
}

impl PausingService {
    fn new(repo: Arc<dyn SimpleRepository>) -> Self {
        Self {
            inner: SimpleServiceImpl::new(repo),
            armed: AtomicBool::new(true),
            reached: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl SimpleService for PausingService {
    async fn find_all(&self) -> Result<Vec<SimpleObject>, AppError> {
        self.inner.find_all().await
    }

    async fn find_one(&self, id: i64) -> Result<Option<SimpleObject>, AppError> {
        let found = self.inner.find_one(id).await;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.reached.notify_one();
            self.release.notified().await;
        }
        found
    }

    async fn create(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        self.inner.create(entity).await
    }

    async fn update(&self, entity: SimpleObject) -> Result<SimpleObject, AppError> {
        self.inner.update(entity).await
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.inner.delete(id).await
    }
}

type PausingCache = CachedSimpleService<Arc<PausingService>>;

async fn seeded_pausing_cache(text: &str) -> (Arc<PausingCache>, Arc<PausingService>, i64) {
    let (store, repo) = memory();
    let id = store.save(&SimpleObject::new(text)).await.unwrap().id.unwrap();
    let gate = Arc::new(PausingService::new(repo));
    (Arc::new(CachedSimpleService::new(gate.clone())), gate, id)
}

#[tokio::test]
async fn delete_during_lookup_leaves_no_stale_entry() {
    let (cached, gate, id) = seeded_pausing_cache("x").await;

    let reader = {
        let cached = cached.clone();
        tokio::spawn(async move { cached.find_one(id).await })
    };
    gate.reached.notified().await;
    cached.delete(id).await.unwrap();
    gate.release.notify_one();
    reader.await.unwrap().unwrap();

    assert_eq!(cached.cached_len(), 0);
    assert_eq!(cached.find_one(id).await.unwrap(), None);
}

#[tokio::test]
async fn update_during_lookup_leaves_no_stale_entry() {
    let (cached, gate, id) = seeded_pausing_cache("old").await;

    let reader = {
        let cached = cached.clone();
        tokio::spawn(async move { cached.find_one(id).await })
    };
    gate.reached.notified().await;
    cached.update(SimpleObject::with_id(id, "new")).await.unwrap();
    gate.release.notify_one();
    reader.await.unwrap().unwrap();

    assert_eq!(
        cached.find_one(id).await.unwrap(),
        Some(SimpleObject::with_id(id, "new"))
    );
}

#[tokio::test]
async fn metrics_count_invocations_and_failures() {
    let (_, repo) = memory();
    let metrics = Arc::new(ServiceMetrics::default());
    let service = InstrumentedSimpleService::new(SimpleServiceImpl::new(repo), metrics.clone());

    let id = service.create(SimpleObject::new("one")).await.unwrap().id.unwrap();
    service.create(SimpleObject::with_id(id, "dup")).await.unwrap_err();
    service.find_one(id).await.unwrap();
    service.find_all().await.unwrap();
    service.update(SimpleObject::with_id(id, "two")).await.unwrap();
    service.delete(id).await.unwrap();

    let snap = metrics.snapshot();
    assert_eq!(snap.create, 2);
    assert_eq!(snap.find_one, 1);
    assert_eq!(snap.find_all, 1);
    assert_eq!(snap.update, 1);
    assert_eq!(snap.delete, 1);
    assert_eq!(snap.failures, 1);
    assert!(Arc::ptr_eq(service.metrics(), &metrics));
}

#[tokio::test]
async fn build_service_exposes_metrics_only_when_enabled() {
    let (_, repo) = memory();
    let off = ServerConfig {
        metrics_enabled: false,
        ..ServerConfig::default()
    };
    assert!(build_service(repo.clone(), &off).metrics.is_none());

    let built = build_service(repo, &ServerConfig::default());
    let metrics = built.metrics.expect("metrics enabled by default");
    built.service.find_all().await.unwrap();
    assert_eq!(metrics.snapshot().find_all, 1);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let (store, repo) = memory();
    let service = build_service(repo, &ServerConfig::default()).service;

    let mut handles = Vec::new();
    for i in 0..16 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.create(SimpleObject::new(format!("item {}", i))).await
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 16);
    assert_eq!(store.len().await, 16);
}
