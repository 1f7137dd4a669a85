//! Live Redis specs
//!
//! Run only when `REDLEASE_TEST_REDIS_URL` points at a disposable server.

use crate::prelude::*;
use redlease_adapters::RedisLeaseStore;
use redlease_core::StoreConfig;

async fn redis() -> Option<RedisLeaseStore> {
    let url = std::env::var("REDLEASE_TEST_REDIS_URL").ok()?;
    init_logging();
    let config = StoreConfig {
        url,
        ..StoreConfig::default()
    };
    Some(RedisLeaseStore::connect(&config).await.unwrap())
}

fn unique(name: &str) -> String {
    format!("redlease-spec:{}:{}", name, uuid::Uuid::new_v4())
}

#[tokio::test]
async fn redis_scripts_follow_lease_semantics() {
    let Some(store) = redis().await else {
        return;
    };
    let key = unique("semantics");
    let ttl = Duration::from_secs(10);

    assert!(store.acquire(&key, "a", ttl).await.unwrap());
    assert!(store.acquire(&key, "a", ttl).await.unwrap());
    assert!(!store.acquire(&key, "b", ttl).await.unwrap());
    assert!(store.renew(&key, "a", ttl).await.unwrap());
    assert!(!store.renew(&key, "b", ttl).await.unwrap());
    assert!(!store.release(&key, "b").await.unwrap());
    assert!(store.release(&key, "a").await.unwrap());
    assert!(store.release(&key, "a").await.unwrap());
    assert!(!store.renew(&key, "a", ttl).await.unwrap());
}

#[tokio::test]
async fn redis_lease_expires_without_renewal() {
    let Some(store) = redis().await else {
        return;
    };
    let key = unique("expiry");

    assert!(store.acquire(&key, "a", Duration::from_secs(2)).await.unwrap());
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(store.acquire(&key, "b", Duration::from_secs(2)).await.unwrap());
    store.release(&key, "b").await.unwrap();
}

#[tokio::test]
async fn redis_manager_keeps_lock_and_releases_on_close() {
    let Some(store) = redis().await else {
        return;
    };
    let key = unique("manager");
    let p1 = LockManager::start(store.clone(), short_leases()).await.unwrap();
    let p2 = LockManager::start(store.clone(), short_leases()).await.unwrap();

    p1.lock(&key, "a").await.unwrap();
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(p2.lock(&key, "b").await.unwrap_err().is_mismatch());

    p1.close().await;
    p2.lock(&key, "b").await.unwrap();
    p2.close().await;
}
