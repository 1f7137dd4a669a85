//! Release specs

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn releasing_an_absent_lock_succeeds() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;

    p1.release("orders", &world.secret()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn releasing_someone_elses_lock_is_refused() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    let p2 = world.process().await;
    let (a, b) = (world.secret(), world.secret());

    p1.lock("orders", &a).await.unwrap();

    let err = p2.release("orders", &b).await.unwrap_err();
    assert!(err.is_mismatch());
    assert_eq!(world.store.holder("orders"), Some(a));
}

#[tokio::test(start_paused = true)]
async fn release_is_idempotent() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    let a = world.secret();

    p1.lock("orders", &a).await.unwrap();
    p1.release("orders", &a).await.unwrap();
    p1.release("orders", &a).await.unwrap();
    assert_eq!(world.store.holder("orders"), None);
}

#[tokio::test(start_paused = true)]
async fn unreachable_store_is_distinct_from_conflict() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    world.store.set_unavailable(true);

    let err = p1.lock("orders", &world.secret()).await.unwrap_err();
    assert!(matches!(err, LockError::Store(_)));
    assert!(err.is_transient());
    assert!(!err.is_mismatch());
}
