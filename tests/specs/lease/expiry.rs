//! Lease expiry specs
//!
//! Without renewal, a lease lapses on its own.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn unrenewed_lease_lapses_after_ttl() {
    let world = World::new(short_leases());
    let store = TracedLeaseStore::new(world.store.clone());

    assert!(store
        .acquire("orders", "a", Duration::from_secs(2))
        .await
        .unwrap());
    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert_eq!(world.store.holder("orders"), None);
}

#[tokio::test(start_paused = true)]
async fn lapsed_lease_can_be_claimed_by_anyone() {
    let world = World::new(short_leases());
    let p2 = world.process().await;
    world
        .store
        .take_over("orders", "crashed-process", Duration::from_secs(2));

    assert!(p2.lock("orders", "b").await.unwrap_err().is_mismatch());
    tokio::time::sleep(Duration::from_millis(2100)).await;
    p2.lock("orders", "b").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dropped_manager_lets_leases_lapse() {
    let world = World::new(short_leases());
    let p1 = world.process().await;
    p1.lock("orders", "a").await.unwrap();

    drop(p1);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(world.store.holder("orders"), None);
}
