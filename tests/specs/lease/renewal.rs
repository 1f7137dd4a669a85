//! Auto-renewal specs
//!
//! A held lock outlives its TTL while the scheduler runs.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn held_lock_survives_many_ttls() {
    let world = World::new(short_leases());
    let p1 = world.process().await;
    let p2 = world.process().await;
    p1.lock("orders", "a").await.unwrap();

    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(world.store.holder("orders").as_deref(), Some("a"));
    }
    assert!(p2.lock("orders", "b").await.unwrap_err().is_mismatch());

    p1.close().await;
    p2.close().await;
}

#[tokio::test(start_paused = true)]
async fn renewal_survives_a_brief_outage() {
    let world = World::new(
        LockConfig::new()
            .with_acquire_ttl(Duration::from_secs(5))
            .with_renew_ttl(Duration::from_secs(5))
            .with_renew_interval(Duration::from_secs(1)),
    );
    let p1 = world.process().await;
    p1.lock("orders", "a").await.unwrap();

    world.store.set_unavailable(true);
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(p1.is_held("orders"));
    world.store.set_unavailable(false);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(world.store.holder("orders").as_deref(), Some("a"));

    p1.close().await;
}

#[tokio::test(start_paused = true)]
async fn lost_lease_stops_being_renewed() {
    let world = World::new(short_leases());
    let p1 = world.process().await;
    p1.lock("orders", "a").await.unwrap();

    world.store.take_over("orders", "b", Duration::from_secs(2));
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(!p1.is_held("orders"));
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(world.store.holder("orders"), None);
}
