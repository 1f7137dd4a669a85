//! Close specs
//!
//! Closing a manager hands every lock it held back to the store.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn others_can_lock_immediately_after_close() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    let p2 = world.process().await;
    let names = ["orders", "invoices", "refunds"];

    for name in names {
        p1.lock(name, &world.secret()).await.unwrap();
    }
    p1.close().await;

    for name in names {
        p2.lock(name, &world.secret()).await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn close_does_not_touch_other_processes_locks() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    let p2 = world.process().await;

    p1.lock("orders", "a").await.unwrap();
    p2.lock("invoices", "b").await.unwrap();
    p1.close().await;

    assert_eq!(world.store.holder("invoices").as_deref(), Some("b"));
    assert!(p2.is_held("invoices"));
}

#[tokio::test(start_paused = true)]
async fn close_survives_an_unreachable_store() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    p1.lock("orders", "a").await.unwrap();
    world.store.set_unavailable(true);

    p1.close().await;

    assert!(p1.is_closed());
    assert!(p1.held().is_empty());
}
