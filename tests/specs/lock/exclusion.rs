//! Mutual exclusion specs
//!
//! Verify one holder at a time per lock name.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn second_secret_is_refused_while_first_holds() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    let p2 = world.process().await;
    let (a, b) = (world.secret(), world.secret());

    p1.lock("orders", &a).await.unwrap();

    let err = p2.lock("orders", &b).await.unwrap_err();
    assert!(matches!(err, LockError::Mismatch { .. }));
}

#[tokio::test(start_paused = true)]
async fn refusal_lasts_until_release() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    let p2 = world.process().await;
    let (a, b) = (world.secret(), world.secret());

    p1.lock("orders", &a).await.unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(p2.lock("orders", &b).await.unwrap_err().is_mismatch());

    p1.release("orders", &a).await.unwrap();
    p2.lock("orders", &b).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn same_secret_relocks_and_refreshes() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    let a = world.secret();

    p1.lock("orders", &a).await.unwrap();
    world.store.take_over("orders", &a, Duration::from_secs(1));
    p1.lock("orders", &a).await.unwrap();

    assert_eq!(world.store.remaining("orders"), Some(Duration::from_secs(10)));
}

#[tokio::test(start_paused = true)]
async fn distinct_names_do_not_contend() {
    let world = World::new(LockConfig::default());
    let p1 = world.process().await;
    let p2 = world.process().await;

    p1.lock("orders", &world.secret()).await.unwrap();
    p2.lock("invoices", &world.secret()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn racing_acquirers_elect_exactly_one_winner() {
    let world = World::new(LockConfig::default());
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let manager = Arc::new(world.process().await);
        let secret = world.secret();
        tasks.push(tokio::spawn(async move {
            manager.lock("orders", &secret).await.is_ok()
        }));
    }

    let mut winners = 0;
    for task in tasks {
        if task.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
