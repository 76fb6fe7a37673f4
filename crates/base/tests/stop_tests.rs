use base::Stop;
use tokio::time::{Duration, sleep, timeout};

#[test]
fn test_stop_starts_lowered() {
    let stop = Stop::new();
    assert!(!stop.is_raised());
}

#[test]
fn test_stop_is_shared_between_clones() {
    let stop = Stop::new();
    let other = stop.clone();
    other.raise();
    assert!(stop.is_raised());

    // raising twice is harmless
    stop.raise();
    assert!(other.is_raised());
}

#[tokio::test]
async fn test_raised_resolves_immediately_when_already_raised() {
    let stop = Stop::new();
    stop.raise();
    timeout(Duration::from_millis(100), stop.raised())
        .await
        .expect("raised() should resolve");
}

#[tokio::test]
async fn test_raised_wakes_waiter() {
    let stop = Stop::new();
    let trigger = stop.clone();

    let waiter = async {
        stop.raised().await;
        true
    };
    let raiser = async {
        sleep(Duration::from_millis(20)).await;
        trigger.raise();
    };

    let (woke, ()) = timeout(Duration::from_secs(5), async { tokio::join!(waiter, raiser) })
        .await
        .expect("waiter was not woken");
    assert!(woke);
}
