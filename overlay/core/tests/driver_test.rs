//! Driver Tests
//!
//! Runs the overlay on tokio with a paused clock. Tokio auto-advances the
//! clock whenever every task is idle, so these tests cover real timer
//! scheduling without waiting in wall-clock time.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::{advance, sleep};

use memeload_core::{
    FixedPicker, LoadingSignal, MaskConfig, MaskDriver, MaskError, PhaseKind, Visibility,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn abc_config() -> MaskConfig {
    MaskConfig::default()
        .with_messages(["ABC"])
        .with_background("rgba(0, 0, 0, 0.8)")
}

#[tokio::test(start_paused = true)]
async fn test_driver_starts_hidden() {
    let handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));
    let view = handle.view();
    assert_eq!(view.phase, PhaseKind::Off);
    assert_eq!(view.visibility, Visibility::Hidden);
    assert_eq!(view.background, "rgba(0, 0, 0, 0.8)");
}

#[tokio::test(start_paused = true)]
async fn test_driver_reveals_and_hides() {
    let mut handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));

    handle.set_signal(true).expect("driver running");
    let view = handle.changed().await.expect("view");
    assert_eq!(view.phase, PhaseKind::Load);
    assert_eq!(view.display_text(), "_");

    sleep(ms(950)).await;
    let view = handle.view();
    assert_eq!(view.fragment, "ABC");
    assert!(view.is_visible());

    handle.set_signal(false).expect("driver running");
    sleep(ms(10)).await;
    assert_eq!(handle.view().phase, PhaseKind::Boot);

    sleep(ms(980)).await;
    assert_eq!(handle.view().phase, PhaseKind::Boot);
    sleep(ms(20)).await;
    let view = handle.view();
    assert_eq!(view.phase, PhaseKind::Off);
    assert_eq!(view.visibility, Visibility::Hidden);
    assert_eq!(view.fragment, "");
}

#[tokio::test(start_paused = true)]
async fn test_cursor_blinks_after_completion() {
    let handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));
    handle.set_signal(true).expect("driver running");

    // Complete at 900ms, first toggle at 1400ms
    sleep(ms(1200)).await;
    assert_eq!(handle.view().display_text(), "ABC_");
    sleep(ms(300)).await;
    assert_eq!(handle.view().display_text(), "ABC ");
    sleep(ms(500)).await;
    assert_eq!(handle.view().display_text(), "ABC_");
}

#[tokio::test(start_paused = true)]
async fn test_min_duration_through_driver() {
    let config = abc_config().with_min_duration(2.0);
    let mut handle = MaskDriver::spawn_with_picker(config, FixedPicker(0));

    let start = tokio::time::Instant::now();
    handle.set_signal(true).expect("driver running");
    sleep(ms(100)).await;
    handle.set_signal(false).expect("driver running");

    handle.wait_hidden().await.expect("driver running");
    let visible_for = start.elapsed();
    assert!(visible_for >= ms(3000), "hid after {visible_for:?}");
    assert!(visible_for < ms(3050), "hid after {visible_for:?}");
}

#[tokio::test(start_paused = true)]
async fn test_load_guards_count_requests() {
    let config = abc_config().with_queue_mode(true);
    let handle = MaskDriver::spawn_with_picker(config, FixedPicker(0));

    let first = handle.begin();
    let second = handle.begin();
    assert_eq!(handle.signal(), LoadingSignal::Count(2));
    sleep(ms(10)).await;
    assert_eq!(handle.view().phase, PhaseKind::Load);

    drop(first);
    sleep(ms(10)).await;
    assert_eq!(handle.signal(), LoadingSignal::Count(1));
    assert_eq!(handle.view().phase, PhaseKind::Load);

    drop(second);
    sleep(ms(10)).await;
    assert_eq!(handle.signal(), LoadingSignal::Count(0));
    assert_eq!(handle.view().phase, PhaseKind::Boot);
}

#[tokio::test(start_paused = true)]
async fn test_config_update_reaches_view() {
    let handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));
    handle.set_signal(true).expect("driver running");
    sleep(ms(650)).await;
    assert_eq!(handle.view().fragment, "AB");

    handle
        .set_config(abc_config().with_safe_mode(true).with_background("navy"))
        .expect("driver running");
    sleep(ms(1)).await;
    let view = handle.view();
    assert_eq!(view.fragment, "");
    assert_eq!(view.cursor, None);
    assert_eq!(view.background, "navy");
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_hides_and_closes() {
    let handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));
    let mut views = handle.subscribe();
    handle.set_signal(true).expect("driver running");
    sleep(ms(10)).await;
    assert!(views.borrow_and_update().is_visible());

    handle.shutdown().await.expect("clean shutdown");
    assert_eq!(views.borrow_and_update().phase, PhaseKind::Off);
    assert!(views.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_cancels_timers() {
    let handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));
    let mut views = handle.subscribe();
    handle.set_signal(true).expect("driver running");
    sleep(ms(10)).await;
    assert!(views.borrow_and_update().is_visible());

    drop(handle);
    advance(ms(5000)).await;

    // Aborted task drops its sender; no further views arrive
    let closed = tokio::time::timeout(ms(100), views.changed()).await;
    assert!(matches!(closed, Ok(Err(_))));
}

#[tokio::test(start_paused = true)]
async fn test_guard_outliving_driver_is_harmless() {
    let handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));
    let mut views = handle.subscribe();
    let guard = handle.begin();
    handle.shutdown().await.expect("clean shutdown");

    drop(guard);
    while views.changed().await.is_ok() {}
    assert_eq!(views.borrow().phase, PhaseKind::Off);
    assert_eq!(
        MaskError::DriverClosed.to_string(),
        "overlay driver is no longer running"
    );
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_hidden_is_pending_while_visible() {
    let handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));
    handle.set_signal(true).expect("driver running");
    sleep(ms(10)).await;

    let mut views = handle.subscribe();
    let mut hidden = tokio_test::task::spawn(views.wait_for(|v| v.phase == PhaseKind::Off));
    tokio_test::assert_pending!(hidden.poll());

    handle.set_signal(false).expect("driver running");
    sleep(ms(1010)).await;
    assert!(hidden.is_woken());
    tokio_test::assert_ready_ok!(hidden.poll());
}

#[tokio::test(start_paused = true)]
async fn test_overdue_hide_fires_before_new_signal() {
    let handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));
    handle.set_signal(true).expect("driver running");
    sleep(ms(950)).await;
    assert_eq!(handle.view().fragment, "ABC");

    // Hide due at 1950ms; the reactivation lands in the same wake-up
    handle.set_signal(false).expect("driver running");
    sleep(ms(1)).await;
    handle.set_signal(true).expect("driver running");
    advance(ms(1100)).await;
    sleep(ms(1)).await;

    // The old cycle ended, so this is a fresh one with nothing typed yet
    let view = handle.view();
    assert_eq!(view.phase, PhaseKind::Load);
    assert_eq!(view.display_text(), "_");
}

#[tokio::test(start_paused = true)]
async fn test_resupplied_config_is_not_forwarded() {
    let handle = MaskDriver::spawn_with_picker(abc_config(), FixedPicker(0));
    let mut views = handle.subscribe();
    handle.set_signal(true).expect("driver running");

    for _ in 0..10 {
        sleep(ms(250)).await;
        handle.set_config(abc_config()).expect("driver running");
    }
    assert_eq!(views.borrow_and_update().fragment, "ABC");
}

#[tokio::test(start_paused = true)]
async fn test_guard_dropped_between_polls_is_batched_away() {
    let config = abc_config().with_queue_mode(true);
    let handle = MaskDriver::spawn_with_picker(config, FixedPicker(0));
    {
        let _guard = handle.begin();
    }
    sleep(ms(10)).await;

    assert_eq!(handle.signal(), LoadingSignal::Count(0));
    assert_eq!(handle.view().phase, PhaseKind::Off);
    assert!(!handle.view().is_visible());
}
