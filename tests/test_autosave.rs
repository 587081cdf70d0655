//! Tests for the debounced autosave (async feature only).
//!
//! All timing runs on Tokio's paused test clock, so these are deterministic
//! and take no wall time.

#![cfg(feature = "async")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ringshelf::autosave::{Autosaver, SaveOutcome};
use ringshelf::error::RingshelfError;

fn autosaver() -> Autosaver {
    Autosaver::new(Duration::from_millis(800), Duration::from_secs(15))
}

#[tokio::test(start_paused = true)]
async fn save_fires_after_the_quiet_period() {
    let saver = autosaver();
    let saves = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&saves);
    let handle = saver.schedule(move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    assert!(matches!(handle.await.unwrap(), SaveOutcome::Saved));
    assert_eq!(saves.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn newer_edit_supersedes_a_pending_attempt() {
    let saver = autosaver();
    let saves = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&saves);
    let first = saver.schedule(move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    // Immediately edit again: the first attempt must never issue its save.
    let counter = Arc::clone(&saves);
    let second = saver.schedule(move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    assert!(matches!(first.await.unwrap(), SaveOutcome::Superseded));
    assert!(matches!(second.await.unwrap(), SaveOutcome::Saved));
    assert_eq!(saves.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn completion_of_a_superseded_inflight_save_is_discarded() {
    let saver = autosaver();

    // This save takes 5s, so it is still in flight when the next edit lands.
    let slow = saver.schedule(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(())
    });

    // Let the debounce elapse and the slow save start.
    tokio::time::sleep(Duration::from_millis(900)).await;

    let fast = saver.schedule(|| async { Ok(()) });

    assert!(matches!(slow.await.unwrap(), SaveOutcome::Superseded));
    assert!(matches!(fast.await.unwrap(), SaveOutcome::Saved));
}

#[tokio::test(start_paused = true)]
async fn hung_saves_time_out() {
    let saver = autosaver();

    let handle = saver.schedule(|| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    });

    assert!(matches!(handle.await.unwrap(), SaveOutcome::TimedOut));
}

#[tokio::test(start_paused = true)]
async fn save_errors_surface_as_failed() {
    let saver = autosaver();

    let handle = saver.schedule(|| async {
        Err(RingshelfError::Store("write rejected".into()))
    });

    match handle.await.unwrap() {
        SaveOutcome::Failed(err) => assert!(err.to_string().contains("write rejected")),
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn cancel_pending_invalidates_scheduled_attempts() {
    let saver = autosaver();
    let saves = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&saves);
    let handle = saver.schedule(move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    saver.cancel_pending();

    assert!(matches!(handle.await.unwrap(), SaveOutcome::Superseded));
    assert_eq!(saves.load(Ordering::SeqCst), 0);
}
