//! Integration tests for the toast lifecycle: request, auto-dismiss,
//! grace delay, removal.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use toastkit_core::{
    ManualClock, ToastConfig, ToastDuration, ToastPatch, ToastRequest, ToastState, Toaster,
};

fn toaster(capacity: usize) -> (Toaster, ManualClock) {
    let clock = ManualClock::new();
    let config = ToastConfig::with_capacity(capacity);
    let toaster = Toaster::with_clock(&config, Arc::new(clock.clone()));
    (toaster, clock)
}

fn is_open(state: &ToastState) -> Option<bool> {
    state.toasts.first().map(|t| t.open)
}

fn record(toaster: &Toaster) -> (Arc<Mutex<Vec<ToastState>>>, toastkit_core::Subscription) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sub = {
        let log = log.clone();
        toaster.store().subscribe(move |s| log.lock().unwrap().push(s.clone()))
    };
    (log, sub)
}

#[test]
fn newer_toast_evicts_older_and_its_timers() {
    let (toaster, clock) = toaster(1);
    let a = toaster.toast(ToastRequest::new().title("A").duration(ToastDuration::Millis(100)));
    let b = toaster.toast(ToastRequest::new().title("B"));

    let state = toaster.snapshot();
    assert_eq!(state.len(), 1);
    assert_eq!(state.toasts[0].id, b.id());
    // only B's auto-dismiss remains
    assert_eq!(toaster.store().pending_timers(), 1);

    let (log, _sub) = record(&toaster);
    clock.advance(Duration::from_millis(1200));
    assert_eq!(toaster.tick(), 0);
    assert!(log.lock().unwrap().is_empty());

    // acting on the evicted handle is harmless
    a.dismiss();
    a.update(ToastPatch::new().title("ghost"));
    assert!(!toaster.snapshot().contains(a.id()));
    assert!(toaster.snapshot().toasts[0].open);
}

#[test]
fn auto_dismiss_fires_once_not_early() {
    let (toaster, clock) = toaster(1);
    let (log, _sub) = record(&toaster);
    toaster.toast(ToastRequest::new().duration(ToastDuration::Millis(300)));

    clock.advance(Duration::from_millis(299));
    toaster.tick();
    assert!(toaster.snapshot().toasts[0].open);

    clock.advance(Duration::from_millis(1));
    assert_eq!(toaster.tick(), 1);
    assert!(!toaster.snapshot().toasts[0].open);
    assert_eq!(toaster.tick(), 0);

    let dismissals = log
        .lock()
        .unwrap()
        .windows(2)
        .filter(|w| is_open(&w[0]) == Some(true) && is_open(&w[1]) == Some(false))
        .count();
    assert_eq!(dismissals, 1);
}

#[test]
fn never_duration_waits_for_explicit_dismiss() {
    let (toaster, clock) = toaster(1);
    let handle = toaster.toast(ToastRequest::new().duration(ToastDuration::Never));

    clock.advance(Duration::from_secs(24 * 3600));
    assert_eq!(toaster.tick(), 0);
    assert!(toaster.snapshot().toasts[0].open);

    handle.dismiss();
    assert!(!toaster.snapshot().toasts[0].open);

    clock.advance(Duration::from_millis(999));
    toaster.tick();
    assert_eq!(toaster.snapshot().len(), 1);

    clock.advance(Duration::from_millis(1));
    assert_eq!(toaster.tick(), 1);
    assert!(toaster.snapshot().is_empty());
}

#[test]
fn dismiss_all_closes_together_and_removes_after_grace() {
    let (toaster, clock) = toaster(2);
    toaster.toast(ToastRequest::new().duration(ToastDuration::Millis(10_000)));
    toaster.toast(ToastRequest::new().duration(ToastDuration::Never));

    let (log, _sub) = record(&toaster);
    toaster.dismiss(None);

    {
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert!(log[0].toasts.iter().all(|t| !t.open));
    }

    clock.advance(Duration::from_millis(1000));
    assert_eq!(toaster.tick(), 2);
    assert!(toaster.snapshot().is_empty());
    assert_eq!(toaster.store().pending_timers(), 0);
}

#[test]
fn remove_all_cancels_pending_removals() {
    let (toaster, clock) = toaster(2);
    toaster.toast(ToastRequest::new());
    toaster.toast(ToastRequest::new());
    toaster.dismiss(None);
    assert_eq!(toaster.store().pending_timers(), 2);

    toaster.remove(None);
    assert_eq!(toaster.store().pending_timers(), 0);

    let (log, _sub) = record(&toaster);
    clock.advance(Duration::from_secs(2));
    assert_eq!(toaster.tick(), 0);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn removal_fires_once_per_dismissal() {
    let (toaster, clock) = toaster(1);
    let handle = toaster.toast(ToastRequest::new().duration(ToastDuration::Never));
    handle.dismiss();
    clock.advance(Duration::from_millis(400));
    // repeated dismissals of a closed toast do not reset the grace delay
    handle.dismiss();
    handle.on_open_change(false);

    clock.advance(Duration::from_millis(600));
    assert_eq!(toaster.tick(), 1);
    assert!(toaster.snapshot().is_empty());

    clock.advance(Duration::from_secs(5));
    assert_eq!(toaster.tick(), 0);
}

#[test]
fn closed_toast_never_reopens() {
    let (toaster, _) = toaster(1);
    let handle = toaster.toast(ToastRequest::new().title("Low stock"));
    handle.dismiss();
    handle.update(ToastPatch::new().title("Low stock!").duration(ToastDuration::Millis(50)));
    handle.on_open_change(true);

    let state = toaster.snapshot();
    assert!(!state.toasts[0].open);
    assert_eq!(state.toasts[0].title.as_deref(), Some("Low stock!"));
}

#[test]
fn repeated_watch_cycles_do_not_leak_observers() {
    let (toaster, _) = toaster(1);
    for i in 0..500 {
        let sub = toaster.watch(|_| {});
        if i % 2 == 0 {
            toaster.toast(ToastRequest::new());
        }
        drop(sub);
    }
    assert_eq!(toaster.store().observer_count(), 0);
}
