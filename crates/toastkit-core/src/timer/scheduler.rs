//! Per-toast auto-dismiss and removal deadlines.
//!
//! Timers are plain deadlines, not threads. The owner feeds every state
//! transition through [`TimerScheduler::reconcile`] and pulls expired timers
//! with [`TimerScheduler::pop_due`]. Each toast has at most one pending timer
//! of each kind; arming again replaces the old deadline.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace};

use crate::id::ToastId;
use crate::toast::{Action, ToastState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Closes a visible toast once its duration has elapsed.
    AutoDismiss,
    /// Purges a closed toast after the grace delay.
    Removal,
}

/// An expired timer taken out of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub kind: TimerKind,
    pub id: ToastId,
    pub deadline: Instant,
}

impl DueTimer {
    /// The action this timer fires.
    pub fn action(&self) -> Action {
        match self.kind {
            TimerKind::AutoDismiss => Action::dismiss(self.id),
            TimerKind::Removal => Action::remove(self.id),
        }
    }
}

#[derive(Debug)]
pub struct TimerScheduler {
    remove_delay: Duration,
    dismiss_at: HashMap<ToastId, Instant>,
    remove_at: HashMap<ToastId, Instant>,
}

impl TimerScheduler {
    pub fn new(remove_delay: Duration) -> Self {
        Self {
            remove_delay,
            dismiss_at: HashMap::new(),
            remove_at: HashMap::new(),
        }
    }

    fn slots(&mut self, kind: TimerKind) -> &mut HashMap<ToastId, Instant> {
        match kind {
            TimerKind::AutoDismiss => &mut self.dismiss_at,
            TimerKind::Removal => &mut self.remove_at,
        }
    }

    /// Arm a timer, replacing any pending timer of the same kind for `id`.
    pub fn arm(&mut self, kind: TimerKind, id: ToastId, deadline: Instant) {
        if self.slots(kind).insert(id, deadline).is_some() {
            trace!(%id, ?kind, "superseded pending timer");
        }
        debug!(%id, ?kind, "timer armed");
    }

    /// Returns `true` if a pending timer was cancelled.
    pub fn cancel(&mut self, kind: TimerKind, id: ToastId) -> bool {
        let cancelled = self.slots(kind).remove(&id).is_some();
        if cancelled {
            debug!(%id, ?kind, "timer cancelled");
        }
        cancelled
    }

    pub fn deadline(&self, kind: TimerKind, id: ToastId) -> Option<Instant> {
        match kind {
            TimerKind::AutoDismiss => self.dismiss_at.get(&id).copied(),
            TimerKind::Removal => self.remove_at.get(&id).copied(),
        }
    }

    /// Number of pending timers of both kinds.
    pub fn pending(&self) -> usize {
        self.dismiss_at.len() + self.remove_at.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.dismiss_at.values().chain(self.remove_at.values()).min().copied()
    }

    /// Take the earliest timer whose deadline is at or before `now`.
    ///
    /// Ties are broken by kind, then id, so firing order is deterministic.
    pub fn pop_due(&mut self, now: Instant) -> Option<DueTimer> {
        let dismiss = self
            .dismiss_at
            .iter()
            .map(|(&id, &deadline)| (deadline, TimerKind::AutoDismiss, id));
        let remove = self
            .remove_at
            .iter()
            .map(|(&id, &deadline)| (deadline, TimerKind::Removal, id));
        let (deadline, kind, id) = dismiss.chain(remove).filter(|(d, ..)| *d <= now).min()?;
        self.slots(kind).remove(&id);
        Some(DueTimer { kind, id, deadline })
    }

    /// Bring pending timers in line with the transition `prev -> next`
    /// caused by `action` at instant `at`.
    pub fn reconcile(
        &mut self,
        prev: &ToastState,
        next: &ToastState,
        action: &Action,
        at: Instant,
    ) {
        let before = self.pending();
        self.dismiss_at.retain(|id, _| next.contains(*id));
        self.remove_at.retain(|id, _| next.contains(*id));
        if self.pending() < before {
            debug!(dropped = before - self.pending(), "timers dropped for purged toasts");
        }

        for toast in &next.toasts {
            match prev.get(toast.id) {
                None if toast.open => {
                    if let Some(after) = toast.duration.as_duration() {
                        self.arm(TimerKind::AutoDismiss, toast.id, at + after);
                    }
                }
                None => {
                    self.arm(TimerKind::Removal, toast.id, at + self.remove_delay);
                }
                Some(old) if old.open && !toast.open => {
                    self.cancel(TimerKind::AutoDismiss, toast.id);
                    self.arm(TimerKind::Removal, toast.id, at + self.remove_delay);
                }
                Some(old) if toast.open && old.duration != toast.duration => {
                    let updated = matches!(action, Action::Update { id, .. } if *id == toast.id);
                    if updated {
                        match toast.duration.as_duration() {
                            Some(after) => self.arm(TimerKind::AutoDismiss, toast.id, at + after),
                            None => {
                                self.cancel(TimerKind::AutoDismiss, toast.id);
                            }
                        }
                    }
                }
                Some(_) => {}
            }
        }
    }
}
