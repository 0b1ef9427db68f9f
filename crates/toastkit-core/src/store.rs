//! The dispatch hub: sole owner and mutator of the toast queue.
//!
//! A [`ToastStore`] is created once at application start and cloned into
//! whatever needs it. `dispatch` runs the reducer, reconciles timers and
//! then calls every observer, in registration order, with the new snapshot.
//!
//! The lock is never held while observers run. One thread at a time owns the
//! notification round. An observer that dispatches enqueues its action and
//! the round applies it once the current snapshot has reached everyone, so
//! nothing recurses. Other threads wait for the round to finish and then run
//! their own, so `dispatch` has always applied its action when it returns.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};
use std::time::Instant;

use tokio::sync::Notify;
use tracing::{debug, trace};

use crate::config::ToastConfig;
use crate::timer::{Clock, SystemClock, TimerScheduler};
use crate::toast::{reduce, Action, ToastState};

type Observer = Arc<dyn Fn(&ToastState) + Send + Sync>;

/// Registration key handed out by [`ToastStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Inner {
    capacity: usize,
    state: Arc<ToastState>,
    // Keys increase monotonically, so map order is registration order.
    observers: BTreeMap<SubscriptionId, Observer>,
    next_subscription: u64,
    pending: VecDeque<(Action, Instant)>,
    // Thread currently running a notification round.
    drainer: Option<ThreadId>,
    timers: TimerScheduler,
}

struct Shared {
    inner: Mutex<Inner>,
    idle: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct ToastStore {
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    wake: Arc<Notify>,
}

impl fmt::Debug for ToastStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("ToastStore")
            .field("capacity", &inner.capacity)
            .field("toasts", &inner.state.len())
            .field("observers", &inner.observers.len())
            .field("pending_timers", &inner.timers.pending())
            .finish()
    }
}

impl ToastStore {
    pub fn new(config: &ToastConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &ToastConfig, clock: Arc<dyn Clock>) -> Self {
        let inner = Inner {
            capacity: config.capacity(),
            state: Arc::new(ToastState::default()),
            observers: BTreeMap::new(),
            next_subscription: 0,
            pending: VecDeque::new(),
            drainer: None,
            timers: TimerScheduler::new(config.remove_delay()),
        };
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                idle: Condvar::new(),
            }),
            clock,
            wake: Arc::new(Notify::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared.lock()
    }

    /// Take ownership of the notification round, waiting for another
    /// thread's round to finish first. Returns `false` when the calling
    /// thread already owns it (an observer calling back into the store).
    fn claim(&self) -> (MutexGuard<'_, Inner>, bool) {
        let me = thread::current().id();
        let mut inner = self.lock();
        if inner.drainer == Some(me) {
            return (inner, false);
        }
        while inner.drainer.is_some() {
            inner = self.shared.idle.wait(inner).unwrap_or_else(PoisonError::into_inner);
        }
        inner.drainer = Some(me);
        (inner, true)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current queue snapshot.
    pub fn state(&self) -> Arc<ToastState> {
        Arc::clone(&self.lock().state)
    }

    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.lock().timers.pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.lock().timers.next_deadline()
    }

    /// Signalled after every drained dispatch. Used by the timer driver to
    /// pick up newly armed deadlines.
    pub(crate) fn wake_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn dispatch(&self, action: Action) {
        let now = self.clock.now();
        self.dispatch_at(action, now);
    }

    /// Register an observer for every future snapshot.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&ToastState) + Send + Sync + 'static,
    {
        self.register(&mut self.lock(), Arc::new(observer))
    }

    /// Register an observer and hand it the current snapshot first.
    ///
    /// No dispatch can land between the snapshot and the registration, so
    /// the observer sees every state from the current one on.
    pub fn watch<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&ToastState) + Send + Sync + 'static,
    {
        let observer: Observer = Arc::new(observer);
        let (subscription, current, owner) = {
            let (mut inner, owner) = self.claim();
            let subscription = self.register(&mut inner, Arc::clone(&observer));
            (subscription, Arc::clone(&inner.state), owner)
        };
        if owner {
            {
                let _reset = DrainGuard { store: self };
                observer(&current);
            }
            // Apply whatever the observer dispatched, then release the round.
            self.drain();
        } else {
            observer(&current);
        }
        subscription
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove_observer(&mut self.lock(), id)
    }

    /// Fire every timer that has expired by now. Returns how many fired.
    pub fn tick(&self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        loop {
            let due = self.lock().timers.pop_due(now);
            let Some(due) = due else { break };
            debug!(id = %due.id, kind = ?due.kind, "timer fired");
            // Follow-up timers are measured from the deadline, not from
            // when the tick happened to run.
            self.dispatch_at(due.action(), due.deadline);
            fired += 1;
        }
        fired
    }

    fn register(&self, inner: &mut Inner, observer: Observer) -> Subscription {
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.observers.insert(id, observer);
        trace!(?id, "observer subscribed");
        Subscription {
            id,
            store: Arc::downgrade(&self.shared),
        }
    }

    fn dispatch_at(&self, action: Action, at: Instant) {
        let (mut inner, owner) = self.claim();
        inner.pending.push_back((action, at));
        if !owner {
            trace!("dispatch queued behind current round");
            return;
        }
        drop(inner);
        self.drain();
    }

    /// Apply queued actions until none are left, then give up the round.
    /// Only the thread that claimed the round calls this.
    fn drain(&self) {
        let _reset = DrainGuard { store: self };
        loop {
            let (snapshot, observers) = {
                let mut inner = self.lock();
                let Some((action, at)) = inner.pending.pop_front() else {
                    inner.drainer = None;
                    break;
                };
                let next = reduce(&inner.state, &action, inner.capacity);
                if next == *inner.state {
                    trace!(kind = action.kind(), "action changed nothing");
                } else {
                    debug!(kind = action.kind(), toasts = next.len(), "action applied");
                }
                let prev = Arc::clone(&inner.state);
                inner.timers.reconcile(&prev, &next, &action, at);
                inner.state = Arc::new(next);
                let observers: Vec<_> = inner.observers.keys().copied().collect();
                (Arc::clone(&inner.state), observers)
            };

            for id in observers {
                // Skip observers unsubscribed earlier in this round.
                let observer = self.lock().observers.get(&id).cloned();
                if let Some(observer) = observer {
                    observer(&snapshot);
                }
            }
        }
        self.shared.idle.notify_all();
        self.wake.notify_one();
    }
}

/// Gives up the round if an observer or the reducer panics mid-drain.
/// Queued actions stay queued for whichever caller runs the next round.
struct DrainGuard<'a> {
    store: &'a ToastStore,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            let mut inner = self.store.lock();
            inner.drainer = None;
            if !inner.pending.is_empty() {
                debug!(queued = inner.pending.len(), "round aborted, actions kept");
            }
            drop(inner);
            self.store.shared.idle.notify_all();
        }
    }
}

fn remove_observer(inner: &mut Inner, id: SubscriptionId) -> bool {
    let removed = inner.observers.remove(&id).is_some();
    if removed {
        trace!(?id, "observer unsubscribed");
    }
    removed
}

/// Live registration of an observer. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    store: Weak<Shared>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Stop receiving snapshots. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(shared) = self.store.upgrade() {
            remove_observer(&mut shared.lock(), self.id);
        }
        self.store = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
