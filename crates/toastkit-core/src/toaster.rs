//! Binding surface for presentation code.
//!
//! ```ignore
//! let toaster = Toaster::new(&ToastConfig::default());
//! let _sub = toaster.watch(|state| render(&state.toasts));
//!
//! let handle = toaster.toast(ToastRequest::new().title("Product saved"));
//! handle.update(ToastPatch::new().description("Visible in the storefront"));
//! handle.dismiss();
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::config::ToastConfig;
use crate::id::{IdGenerator, ToastId};
use crate::store::{Subscription, ToastStore};
use crate::timer::{driver, Clock, DriverHandle};
use crate::toast::{Action, ToastDuration, ToastPatch, ToastRequest, ToastState};

/// Raises toasts and exposes the live queue.
#[derive(Debug, Clone)]
pub struct Toaster {
    store: ToastStore,
    ids: Arc<IdGenerator>,
    default_duration: ToastDuration,
}

impl Toaster {
    pub fn new(config: &ToastConfig) -> Self {
        Self::from_store(ToastStore::new(config), config)
    }

    pub fn with_clock(config: &ToastConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_store(ToastStore::with_clock(config, clock), config)
    }

    pub fn from_store(store: ToastStore, config: &ToastConfig) -> Self {
        Self {
            store,
            ids: Arc::new(IdGenerator::new()),
            default_duration: config.default_duration(),
        }
    }

    pub fn store(&self) -> &ToastStore {
        &self.store
    }

    /// Queue a new toast and return a handle scoped to it.
    pub fn toast(&self, request: ToastRequest) -> ToastHandle {
        let id = self.ids.next();
        let toast = request.into_toast(id, self.default_duration);
        tracing::debug!(%id, variant = ?toast.variant, "toast requested");
        self.store.dispatch(Action::add(toast));
        ToastHandle {
            id,
            store: self.store.clone(),
        }
    }

    /// Close one toast, or all of them when `id` is `None`.
    pub fn dismiss(&self, id: impl Into<Option<ToastId>>) {
        self.store.dispatch(Action::dismiss(id));
    }

    /// Drop one toast, or clear the queue, without the grace delay.
    pub fn remove(&self, id: impl Into<Option<ToastId>>) {
        self.store.dispatch(Action::remove(id));
    }

    pub fn update(&self, id: ToastId, patch: ToastPatch) {
        self.store.dispatch(Action::update(id, patch));
    }

    /// Visibility callback for the rendering layer; closing dismisses.
    pub fn on_open_change(&self, id: ToastId, open: bool) {
        if !open {
            self.dismiss(id);
        }
    }

    pub fn snapshot(&self) -> Arc<ToastState> {
        self.store.state()
    }

    /// Deliver the current snapshot now, then every change until the
    /// returned subscription is dropped.
    pub fn watch<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&ToastState) + Send + Sync + 'static,
    {
        self.store.watch(observer)
    }

    /// Fire expired timers. For callers that drive time themselves.
    pub fn tick(&self) -> usize {
        self.store.tick()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.store.next_deadline()
    }

    /// Run the timers on the current tokio runtime.
    pub fn spawn_driver(&self) -> DriverHandle {
        driver::spawn(self.store.clone())
    }
}

/// Handle to one raised toast.
#[derive(Debug, Clone)]
pub struct ToastHandle {
    id: ToastId,
    store: ToastStore,
}

impl ToastHandle {
    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn update(&self, patch: ToastPatch) {
        self.store.dispatch(Action::update(self.id, patch));
    }

    pub fn dismiss(&self) {
        self.store.dispatch(Action::dismiss(self.id));
    }

    pub fn on_open_change(&self, open: bool) {
        if !open {
            self.dismiss();
        }
    }
}
