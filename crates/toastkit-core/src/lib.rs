//! # Toastkit Core Library
//!
//! In-memory engine behind the marketplace UI's toast notifications: a
//! bounded, newest-first queue of transient messages, each with its own
//! auto-dismiss and removal timing.
//!
//! ## Architecture
//!
//! - **Reducer**: pure `(state, action) -> state` transitions
//! - **Store**: the single owner of the queue; dispatches actions and
//!   notifies observers synchronously
//! - **Timers**: per-toast deadlines fired by `tick()`, either from the
//!   caller's own loop or from the tokio driver
//! - **Toaster**: the surface presentation code talks to
//!
//! ## Key Components
//!
//! - [`Toaster`]: raise, update and dismiss toasts; watch the queue
//! - [`ToastStore`]: dispatch hub and observer registry
//! - [`TimerScheduler`]: auto-dismiss and removal deadlines
//! - [`ToastConfig`]: capacity and timing configuration

pub mod config;
pub mod error;
pub mod id;
pub mod scenario;
pub mod store;
pub mod timer;
pub mod toast;
pub mod toaster;

pub use config::ToastConfig;
pub use error::{ConfigError, CoreError, ScenarioError};
pub use id::{IdGenerator, ToastId};
pub use scenario::{Frame, Scenario, Step};
pub use store::{Subscription, SubscriptionId, ToastStore};
pub use timer::{
    Clock, DriverHandle, ManualClock, SystemClock, TimerKind, TimerScheduler, TokioClock,
};
pub use toast::{
    reduce, Action, Toast, ToastActionButton, ToastDuration, ToastPatch, ToastRequest, ToastState,
    Variant,
};
pub use toaster::{ToastHandle, Toaster};
