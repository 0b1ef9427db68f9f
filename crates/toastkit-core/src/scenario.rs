//! Scripted toast scenarios on a manual clock.
//!
//! A scenario is a TOML list of steps. Toasts are referred to by labels
//! because ids are only known once the toast is raised:
//!
//! ```toml
//! capacity = 2
//!
//! [[steps]]
//! type = "toast"
//! label = "saved"
//! title = "Product saved"
//! duration = { millis = 100 }
//!
//! [[steps]]
//! type = "advance"
//! ms = 1200
//! ```
//!
//! Running it records every state the observers would have seen, stamped
//! with the simulated time.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ToastConfig;
use crate::error::ScenarioError;
use crate::id::ToastId;
use crate::timer::{Clock, ManualClock};
use crate::toast::{Toast, ToastActionButton, ToastDuration, ToastPatch, ToastRequest, Variant};
use crate::toaster::Toaster;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Toast {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        variant: Option<Variant>,
        #[serde(default)]
        duration: Option<ToastDuration>,
        #[serde(default)]
        action: Option<ToastActionButton>,
    },
    Update {
        label: String,
        patch: ToastPatch,
    },
    /// Dismiss one toast, or all when `label` is omitted.
    Dismiss {
        #[serde(default)]
        label: Option<String>,
    },
    /// The view reports the toast was closed by the user.
    Close {
        label: String,
    },
    /// Remove one toast, or all when `label` is omitted.
    Remove {
        #[serde(default)]
        label: Option<String>,
    },
    /// Move the clock forward, firing timers as their deadlines pass.
    Advance {
        ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    /// Overrides the configured queue capacity.
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One observed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Simulated milliseconds since the scenario started.
    pub at_ms: u64,
    /// Index of the step that produced this state.
    pub step: usize,
    pub toasts: Vec<Toast>,
}

impl Scenario {
    pub fn from_toml(content: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Run every step and return the frames in the order observed.
    pub fn run(&self, config: &ToastConfig) -> Result<Vec<Frame>, ScenarioError> {
        let mut config = config.clone();
        if let Some(capacity) = self.capacity {
            config.queue.capacity = capacity;
            config.validate()?;
        }

        let clock = ManualClock::new();
        let toaster = Toaster::with_clock(&config, Arc::new(clock.clone()));
        let frames = Arc::new(Mutex::new(Vec::new()));
        let current_step = Arc::new(AtomicUsize::new(0));

        let _recorder = {
            let frames = Arc::clone(&frames);
            let current_step = Arc::clone(&current_step);
            let clock = clock.clone();
            toaster.store().subscribe(move |state| {
                let frame = Frame {
                    at_ms: u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX),
                    step: current_step.load(Ordering::Relaxed),
                    toasts: state.toasts.clone(),
                };
                frames.lock().unwrap_or_else(PoisonError::into_inner).push(frame);
            })
        };

        let mut labels: HashMap<String, ToastId> = HashMap::new();
        for (index, step) in self.steps.iter().enumerate() {
            current_step.store(index, Ordering::Relaxed);
            match step {
                Step::Toast {
                    label,
                    title,
                    description,
                    variant,
                    duration,
                    action,
                } => {
                    if let Some(label) = label {
                        if labels.contains_key(label) {
                            return Err(ScenarioError::DuplicateLabel {
                                step: index,
                                label: label.clone(),
                            });
                        }
                    }
                    let request = ToastRequest {
                        title: title.clone(),
                        description: description.clone(),
                        variant: *variant,
                        duration: *duration,
                        action: action.clone(),
                    };
                    let handle = toaster.toast(request);
                    if let Some(label) = label {
                        labels.insert(label.clone(), handle.id());
                    }
                }
                Step::Update { label, patch } => {
                    toaster.update(resolve(&labels, index, label)?, patch.clone());
                }
                Step::Dismiss { label } => {
                    let id = label
                        .as_deref()
                        .map(|label| resolve(&labels, index, label))
                        .transpose()?;
                    toaster.dismiss(id);
                }
                Step::Close { label } => {
                    toaster.on_open_change(resolve(&labels, index, label)?, false);
                }
                Step::Remove { label } => {
                    let id = label
                        .as_deref()
                        .map(|label| resolve(&labels, index, label))
                        .transpose()?;
                    toaster.remove(id);
                }
                Step::Advance { ms } => advance(&toaster, &clock, Duration::from_millis(*ms)),
            }
        }

        let frames = frames.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(frames)
    }
}

fn resolve(
    labels: &HashMap<String, ToastId>,
    step: usize,
    label: &str,
) -> Result<ToastId, ScenarioError> {
    labels
        .get(label)
        .copied()
        .ok_or_else(|| ScenarioError::UnknownLabel {
            step,
            label: label.to_string(),
        })
}

/// Walk the clock deadline by deadline so each firing is observed at its
/// own instant.
fn advance(toaster: &Toaster, clock: &ManualClock, by: Duration) {
    let target = clock.now() + by;
    while let Some(deadline) = toaster.next_deadline().filter(|d| *d <= target) {
        clock.advance(deadline.saturating_duration_since(clock.now()));
        toaster.tick();
    }
    clock.advance(target.saturating_duration_since(clock.now()));
}
