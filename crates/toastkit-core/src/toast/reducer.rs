//! Pure queue transitions.
//!
//! `reduce` never mutates its input and never reads the clock; the same
//! state and action always produce the same next state.

use serde::{Deserialize, Serialize};

use super::model::{Toast, ToastPatch};
use crate::id::ToastId;

/// The toast queue, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
}

impl ToastState {
    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: ToastId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ToastId> + '_ {
        self.toasts.iter().map(|t| t.id)
    }
}

/// Every transition the queue accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Add {
        toast: Toast,
    },
    Update {
        id: ToastId,
        patch: ToastPatch,
    },
    /// Close one toast, or every toast when `id` is `None`.
    Dismiss {
        #[serde(default)]
        id: Option<ToastId>,
    },
    /// Drop one toast, or clear the queue when `id` is `None`.
    Remove {
        #[serde(default)]
        id: Option<ToastId>,
    },
}

impl Action {
    pub fn add(toast: Toast) -> Self {
        Action::Add { toast }
    }

    pub fn update(id: ToastId, patch: ToastPatch) -> Self {
        Action::Update { id, patch }
    }

    pub fn dismiss(id: impl Into<Option<ToastId>>) -> Self {
        Action::Dismiss { id: id.into() }
    }

    pub fn remove(id: impl Into<Option<ToastId>>) -> Self {
        Action::Remove { id: id.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Add { .. } => "add",
            Action::Update { .. } => "update",
            Action::Dismiss { .. } => "dismiss",
            Action::Remove { .. } => "remove",
        }
    }
}

/// Apply `action` to `state`, keeping at most `capacity` toasts.
///
/// # Panics
///
/// Panics if an `Add` carries an id that is already queued.
pub fn reduce(state: &ToastState, action: &Action, capacity: usize) -> ToastState {
    match action {
        Action::Add { toast } => {
            assert!(
                !state.contains(toast.id),
                "toast id {} added twice",
                toast.id
            );
            let toasts = std::iter::once(toast.clone())
                .chain(state.toasts.iter().cloned())
                .take(capacity)
                .collect();
            ToastState { toasts }
        }
        Action::Update { id, patch } => ToastState {
            toasts: state
                .toasts
                .iter()
                .map(|t| {
                    let mut t = t.clone();
                    if t.id == *id {
                        patch.apply_to(&mut t);
                    }
                    t
                })
                .collect(),
        },
        Action::Dismiss { id } => ToastState {
            toasts: state
                .toasts
                .iter()
                .map(|t| {
                    let mut t = t.clone();
                    if id.map_or(true, |id| id == t.id) {
                        t.open = false;
                    }
                    t
                })
                .collect(),
        },
        Action::Remove { id: None } => ToastState::default(),
        Action::Remove { id: Some(id) } => ToastState {
            toasts: state.toasts.iter().filter(|t| t.id != *id).cloned().collect(),
        },
    }
}
