use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ToastId;

/// Rendering hint. The engine never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Default,
    Destructive,
    Success,
}

/// How long a toast stays visible before it is dismissed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastDuration {
    Millis(u64),
    /// Stays open until dismissed explicitly.
    Never,
}

impl ToastDuration {
    /// `None` for [`ToastDuration::Never`].
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            ToastDuration::Millis(ms) => Some(Duration::from_millis(ms)),
            ToastDuration::Never => None,
        }
    }
}

/// Call-to-action button shown next to the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastActionButton {
    pub label: String,
    /// Accessible description of what the button does.
    #[serde(default)]
    pub alt_text: String,
}

/// A single notification in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: ToastId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ToastActionButton>,
    /// `true` while visible, `false` once dismissed. Never flips back.
    pub open: bool,
    pub duration: ToastDuration,
    pub created_at: DateTime<Utc>,
}

/// What a caller asks for when raising a toast.
///
/// Unset `duration` falls back to the configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub duration: Option<ToastDuration>,
    #[serde(default)]
    pub action: Option<ToastActionButton>,
}

impl ToastRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn duration(mut self, duration: ToastDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn action(mut self, label: impl Into<String>, alt_text: impl Into<String>) -> Self {
        self.action = Some(ToastActionButton {
            label: label.into(),
            alt_text: alt_text.into(),
        });
        self
    }

    /// Build the open toast this request describes.
    pub fn into_toast(self, id: ToastId, default_duration: ToastDuration) -> Toast {
        Toast {
            id,
            title: self.title,
            description: self.description,
            variant: self.variant.unwrap_or_default(),
            action: self.action,
            open: true,
            duration: self.duration.unwrap_or(default_duration),
            created_at: Utc::now(),
        }
    }
}

/// Partial content update.
///
/// Only fields that are `Some` replace the toast's values; there is no way
/// to clear a field back to empty. Visibility is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<ToastDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ToastActionButton>,
}

impl ToastPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn duration(mut self, duration: ToastDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge over `toast`.
    pub fn apply_to(&self, toast: &mut Toast) {
        if let Some(title) = &self.title {
            toast.title = Some(title.clone());
        }
        if let Some(description) = &self.description {
            toast.description = Some(description.clone());
        }
        if let Some(variant) = self.variant {
            toast.variant = variant;
        }
        if let Some(duration) = self.duration {
            toast.duration = duration;
        }
        if let Some(action) = &self.action {
            toast.action = Some(action.clone());
        }
    }
}
