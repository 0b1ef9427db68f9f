mod model;
mod reducer;

pub use model::{Toast, ToastActionButton, ToastDuration, ToastPatch, ToastRequest, Variant};
pub use reducer::{reduce, Action, ToastState};
