mod clock;
pub mod driver;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use driver::DriverHandle;
pub use scheduler::{DueTimer, TimerKind, TimerScheduler};
