#![forbid(unsafe_code)]

pub mod model;
pub mod notify;
pub mod session;
pub mod time;

pub use notify::{Notification, NotificationSink, NullSink, Tone};
pub use session::{Intent, IntentError, LessonSession, SessionSnapshot};
pub use time::Clock;
