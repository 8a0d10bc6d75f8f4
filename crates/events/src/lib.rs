//! Domain events + notification sink.

pub mod event;
pub mod notification;

pub use event::Event;
pub use notification::{Notification, NotificationLog, NotificationSink};
