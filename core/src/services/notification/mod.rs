//! Outbound notification module
//!
//! OTP codes and order updates reach customers and team members by SMS.
//! The lifecycle never waits on delivery: it submits an
//! [`OutboundNotification`] to a [`NotificationSink`], and the
//! [`NotificationDispatcher`] hands it to a [`NotificationTransport`] on a
//! background task, publishing a [`NotificationEvent`] for each outcome.

mod dispatcher;
mod templates;
mod traits;


pub use dispatcher::{NotificationDispatcher, NotificationEvent};
pub use templates::NotificationMessage;
pub use traits::{NotificationSink, NotificationTransport, OutboundNotification};
