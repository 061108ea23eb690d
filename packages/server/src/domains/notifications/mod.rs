//! Notifications domain - addressing and delivery of user notifications
//!
//! Handlers address notifications to a user id; the dispatcher resolves the
//! user's push token and hands the message to the push service.

pub mod dispatcher;
pub mod models;

pub use dispatcher::PushNotificationDispatcher;
pub use models::notification_request::NotificationRequest;
