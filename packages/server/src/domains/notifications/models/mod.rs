pub mod notification_request;
