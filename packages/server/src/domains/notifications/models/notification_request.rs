use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use typed_builder::TypedBuilder;

use crate::common::UserId;

/// A notification addressed to a user
///
/// Fire-and-forget: nothing about a request is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    #[builder(setter(into))]
    pub user_id: UserId,
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub body: String,
    #[builder(default, setter(strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl NotificationRequest {
    /// Data payload as a JSON value (`{}` when absent)
    pub fn data_value(&self) -> Value {
        Value::Object(self.data.clone().unwrap_or_default())
    }
}
