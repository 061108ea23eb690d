use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, instrument};

use super::NotificationRequest;
use crate::domains::users::models::user_record::{UserRecord, USERS_COLLECTION};
use crate::kernel::{BaseDocumentStore, BaseNotificationDispatcher, BasePushNotificationService};

/// Notification dispatcher backed by device push
///
/// Resolves the target user's push token from their user record. A user
/// without a record or without a registered token has nowhere to deliver
/// to; that is skipped, not reported as a failure.
pub struct PushNotificationDispatcher {
    documents: Arc<dyn BaseDocumentStore>,
    push_service: Arc<dyn BasePushNotificationService>,
}

impl PushNotificationDispatcher {
    pub fn new(
        documents: Arc<dyn BaseDocumentStore>,
        push_service: Arc<dyn BasePushNotificationService>,
    ) -> Self {
        Self {
            documents,
            push_service,
        }
    }

    async fn push_token(&self, request: &NotificationRequest) -> Result<Option<String>> {
        let Some(document) = self
            .documents
            .get(USERS_COLLECTION, request.user_id.as_str())
            .await?
        else {
            return Ok(None);
        };

        let record: UserRecord = document.parse()?;
        Ok(record.push_token.filter(|token| !token.trim().is_empty()))
    }
}

#[async_trait]
impl BaseNotificationDispatcher for PushNotificationDispatcher {
    #[instrument(skip(self, request), fields(user_id = %request.user_id, title = %request.title))]
    async fn send(&self, request: &NotificationRequest) -> Result<()> {
        let Some(token) = self.push_token(request).await? else {
            debug!("No push token registered, skipping notification");
            return Ok(());
        };

        self.push_service
            .send_notification(&token, &request.title, &request.body, request.data_value())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to deliver push notification");
                e
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{InMemoryDocumentStore, MockPushNotificationService};
    use crate::kernel::DocumentWrite;
    use serde_json::json;

    async fn dispatcher_with_user(
        user: serde_json::Value,
    ) -> (PushNotificationDispatcher, Arc<MockPushNotificationService>) {
        let documents = Arc::new(InMemoryDocumentStore::new());
        documents
            .set(USERS_COLLECTION, "u1", DocumentWrite::from_model(&user).unwrap())
            .await
            .unwrap();
        let push = Arc::new(MockPushNotificationService::new());
        (
            PushNotificationDispatcher::new(documents, push.clone()),
            push,
        )
    }

    fn request() -> NotificationRequest {
        NotificationRequest::builder()
            .user_id("u1")
            .title("Welcome to Our App!")
            .body("Thanks for joining our community.")
            .build()
    }

    #[tokio::test]
    async fn test_delivers_to_registered_token() {
        let (dispatcher, push) = dispatcher_with_user(json!({
            "uid": "u1",
            "role": "customer",
            "pushToken": "ExponentPushToken[abc]",
        }))
        .await;

        dispatcher.send(&request()).await.unwrap();

        let sent = push.sent_notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "ExponentPushToken[abc]");
        assert_eq!(sent[0].1, "Welcome to Our App!");
    }

    #[tokio::test]
    async fn test_skips_user_without_token() {
        let (dispatcher, push) =
            dispatcher_with_user(json!({"uid": "u1", "role": "customer"})).await;

        dispatcher.send(&request()).await.unwrap();

        assert!(push.sent_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_skips_unknown_user() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let push = Arc::new(MockPushNotificationService::new());
        let dispatcher = PushNotificationDispatcher::new(documents, push.clone());

        dispatcher.send(&request()).await.unwrap();

        assert!(push.sent_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_push_failure_is_reported() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        documents
            .set(
                USERS_COLLECTION,
                "u1",
                DocumentWrite::from_model(&json!({"uid": "u1", "pushToken": "tok"})).unwrap(),
            )
            .await
            .unwrap();
        let push = Arc::new(MockPushNotificationService::new().failing());
        let dispatcher = PushNotificationDispatcher::new(documents, push);

        assert!(dispatcher.send(&request()).await.is_err());
    }
}
