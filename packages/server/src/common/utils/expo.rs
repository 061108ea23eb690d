use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::kernel::BasePushNotificationService;

/// Expo push API endpoint
pub const EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Expo Push Notification Client
/// Delivers push notifications to devices registered with an Expo push token
pub struct ExpoClient {
    client: Client,
    access_token: Option<String>,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ExpoMessage {
    to: String,
    title: String,
    body: String,
    data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpoResponse {
    data: Vec<ExpoTicket>,
}

#[derive(Debug, Deserialize)]
struct ExpoTicket {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl ExpoClient {
    pub fn new(access_token: Option<String>) -> Result<Self> {
        Self::with_endpoint(access_token, EXPO_PUSH_URL)
    }

    /// Point the client at a different push endpoint (staging relays)
    pub fn with_endpoint(access_token: Option<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            access_token,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl BasePushNotificationService for ExpoClient {
    async fn send_notification(
        &self,
        push_token: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> Result<()> {
        let message = ExpoMessage {
            to: push_token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            data,
            sound: Some("default".to_string()),
        };

        let mut request = self.client.post(&self.endpoint).json(&message);

        // Access token raises the rate limit and is required when push security is enabled
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        info!("Sending Expo push notification to: {}", push_token);

        let response = request
            .send()
            .await
            .context("Failed to send Expo push request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Expo push failed {}: {}", status, body);
            anyhow::bail!("Expo push API error {}: {}", status, body);
        }

        let expo_response: ExpoResponse = response
            .json()
            .await
            .context("Failed to parse Expo push response")?;

        if let Some(ticket) = expo_response.data.iter().find(|t| t.status == "error") {
            error!("Expo ticket error: {:?}", ticket);
            anyhow::bail!(
                "Expo ticket error: {}",
                ticket.message.as_deref().unwrap_or("unknown")
            );
        }

        info!("Expo notification sent successfully");
        Ok(())
    }
}
