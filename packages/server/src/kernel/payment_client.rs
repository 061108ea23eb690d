use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use super::{BasePaymentProcessor, PaymentCharge, PaymentReceipt};

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// HTTP client for the payment service
///
/// The service owns settlement state; this client only submits a charge and
/// reports whether it was confirmed.
pub struct PaymentServiceClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

/// Payment service response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResponse {
    status: String,
    #[serde(default)]
    transaction_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl PaymentServiceClient {
    /// Create a new payment service client
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    /// Charge request keyed by order, so the service settles an order at most once
    fn charge_request(&self, charge: &PaymentCharge) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/v1/payments", self.base_url))
            .bearer_auth(&self.api_key)
            .header(IDEMPOTENCY_KEY_HEADER, charge.order_id.as_str())
            .json(charge)
    }
}

/// Interpret a decoded response: only `succeeded` with a transaction id counts
fn into_receipt(response: PaymentResponse) -> Result<PaymentReceipt> {
    match (response.status.as_str(), response.transaction_id) {
        ("succeeded", Some(transaction_id)) => Ok(PaymentReceipt { transaction_id }),
        ("succeeded", None) => anyhow::bail!("Payment service returned no transaction id"),
        (status, _) => anyhow::bail!(
            "Payment {}: {}",
            status,
            response.error.as_deref().unwrap_or("no reason given")
        ),
    }
}

#[async_trait]
impl BasePaymentProcessor for PaymentServiceClient {
    async fn process(&self, charge: PaymentCharge) -> Result<PaymentReceipt> {
        let response = self
            .charge_request(&charge)
            .send()
            .await
            .context("Failed to send payment request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(order_id = %charge.order_id, "Payment service error {}: {}", status, body);
            anyhow::bail!("Payment service error {}: {}", status, body);
        }

        let payment_response: PaymentResponse = response
            .json()
            .await
            .context("Failed to parse payment response")?;

        let receipt = into_receipt(payment_response)?;
        info!(
            order_id = %charge.order_id,
            transaction_id = %receipt.transaction_id,
            "Payment confirmed"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{OrderId, UserId};
    use rust_decimal::Decimal;

    fn parse(body: &str) -> PaymentResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_succeeded_yields_receipt() {
        let receipt =
            into_receipt(parse(r#"{"status":"succeeded","transactionId":"tx_1"}"#)).unwrap();
        assert_eq!(receipt.transaction_id, "tx_1");
    }

    #[test]
    fn test_declined_is_failure() {
        let error = into_receipt(parse(r#"{"status":"declined","error":"insufficient funds"}"#))
            .unwrap_err();
        assert_eq!(error.to_string(), "Payment declined: insufficient funds");
    }

    #[test]
    fn test_success_without_transaction_is_failure() {
        assert!(into_receipt(parse(r#"{"status":"succeeded"}"#)).is_err());
    }

    #[test]
    fn test_charge_request_is_keyed_by_order() {
        let client =
            PaymentServiceClient::new("https://pay.example".to_string(), "key".to_string())
                .unwrap();
        let charge = PaymentCharge {
            user_id: UserId::new("u1"),
            amount: Decimal::from(50),
            method: "card".to_string(),
            order_id: OrderId::new("o1"),
        };

        let request = client.charge_request(&charge).build().unwrap();

        assert_eq!(request.url().as_str(), "https://pay.example/v1/payments");
        assert_eq!(request.headers()[IDEMPOTENCY_KEY_HEADER], "o1");
        assert_eq!(request.headers()["authorization"], "Bearer key");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            PaymentServiceClient::new("https://pay.example/".to_string(), "k".to_string())
                .unwrap();
        assert_eq!(client.base_url, "https://pay.example");
    }
}
