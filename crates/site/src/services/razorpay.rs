//! Razorpay payment gateway adapter.
//!
//! Creates remote payment intents ahead of checkout and verifies the
//! HMAC-SHA256 callback signature (`key_secret` is the shared signing key,
//! signed payload is `"{gateway_order_id}|{payment_id}"`, hex-encoded).

use std::future::Future;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

use crate::config::RazorpayConfig;

type HmacSha256 = Hmac<Sha256>;

/// Razorpay API base URL.
const BASE_URL: &str = "https://api.razorpay.com/v1";

/// Errors from the payment gateway boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed (network, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("gateway error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// A remote payment intent created before the buyer completes payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Gateway-side order identifier, correlated with our order ledger.
    pub id: String,
    /// Amount in minor units, echoed back by the gateway.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Boundary to the payment gateway.
///
/// The trait exists so the checkout orchestrator can be exercised against a
/// stub gateway in tests.
pub trait PaymentGateway {
    /// Create a remote payment intent for `amount_minor` in `currency`,
    /// tagged with our `receipt` reference.
    fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> impl Future<Output = Result<PaymentIntent, GatewayError>> + Send;

    /// Check a payment callback signature against the shared secret.
    fn verify_signature(&self, gateway_order_id: &str, payment_id: &str, signature: &str) -> bool;
}

/// Razorpay Orders API client.
#[derive(Clone)]
pub struct RazorpayClient {
    client: reqwest::Client,
    key_id: String,
    key_secret: SecretString,
}

impl RazorpayClient {
    /// Create a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &RazorpayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length, so this cannot fail.
        HmacSha256::new_from_slice(self.key_secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length")
    }
}

impl PaymentGateway for RazorpayClient {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let url = format!("{BASE_URL}/orders");

        let body = serde_json::json!({
            "amount": amount_minor,
            "currency": currency,
            "receipt": receipt,
            "payment_capture": 1,
        });

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<PaymentIntent>().await?)
    }

    fn verify_signature(&self, gateway_order_id: &str, payment_id: &str, signature: &str) -> bool {
        let Ok(provided) = hex::decode(signature) else {
            return false;
        };

        let mut mac = self.mac();
        mac.update(format!("{gateway_order_id}|{payment_id}").as_bytes());
        // Constant-time comparison
        mac.verify_slice(&provided).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_client(secret: &str) -> RazorpayClient {
        RazorpayClient::new(&RazorpayConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: SecretString::from(secret.to_string()),
        })
        .unwrap()
    }

    fn sign(secret: &str, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_signature_accepts_valid() {
        let client = test_client("s3cr3t-signing-key");
        let signature = sign("s3cr3t-signing-key", "order_abc|pay_123");
        assert!(client.verify_signature("order_abc", "pay_123", &signature));
    }

    #[test]
    fn test_verify_signature_rejects_tampered_payment() {
        let client = test_client("s3cr3t-signing-key");
        let signature = sign("s3cr3t-signing-key", "order_abc|pay_123");
        assert!(!client.verify_signature("order_abc", "pay_999", &signature));
    }

    #[test]
    fn test_verify_signature_rejects_wrong_secret() {
        let client = test_client("s3cr3t-signing-key");
        let signature = sign("another-key", "order_abc|pay_123");
        assert!(!client.verify_signature("order_abc", "pay_123", &signature));
    }

    #[test]
    fn test_verify_signature_rejects_non_hex() {
        let client = test_client("s3cr3t-signing-key");
        assert!(!client.verify_signature("order_abc", "pay_123", "not hex!"));
    }
}
