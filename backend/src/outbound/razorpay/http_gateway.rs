//! Reqwest-backed payment gateway adapter.
//!
//! This adapter owns transport details only: request serialisation, basic
//! auth, timeout and HTTP error mapping, JSON decoding into domain records,
//! and HMAC signature checks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{CreateOrderDto, CreateRefundDto, OrderDto, RefundDto, WebhookDto};
use crate::domain::ports::{PaymentGateway, PaymentGatewayError};
use crate::domain::{
    CheckoutConfirmation, GatewayEvent, GatewayOrder, GatewayRefund, Money,
    verify_hmac_sha256_hex,
};

const DEFAULT_USER_AGENT: &str = "courtside-backend/0.1";

/// Key pair and webhook secret issued by the gateway.
pub struct RazorpayCredentials {
    /// Public key id, also handed to checkout clients.
    pub key_id: String,
    /// API secret used for basic auth and checkout signatures.
    pub key_secret: Zeroizing<String>,
    /// Secret used to sign webhook bodies.
    pub webhook_secret: Zeroizing<String>,
}

/// Gateway adapter that talks to one API base URL.
pub struct RazorpayHttpGateway {
    client: Client,
    base_url: Url,
    credentials: RazorpayCredentials,
}

impl RazorpayHttpGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let gateway = RazorpayHttpGateway::new(base_url, credentials, timeout)?;
    /// assert_eq!(gateway.key_id(), "rzp_test_123");
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        credentials: RazorpayCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, PaymentGatewayError> {
        self.base_url.join(path).map_err(|error| {
            PaymentGatewayError::unavailable(format!("invalid gateway url: {error}"))
        })
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, PaymentGatewayError>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .post(url)
            .basic_auth(
                &self.credentials.key_id,
                Some(self.credentials.key_secret.as_str()),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        serde_json::from_slice(bytes.as_ref()).map_err(|error| {
            PaymentGatewayError::invalid_payload(format!("invalid gateway JSON payload: {error}"))
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayHttpGateway {
    fn key_id(&self) -> String {
        self.credentials.key_id.clone()
    }

    async fn create_order(
        &self,
        amount: Money,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        let body = CreateOrderDto {
            amount: amount.minor(),
            currency,
            receipt,
        };
        let order: OrderDto = self.post_json("v1/orders", &body).await?;
        debug!(order_id = %order.id, receipt, "gateway order created");
        order.into_domain().map_err(PaymentGatewayError::invalid_payload)
    }

    async fn refund(
        &self,
        payment_id: &str,
        amount: Money,
    ) -> Result<GatewayRefund, PaymentGatewayError> {
        let path = format!("v1/payments/{payment_id}/refund");
        let body = CreateRefundDto {
            amount: amount.minor(),
        };
        let refund: RefundDto = self.post_json(&path, &body).await?;
        debug!(refund_id = %refund.id, payment_id, "gateway refund requested");
        refund.into_domain().map_err(PaymentGatewayError::invalid_payload)
    }

    fn verify_checkout(&self, confirmation: &CheckoutConfirmation) -> bool {
        verify_hmac_sha256_hex(
            self.credentials.key_secret.as_bytes(),
            confirmation.signed_message().as_bytes(),
            &confirmation.signature,
        )
    }

    fn parse_webhook(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<GatewayEvent, PaymentGatewayError> {
        parse_signed_webhook(self.credentials.webhook_secret.as_bytes(), body, signature)
    }
}

fn parse_signed_webhook(
    secret: &[u8],
    body: &[u8],
    signature: &str,
) -> Result<GatewayEvent, PaymentGatewayError> {
    if !verify_hmac_sha256_hex(secret, body, signature) {
        return Err(PaymentGatewayError::InvalidSignature);
    }
    let decoded: WebhookDto = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::invalid_payload(format!("invalid webhook JSON payload: {error}"))
    })?;
    decoded
        .into_domain()
        .map_err(PaymentGatewayError::invalid_payload)
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    PaymentGatewayError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        PaymentGatewayError::rejected(message)
    } else {
        PaymentGatewayError::unavailable(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
