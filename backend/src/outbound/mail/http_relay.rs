//! Reqwest-backed mail relay adapter.
//!
//! Messages are posted as JSON to `{base}/send` with a bearer API key. The
//! relay is expected to answer `2xx` once it has accepted the message.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{OtpMailer, OtpMailerError, OtpMessage};

const DEFAULT_USER_AGENT: &str = "courtside-backend/0.1";

/// Connection settings for the relay.
pub struct MailRelayConfig {
    /// Relay base URL; `send` is resolved against it.
    pub base_url: Url,
    /// Bearer key.
    pub api_key: Zeroizing<String>,
    /// Sender address.
    pub from: String,
    /// Request timeout.
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct SendDto<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// `OtpMailer` that hands messages to an HTTP relay.
pub struct HttpMailRelay {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
    from: String,
}

impl HttpMailRelay {
    /// Build the adapter.
    ///
    /// # Errors
    ///
    /// Returns an error when the send endpoint cannot be derived from the
    /// base URL or the reqwest client cannot be constructed.
    pub fn new(config: MailRelayConfig) -> Result<Self, OtpMailerError> {
        let endpoint = config.base_url.join("send").map_err(|error| {
            OtpMailerError::unavailable(format!("invalid mail relay url: {error}"))
        })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|error| OtpMailerError::unavailable(error.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
            from: config.from,
        })
    }
}

#[async_trait]
impl OtpMailer for HttpMailRelay {
    async fn send_otp(&self, message: &OtpMessage) -> Result<(), OtpMailerError> {
        let text = message.body();
        let body = SendDto {
            from: &self.from,
            to: message.to.as_str(),
            subject: message.subject(),
            text: &text,
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|error| OtpMailerError::unavailable(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!(purpose = ?message.purpose, "otp email handed to relay");
            return Ok(());
        }
        let bytes = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, &bytes))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> OtpMailerError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let preview: String = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect();
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        OtpMailerError::rejected(message)
    } else {
        OtpMailerError::unavailable(message)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, true)]
    #[case::forbidden(StatusCode::FORBIDDEN, true)]
    #[case::throttled(StatusCode::TOO_MANY_REQUESTS, false)]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, false)]
    fn maps_relay_statuses(#[case] status: StatusCode, #[case] rejected: bool) {
        let error = map_status_error(status, b"  bad   recipient ");
        assert_eq!(matches!(error, OtpMailerError::Rejected { .. }), rejected);
        assert!(error.to_string().contains("bad recipient"));
    }

    #[rstest]
    fn resolves_the_send_endpoint_under_the_base_path() {
        let relay = HttpMailRelay::new(MailRelayConfig {
            base_url: Url::parse("https://mail.example.test/v2/").expect("url"),
            api_key: Zeroizing::new("key".into()),
            from: "no-reply@courtside.test".into(),
            timeout: Duration::from_secs(5),
        })
        .expect("relay");
        assert_eq!(relay.endpoint.as_str(), "https://mail.example.test/v2/send");
    }
}
