//! Mailer that only logs, for local runs without a relay.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{OtpMailer, OtpMailerError, OtpMessage};

/// `OtpMailer` that writes the message to the log instead of sending it.
///
/// The code itself is logged, so this must never be wired in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailer;

#[async_trait]
impl OtpMailer for LoggingMailer {
    async fn send_otp(&self, message: &OtpMessage) -> Result<(), OtpMailerError> {
        info!(
            to = %message.to.as_str(),
            subject = message.subject(),
            code = message.code.expose(),
            valid_minutes = message.valid_minutes,
            "otp email (not sent: no mail relay configured)"
        );
        Ok(())
    }
}
