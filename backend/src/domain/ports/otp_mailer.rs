//! Port abstraction for delivering one-time codes by email.

use async_trait::async_trait;

use crate::domain::{Email, Error, OtpCode, OtpPurpose};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail delivery adapters.
    pub enum OtpMailerError {
        /// The relay could not be reached.
        Unavailable { message: String } => "mail relay unavailable: {message}",
        /// The relay refused the message.
        Rejected { message: String } => "mail relay rejected the message: {message}",
    }
}

impl From<OtpMailerError> for Error {
    fn from(value: OtpMailerError) -> Self {
        Error::service_unavailable(value.to_string())
    }
}

/// Rendered inputs for an OTP email.
#[derive(Debug, Clone)]
pub struct OtpMessage {
    /// Recipient address.
    pub to: Email,
    /// Recipient display name.
    pub recipient_name: String,
    /// Why the code was issued.
    pub purpose: OtpPurpose,
    /// The code itself.
    pub code: OtpCode,
    /// Minutes until the code expires.
    pub valid_minutes: i64,
}

impl OtpMessage {
    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> &'static str {
        match self.purpose {
            OtpPurpose::EmailVerification => "Verify your email address",
            OtpPurpose::PasswordReset => "Reset your password",
        }
    }

    /// Plain-text body.
    #[must_use]
    pub fn body(&self) -> String {
        let action = match self.purpose {
            OtpPurpose::EmailVerification => "verify your email address",
            OtpPurpose::PasswordReset => "reset your password",
        };
        format!(
            "Hi {},\n\nUse the code {} to {action}. It expires in {} minutes.\n\n\
             If you did not request this, you can ignore this email.\n",
            self.recipient_name,
            self.code.expose(),
            self.valid_minutes
        )
    }
}

/// Outbound OTP delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpMailer: Send + Sync {
    /// Deliver the code.
    async fn send_otp(&self, message: &OtpMessage) -> Result<(), OtpMailerError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(OtpPurpose::EmailVerification, "Verify your email address", "verify your email")]
    #[case(OtpPurpose::PasswordReset, "Reset your password", "reset your password")]
    fn renders_purpose_specific_text(
        #[case] purpose: OtpPurpose,
        #[case] subject: &str,
        #[case] phrase: &str,
    ) {
        let message = OtpMessage {
            to: Email::parse("asha@example.com").expect("email"),
            recipient_name: "Asha".into(),
            purpose,
            code: OtpCode::parse("042917").expect("code"),
            valid_minutes: 10,
        };
        assert_eq!(message.subject(), subject);
        let body = message.body();
        assert!(body.contains("042917"));
        assert!(body.contains(phrase));
        assert!(body.contains("10 minutes"));
    }
}
