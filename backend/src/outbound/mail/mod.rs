//! Outbound OTP delivery: an HTTP mail relay and a log-only fallback.

mod http_relay;
mod logging;

pub use http_relay::{HttpMailRelay, MailRelayConfig};
pub use logging::LoggingMailer;
