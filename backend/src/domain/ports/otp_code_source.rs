//! Port abstraction for generating one-time codes.

use crate::domain::OtpCode;

/// Source of fresh one-time codes.
#[cfg_attr(test, mockall::automock)]
pub trait OtpCodeSource: Send + Sync {
    /// Produce a new code.
    fn next_code(&self) -> OtpCode;
}

/// Codes drawn from the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOtpCodeSource;

impl OtpCodeSource for RandomOtpCodeSource {
    fn next_code(&self) -> OtpCode {
        OtpCode::generate(&mut rand::thread_rng())
    }
}
