//! Secret material read from the environment.
//!
//! Release builds refuse to start without every secret; debug builds warn and
//! fall back to throwaway values so a laptop can boot without a vault.

use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

pub(crate) const TOKEN_SECRET_ENV: &str = "COURTSIDE_TOKEN_SECRET";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "COURTSIDE_ALLOW_EPHEMERAL_SECRET";
pub(crate) const GATEWAY_KEY_SECRET_ENV: &str = "COURTSIDE_GATEWAY_KEY_SECRET";
pub(crate) const GATEWAY_WEBHOOK_SECRET_ENV: &str = "COURTSIDE_GATEWAY_WEBHOOK_SECRET";
pub(crate) const MAIL_API_KEY_ENV: &str = "COURTSIDE_MAIL_API_KEY";

/// Shortest token secret accepted in release builds.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing secrets and warn.
    Debug,
    /// Release builds require every secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Secrets needed by the outbound adapters.
pub struct Secrets {
    /// HMAC key for bearer tokens.
    pub token_secret: Zeroizing<Vec<u8>>,
    /// Gateway API secret; also signs checkout callbacks.
    pub gateway_key_secret: Zeroizing<String>,
    /// Gateway webhook signing secret.
    pub gateway_webhook_secret: Zeroizing<String>,
    /// Mail relay bearer key; only needed with a relay.
    pub mail_api_key: Option<Zeroizing<String>>,
}

/// Errors raised while reading secrets.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SecretsError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The token secret is too short for release builds.
    #[error("{TOKEN_SECRET_ENV} too short: need >= {min_len} bytes, got {length}")]
    TokenSecretTooShort { length: usize, min_len: usize },
    /// Release builds must not use ephemeral secrets.
    #[error("{ALLOW_EPHEMERAL_ENV} must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read every secret from `env` under the rules for `mode`.
///
/// # Examples
///
/// ```rust
/// use courtside::settings::secrets::{BuildMode, secrets_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "COURTSIDE_TOKEN_SECRET" => Some("k".repeat(32)),
///     "COURTSIDE_GATEWAY_KEY_SECRET" => Some("key".into()),
///     "COURTSIDE_GATEWAY_WEBHOOK_SECRET" => Some("hook".into()),
///     _ => None,
/// });
///
/// let secrets = secrets_from_env(&env, BuildMode::Release, false).expect("secrets");
/// assert_eq!(secrets.token_secret.len(), 32);
/// ```
///
/// # Errors
/// Returns [`SecretsError`] when a release build is missing a secret, a
/// secret is malformed, or `needs_mail_key` is set without a mail key.
pub fn secrets_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    needs_mail_key: bool,
) -> Result<Secrets, SecretsError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let token_secret = token_secret_from_env(env, mode, allow_ephemeral)?;
    let gateway_key_secret = required_text(env, mode, GATEWAY_KEY_SECRET_ENV)?;
    let gateway_webhook_secret = required_text(env, mode, GATEWAY_WEBHOOK_SECRET_ENV)?;
    let mail_api_key = match non_blank(env, MAIL_API_KEY_ENV) {
        Some(key) => Some(Zeroizing::new(key)),
        None if needs_mail_key => {
            return Err(SecretsError::MissingEnv {
                name: MAIL_API_KEY_ENV,
            });
        }
        None => None,
    };
    Ok(Secrets {
        token_secret,
        gateway_key_secret,
        gateway_webhook_secret,
        mail_api_key,
    })
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SecretsError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match (parse_bool(&value), mode) {
        (Some(true), BuildMode::Release) => Err(SecretsError::EphemeralNotAllowed),
        (Some(flag), _) => Ok(flag),
        (None, BuildMode::Debug) => {
            warn!(value = %value, "invalid {ALLOW_EPHEMERAL_ENV}; defaulting to disabled");
            Ok(false)
        }
        (None, BuildMode::Release) => Err(SecretsError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Zeroizing<Vec<u8>>, SecretsError> {
    match non_blank(env, TOKEN_SECRET_ENV) {
        Some(value) => {
            let secret = Zeroizing::new(value.into_bytes());
            if mode == BuildMode::Release && secret.len() < TOKEN_SECRET_MIN_LEN {
                return Err(SecretsError::TokenSecretTooShort {
                    length: secret.len(),
                    min_len: TOKEN_SECRET_MIN_LEN,
                });
            }
            Ok(secret)
        }
        None if mode.is_debug() || allow_ephemeral => {
            warn!("{TOKEN_SECRET_ENV} not set; using a temporary secret (dev only)");
            let mut secret = Zeroizing::new(vec![0_u8; TOKEN_SECRET_MIN_LEN]);
            rand::thread_rng().fill_bytes(secret.as_mut_slice());
            Ok(secret)
        }
        None => Err(SecretsError::MissingEnv {
            name: TOKEN_SECRET_ENV,
        }),
    }
}

fn required_text<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
) -> Result<Zeroizing<String>, SecretsError> {
    match non_blank(env, name) {
        Some(value) => Ok(Zeroizing::new(value)),
        None if mode.is_debug() => {
            warn!("{name} not set; gateway calls will be rejected");
            Ok(Zeroizing::new(String::new()))
        }
        None => Err(SecretsError::MissingEnv { name }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
