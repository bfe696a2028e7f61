//! Start-up configuration.
//!
//! Plain settings come from `ortho_config` (command line, `COURTSIDE_*`
//! environment variables, then an optional config file). Secrets are read
//! separately by [`secrets`] so they never pass through the generic loader
//! or its error messages.

pub mod secrets;

use std::net::SocketAddr;
use std::time::Duration;

use chrono::FixedOffset;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;
/// India Standard Time.
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;
const DEFAULT_GATEWAY_URL: &str = "https://api.razorpay.com/";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAIL_FROM: &str = "Courtside <no-reply@courtside.app>";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A value was present but unusable.
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    /// A value is required in this deployment.
    #[error("missing required setting {name}")]
    Missing { name: &'static str },
}

impl SettingsError {
    fn invalid(name: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            name,
            reason: reason.to_string(),
        }
    }
}

/// Server settings loaded through `ortho_config`.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COURTSIDE")]
pub struct AppSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    #[ortho_config(default = 10)]
    pub db_pool_size: u32,
    /// Venue timezone as minutes east of UTC.
    pub utc_offset_minutes: Option<i32>,
    /// Payment gateway API base URL.
    pub gateway_url: Option<String>,
    /// Public gateway key id handed to checkout clients.
    pub gateway_key_id: Option<String>,
    /// Gateway request timeout in seconds.
    pub gateway_timeout_secs: Option<u64>,
    /// Mail relay base URL; OTP mail is only logged when unset.
    pub mail_relay_url: Option<String>,
    /// Sender address for OTP mail.
    pub mail_from: Option<String>,
    /// Bearer token lifetime in hours.
    pub token_ttl_hours: Option<i64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            database_url: None,
            db_pool_size: DEFAULT_POOL_SIZE,
            utc_offset_minutes: None,
            gateway_url: None,
            gateway_key_id: None,
            gateway_timeout_secs: None,
            mail_relay_url: None,
            mail_from: None,
            token_ttl_hours: None,
        }
    }
}

impl AppSettings {
    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] for an unparsable address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err| SettingsError::invalid("bind_addr", err))
    }

    /// Database URL; there is no default.
    ///
    /// # Errors
    /// Returns [`SettingsError::Missing`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::Missing {
                name: "database_url",
            })
    }

    /// Pool size; zero is raised to one.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.max(1)
    }

    /// Venue timezone.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] outside ±24 hours.
    pub fn utc_offset(&self) -> Result<FixedOffset, SettingsError> {
        let minutes = self
            .utc_offset_minutes
            .unwrap_or(DEFAULT_UTC_OFFSET_MINUTES);
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                SettingsError::invalid("utc_offset_minutes", format!("{minutes} is out of range"))
            })
    }

    /// Gateway API base URL.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] for a malformed URL.
    pub fn gateway_url(&self) -> Result<url::Url, SettingsError> {
        parse_base_url(
            "gateway_url",
            self.gateway_url.as_deref().unwrap_or(DEFAULT_GATEWAY_URL),
        )
    }

    /// Public gateway key id; blank when unset.
    pub fn gateway_key_id(&self) -> &str {
        self.gateway_key_id.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(
            self.gateway_timeout_secs
                .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS),
        )
    }

    /// Mail relay base URL, when configured.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] for a malformed URL.
    pub fn mail_relay_url(&self) -> Result<Option<url::Url>, SettingsError> {
        self.mail_relay_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_base_url("mail_relay_url", raw))
            .transpose()
    }

    pub fn mail_from(&self) -> &str {
        self.mail_from.as_deref().unwrap_or(DEFAULT_MAIL_FROM)
    }

    /// Token lifetime.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] for non-positive values.
    pub fn token_ttl(&self) -> Result<chrono::Duration, SettingsError> {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        if hours <= 0 {
            return Err(SettingsError::invalid(
                "token_ttl_hours",
                "must be positive",
            ));
        }
        chrono::Duration::try_hours(hours)
            .ok_or_else(|| SettingsError::invalid("token_ttl_hours", "is too large"))
    }
}

/// Parse a base URL, adding the trailing slash `Url::join` needs to keep the
/// last path segment.
fn parse_base_url(name: &'static str, raw: &str) -> Result<url::Url, SettingsError> {
    let normalised = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    url::Url::parse(&normalised).map_err(|err| SettingsError::invalid(name, err))
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings loading and defaults.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 6] = [
        "COURTSIDE_BIND_ADDR",
        "COURTSIDE_DATABASE_URL",
        "COURTSIDE_DB_POOL_SIZE",
        "COURTSIDE_UTC_OFFSET_MINUTES",
        "COURTSIDE_MAIL_RELAY_URL",
        "COURTSIDE_TOKEN_TTL_HOURS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("courtside")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind"),
            "0.0.0.0:8080".parse().expect("addr")
        );
        assert_eq!(
            settings.database_url(),
            Err(SettingsError::Missing {
                name: "database_url"
            })
        );
        assert_eq!(
            settings.utc_offset().expect("offset").local_minus_utc(),
            330 * 60
        );
        assert_eq!(settings.db_pool_size(), DEFAULT_POOL_SIZE);
        assert_eq!(settings.mail_relay_url(), Ok(None));
        assert_eq!(
            settings.token_ttl().expect("ttl"),
            chrono::Duration::days(7)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("COURTSIDE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "COURTSIDE_DATABASE_URL",
                Some("postgres://localhost/courtside".to_owned()),
            ),
            ("COURTSIDE_UTC_OFFSET_MINUTES", Some("-300".to_owned())),
            (
                "COURTSIDE_MAIL_RELAY_URL",
                Some("https://mail.example.com/v1".to_owned()),
            ),
            ("COURTSIDE_TOKEN_TTL_HOURS", Some("2".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind").port(),
            9000
        );
        assert_eq!(
            settings.database_url(),
            Ok("postgres://localhost/courtside")
        );
        assert_eq!(
            settings.utc_offset().expect("offset").local_minus_utc(),
            -300 * 60
        );
        let relay = settings.mail_relay_url().expect("url").expect("configured");
        assert_eq!(relay.as_str(), "https://mail.example.com/v1/");
        assert_eq!(settings.token_ttl(), Ok(chrono::Duration::hours(2)));
    }

    #[rstest]
    #[case::offset(AppSettings { utc_offset_minutes: Some(24 * 60), ..AppSettings::default() })]
    #[case::ttl(AppSettings { token_ttl_hours: Some(0), ..AppSettings::default() })]
    #[case::bind(AppSettings { bind_addr: Some("localhost".into()), ..AppSettings::default() })]
    fn out_of_range_values_are_reported(#[case] settings: AppSettings) {
        let failures = [
            settings.utc_offset().err(),
            settings.token_ttl().err(),
            settings.bind_addr().err(),
        ];
        assert!(failures.iter().any(Option::is_some));
    }

    #[rstest]
    fn base_urls_keep_their_last_segment() {
        let url = parse_base_url("gateway_url", "https://api.example.com/v2").expect("url");
        assert_eq!(url.join("orders").expect("join").path(), "/v2/orders");
    }
}
