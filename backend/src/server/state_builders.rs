//! Builders turning settings, secrets and a pool into driven-port adapters.

use std::sync::Arc;

use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tracing::warn;

use courtside::domain::DrivenPorts;
use courtside::domain::ports::{OtpMailer, RandomOtpCodeSource};
use courtside::outbound::mail::{HttpMailRelay, LoggingMailer, MailRelayConfig};
use courtside::outbound::persistence::{
    DbPool, DieselAmenityRepository, DieselBookingRepository, DieselCourtRepository,
    DieselDashboardRepository, DieselNotificationRepository, DieselOtpRepository,
    DieselPaymentRepository, DieselReportRepository, DieselReviewRepository,
    DieselUserRepository, DieselVenueRepository,
};
use courtside::outbound::razorpay::{RazorpayCredentials, RazorpayHttpGateway};
use courtside::outbound::security::{JwtTokenService, Pbkdf2PasswordHasher};
use courtside::settings::AppSettings;
use courtside::settings::secrets::{BuildMode, Secrets};

/// Pick the OTP mailer: the HTTP relay when configured, otherwise a
/// log-only mailer that release builds refuse.
fn build_mailer(
    settings: &AppSettings,
    secrets: &mut Secrets,
    mode: BuildMode,
) -> Result<Arc<dyn OtpMailer>> {
    let Some(base_url) = settings.mail_relay_url()? else {
        if mode == BuildMode::Release {
            return Err(eyre!("mail_relay_url is required in release builds"));
        }
        warn!("no mail relay configured; OTP codes will be logged (dev only)");
        return Ok(Arc::new(LoggingMailer));
    };
    let api_key = secrets
        .mail_api_key
        .take()
        .ok_or_else(|| eyre!("a mail relay needs COURTSIDE_MAIL_API_KEY"))?;
    let relay = HttpMailRelay::new(MailRelayConfig {
        base_url,
        api_key,
        from: settings.mail_from().to_owned(),
        timeout: settings.gateway_timeout(),
    })
    .wrap_err("failed to build mail relay client")?;
    Ok(Arc::new(relay))
}

/// Wire every driven port to its production adapter.
///
/// # Errors
/// Returns an error when a setting is malformed or an HTTP client cannot be
/// built.
pub(crate) fn build_driven_ports(
    pool: &DbPool,
    settings: &AppSettings,
    mut secrets: Secrets,
    mode: BuildMode,
) -> Result<DrivenPorts> {
    let mailer = build_mailer(settings, &mut secrets, mode)?;
    let Secrets {
        token_secret,
        gateway_key_secret,
        gateway_webhook_secret,
        mail_api_key: _,
    } = secrets;

    let gateway = RazorpayHttpGateway::new(
        settings.gateway_url()?,
        RazorpayCredentials {
            key_id: settings.gateway_key_id().to_owned(),
            key_secret: gateway_key_secret,
            webhook_secret: gateway_webhook_secret,
        },
        settings.gateway_timeout(),
    )
    .wrap_err("failed to build payment gateway client")?;

    Ok(DrivenPorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        otps: Arc::new(DieselOtpRepository::new(pool.clone())),
        amenities: Arc::new(DieselAmenityRepository::new(pool.clone())),
        venues: Arc::new(DieselVenueRepository::new(pool.clone())),
        courts: Arc::new(DieselCourtRepository::new(pool.clone())),
        bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
        payments: Arc::new(DieselPaymentRepository::new(pool.clone())),
        reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
        notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        reports: Arc::new(DieselReportRepository::new(pool.clone())),
        dashboards: Arc::new(DieselDashboardRepository::new(pool.clone())),
        gateway: Arc::new(gateway),
        mailer,
        hasher: Arc::new(Pbkdf2PasswordHasher::default()),
        tokens: Arc::new(JwtTokenService::new(token_secret, settings.token_ttl()?)),
        otp_codes: Arc::new(RandomOtpCodeSource),
        clock: Arc::new(DefaultClock),
    })
}
