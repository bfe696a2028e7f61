//! Deterministic doubles for the external driven ports.
//!
//! Integration tests pair these with the Diesel repositories so that a whole
//! registration-to-payment flow runs against a real database without
//! touching the payment gateway or a mail relay. Compiled only with the
//! `test-support` feature.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    OtpMailer, OtpMailerError, OtpMessage, PasswordHasher, PaymentGateway, PaymentGatewayError,
    RandomOtpCodeSource,
};
use crate::domain::{
    CheckoutConfirmation, DrivenPorts, GatewayEvent, GatewayOrder, GatewayRefund, Money,
    RefundStatus, hmac_sha256_hex, verify_hmac_sha256_hex,
};
use crate::outbound::persistence::{
    DbPool, DieselAmenityRepository, DieselBookingRepository, DieselCourtRepository,
    DieselDashboardRepository, DieselNotificationRepository, DieselOtpRepository,
    DieselPaymentRepository, DieselReportRepository, DieselReviewRepository,
    DieselUserRepository, DieselVenueRepository,
};
use crate::outbound::security::{JwtTokenService, Pbkdf2PasswordHasher};

/// Public key id reported by [`StubPaymentGateway`].
pub const STUB_KEY_ID: &str = "rzp_test_stub";
/// Secret the stub gateway signs checkouts with.
pub const STUB_KEY_SECRET: &[u8] = b"stub_key_secret";
/// Secret the stub gateway signs webhooks with.
pub const STUB_WEBHOOK_SECRET: &[u8] = b"stub_webhook_secret";

/// Gateway double issuing unique order and refund ids.
///
/// Ids are random so runs sharing one database never collide.
///
/// # Examples
///
/// ```rust
/// use courtside::domain::CheckoutConfirmation;
/// use courtside::domain::ports::PaymentGateway;
/// use courtside::test_support::StubPaymentGateway;
///
/// let gateway = StubPaymentGateway::default();
/// let confirmation = CheckoutConfirmation {
///     order_id: "order_1".into(),
///     payment_id: "pay_1".into(),
///     signature: StubPaymentGateway::sign_checkout("order_1", "pay_1"),
/// };
/// assert!(gateway.verify_checkout(&confirmation));
/// ```
#[derive(Debug, Default)]
pub struct StubPaymentGateway {
    orders: AtomicU64,
    refunds: AtomicU64,
}

impl StubPaymentGateway {
    /// Orders created so far.
    #[must_use]
    pub fn orders_created(&self) -> u64 {
        self.orders.load(Ordering::Relaxed)
    }

    /// Refunds issued so far.
    #[must_use]
    pub fn refunds_issued(&self) -> u64 {
        self.refunds.load(Ordering::Relaxed)
    }

    /// Signature a real checkout would return for the pair.
    #[must_use]
    pub fn sign_checkout(order_id: &str, payment_id: &str) -> String {
        hmac_sha256_hex(STUB_KEY_SECRET, format!("{order_id}|{payment_id}").as_bytes())
    }

    /// Signature header value for a webhook body.
    #[must_use]
    pub fn sign_webhook(body: &[u8]) -> String {
        hmac_sha256_hex(STUB_WEBHOOK_SECRET, body)
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    fn key_id(&self) -> String {
        STUB_KEY_ID.to_owned()
    }

    async fn create_order(
        &self,
        amount: Money,
        currency: &str,
        _receipt: &str,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        self.orders.fetch_add(1, Ordering::Relaxed);
        Ok(GatewayOrder {
            order_id: format!("order_stub_{}", Uuid::new_v4().simple()),
            amount,
            currency: currency.to_owned(),
        })
    }

    async fn refund(
        &self,
        _payment_id: &str,
        amount: Money,
    ) -> Result<GatewayRefund, PaymentGatewayError> {
        self.refunds.fetch_add(1, Ordering::Relaxed);
        Ok(GatewayRefund {
            refund_id: format!("rfnd_stub_{}", Uuid::new_v4().simple()),
            amount,
            status: RefundStatus::Processed,
        })
    }

    fn verify_checkout(&self, confirmation: &CheckoutConfirmation) -> bool {
        verify_hmac_sha256_hex(
            STUB_KEY_SECRET,
            confirmation.signed_message().as_bytes(),
            &confirmation.signature,
        )
    }

    /// Checks the signature, then reports every event as ignored.
    fn parse_webhook(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<GatewayEvent, PaymentGatewayError> {
        if !verify_hmac_sha256_hex(STUB_WEBHOOK_SECRET, body, signature) {
            return Err(PaymentGatewayError::InvalidSignature);
        }
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|error| PaymentGatewayError::invalid_payload(error.to_string()))?;
        let event = value
            .get("event")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();
        Ok(GatewayEvent::Ignored { event })
    }
}

/// Mailer double that keeps every message it was asked to send.
#[derive(Debug, Default, Clone)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OtpMessage>>>,
}

impl RecordingMailer {
    /// Most recent code mailed to `email`.
    #[must_use]
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
        sent.iter()
            .rev()
            .find(|message| message.to.as_str() == email)
            .map(|message| message.code.expose().to_owned())
    }

    /// Number of messages sent so far.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl OtpMailer for RecordingMailer {
    async fn send_otp(&self, message: &OtpMessage) -> Result<(), OtpMailerError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handles to the doubles wired by [`ports_with_doubles`].
#[derive(Clone)]
pub struct Doubles {
    /// Payment gateway double.
    pub gateway: Arc<StubPaymentGateway>,
    /// Mailer recording every OTP message.
    pub mailer: RecordingMailer,
    /// Clock shared by every service.
    pub clock: ManualClock,
}

/// Diesel repositories over `pool` with doubles for every external port.
///
/// Passwords are hashed with a single PBKDF2 round to keep suites fast.
#[must_use]
pub fn ports_with_doubles(pool: &DbPool, now: DateTime<Utc>) -> (DrivenPorts, Doubles) {
    let doubles = Doubles {
        gateway: Arc::new(StubPaymentGateway::default()),
        mailer: RecordingMailer::default(),
        clock: ManualClock::new(now),
    };
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Pbkdf2PasswordHasher::new(1));
    let ports = DrivenPorts {
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
        gateway: doubles.gateway.clone(),
        mailer: Arc::new(doubles.mailer.clone()),
        hasher,
        tokens: Arc::new(JwtTokenService::new(
            zeroize::Zeroizing::new(b"integration-token-secret-0123456789".to_vec()),
            Duration::hours(1),
        )),
        otp_codes: Arc::new(RandomOtpCodeSource),
        clock: Arc::new(doubles.clock.clone()),
    };
    (ports, doubles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn separate_gateways_never_reuse_ids() {
        let amount = Money::from_minor(50_000).expect("amount");
        let first = StubPaymentGateway::default();
        let second = StubPaymentGateway::default();

        let left = first.create_order(amount, "INR", "r1").await.expect("order");
        let right = second.create_order(amount, "INR", "r1").await.expect("order");
        assert_ne!(left.order_id, right.order_id);
        let left = first.refund("pay_1", amount).await.expect("refund");
        let right = second.refund("pay_1", amount).await.expect("refund");
        assert_ne!(left.refund_id, right.refund_id);
        assert_eq!(first.orders_created(), 1);
        assert_eq!(second.refunds_issued(), 1);
    }
}
