//! Bundle of driven-port implementations shared by the domain services.
//!
//! Server start-up builds one [`DrivenPorts`] from the outbound adapters and
//! hands it to every service constructor, which clones the handles it needs.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use crate::domain::NewNotification;
use crate::domain::ports::{
    AmenityRepository, BookingRepository, CourtRepository, DashboardRepository,
    NotificationRepository, OtpCodeSource, OtpMailer, OtpRepository, PasswordHasher,
    PaymentGateway, PaymentRepository, ReportRepository, ReviewRepository, TokenService,
    UserRepository, VenueRepository,
};

/// Parameter object bundling every driven port.
#[derive(Clone)]
pub struct DrivenPorts {
    /// Account storage.
    pub users: Arc<dyn UserRepository>,
    /// OTP challenge storage.
    pub otps: Arc<dyn OtpRepository>,
    /// Amenity catalogue.
    pub amenities: Arc<dyn AmenityRepository>,
    /// Venue storage.
    pub venues: Arc<dyn VenueRepository>,
    /// Court and block storage.
    pub courts: Arc<dyn CourtRepository>,
    /// Booking storage.
    pub bookings: Arc<dyn BookingRepository>,
    /// Payment and refund storage.
    pub payments: Arc<dyn PaymentRepository>,
    /// Review storage.
    pub reviews: Arc<dyn ReviewRepository>,
    /// Notification storage.
    pub notifications: Arc<dyn NotificationRepository>,
    /// Report storage.
    pub reports: Arc<dyn ReportRepository>,
    /// Dashboard aggregates.
    pub dashboards: Arc<dyn DashboardRepository>,
    /// Payment gateway.
    pub gateway: Arc<dyn PaymentGateway>,
    /// OTP email delivery.
    pub mailer: Arc<dyn OtpMailer>,
    /// Password hashing.
    pub hasher: Arc<dyn PasswordHasher>,
    /// Bearer tokens.
    pub tokens: Arc<dyn TokenService>,
    /// One-time code generator.
    pub otp_codes: Arc<dyn OtpCodeSource>,
    /// Wall clock.
    pub clock: Arc<dyn Clock>,
}

/// Fire-and-log notification writer used by services after a state change
/// has been committed.
#[derive(Clone)]
pub(crate) struct Notifier {
    repo: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
}

impl Notifier {
    pub(crate) fn new(ports: &DrivenPorts) -> Self {
        Self {
            repo: Arc::clone(&ports.notifications),
            clock: Arc::clone(&ports.clock),
        }
    }

    /// Insert `notes`; failures are logged and swallowed because the
    /// triggering change is already durable.
    pub(crate) async fn send(&self, notes: Vec<NewNotification>) {
        if notes.is_empty() {
            return;
        }
        if let Err(error) = self.repo.insert_many(&notes, self.clock.utc()).await {
            warn!(%error, count = notes.len(), "failed to store notifications");
        }
    }
}
