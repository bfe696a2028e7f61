//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{
    AccountService, BookingPolicy, BookingService, CatalogueService, DrivenPorts,
    ModerationService, NotificationService, OtpPolicy, ReviewService, VenueService,
};
use crate::domain::ports::{
    AccountCommand, AccountQuery, BookingCommand, BookingQuery, CatalogueQuery, ModerationCommand,
    ModerationQuery, NotificationCommand, NotificationQuery, ReportCommand, ReviewCommand,
    ReviewQuery, VenueCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub venues: Arc<dyn VenueCommand>,
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
    pub notifications: Arc<dyn NotificationCommand>,
    pub notifications_query: Arc<dyn NotificationQuery>,
    pub reports: Arc<dyn ReportCommand>,
    pub moderation: Arc<dyn ModerationCommand>,
    pub moderation_query: Arc<dyn ModerationQuery>,
}

impl HttpState {
    /// Wire every driving port to the domain services built over `ports`.
    ///
    /// # Examples
    /// ```no_run
    /// # fn demo(ports: courtside::domain::DrivenPorts) {
    /// use courtside::domain::{BookingPolicy, OtpPolicy};
    /// use courtside::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::from_ports(&ports, BookingPolicy::default(), OtpPolicy::default());
    /// let _catalogue = state.catalogue.clone();
    /// # }
    /// ```
    #[must_use]
    pub fn from_ports(ports: &DrivenPorts, booking: BookingPolicy, otp: OtpPolicy) -> Self {
        let accounts = Arc::new(AccountService::new(ports, otp));
        let bookings = Arc::new(BookingService::new(ports, booking));
        let reviews = Arc::new(ReviewService::new(ports, booking));
        let notifications = Arc::new(NotificationService::new(ports));
        let moderation = Arc::new(ModerationService::new(ports));
        Self {
            accounts: accounts.clone(),
            accounts_query: accounts,
            catalogue: Arc::new(CatalogueService::new(ports, booking)),
            venues: Arc::new(VenueService::new(ports, booking)),
            bookings: bookings.clone(),
            bookings_query: bookings,
            reviews: reviews.clone(),
            reviews_query: reviews,
            notifications: notifications.clone(),
            notifications_query: notifications,
            reports: moderation.clone(),
            moderation: moderation.clone(),
            moderation_query: moderation,
        }
    }
}
