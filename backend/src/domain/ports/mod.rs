//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PaymentGateway`], [`OtpMailer`],
//! [`PasswordHasher`], [`TokenService`]) are implemented by outbound
//! adapters. Driving ports (`*Command`, `*Query`) are implemented by the
//! domain services and consumed by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod amenity_repository;
mod booking_command;
mod booking_query;
mod booking_repository;
mod catalogue_query;
mod court_repository;
mod dashboard_repository;
mod moderation_command;
mod moderation_query;
mod notification_command;
mod notification_query;
mod notification_repository;
mod otp_code_source;
mod otp_mailer;
mod otp_repository;
mod password_hasher;
mod payment_gateway;
mod payment_repository;
mod report_command;
mod report_repository;
mod review_command;
mod review_query;
mod review_repository;
mod token_service;
mod user_repository;
mod venue_command;
mod venue_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{
    AccountCommand, AuthSession, ProfilePatch, RegisterRequest, ResetPasswordRequest,
};
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use amenity_repository::MockAmenityRepository;
pub use amenity_repository::{AmenityRepository, AmenityRepositoryError};
#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::{BookingCheckout, BookingCommand, Cancellation, WebhookOutcome};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::{BookingQuery, MyBookingsQuery, OwnerBookingsQuery};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{
    BookingRepository, BookingRepositoryError, BookingTarget, BookingView, ConfirmOutcome,
    ReserveOutcome,
};
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::{CatalogueQuery, CourtAvailability, SlotAvailability};
#[cfg(test)]
pub use court_repository::MockCourtRepository;
pub use court_repository::{BlockOutcome, CourtRepository, CourtRepositoryError};
#[cfg(test)]
pub use dashboard_repository::MockDashboardRepository;
pub use dashboard_repository::{DashboardRepository, DashboardRepositoryError};
#[cfg(test)]
pub use moderation_command::MockModerationCommand;
pub use moderation_command::ModerationCommand;
#[cfg(test)]
pub use moderation_query::MockModerationQuery;
pub use moderation_query::ModerationQuery;
#[cfg(test)]
pub use notification_command::MockNotificationCommand;
pub use notification_command::{NotificationCommand, PushRegistration};
#[cfg(test)]
pub use notification_query::MockNotificationQuery;
pub use notification_query::NotificationQuery;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use otp_code_source::MockOtpCodeSource;
pub use otp_code_source::{OtpCodeSource, RandomOtpCodeSource};
#[cfg(test)]
pub use otp_mailer::MockOtpMailer;
pub use otp_mailer::{OtpMailer, OtpMailerError, OtpMessage};
#[cfg(test)]
pub use otp_repository::MockOtpRepository;
pub use otp_repository::{OtpRepository, OtpRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{PaymentGateway, PaymentGatewayError};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use report_command::MockReportCommand;
pub use report_command::{NewReport, ReportCommand};
#[cfg(test)]
pub use report_repository::MockReportRepository;
pub use report_repository::{ReportRepository, ReportRepositoryError};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::ReviewCommand;
#[cfg(test)]
pub use review_query::MockReviewQuery;
pub use review_query::{ReviewQuery, VenueReviews};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenService, TokenServiceError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
#[cfg(test)]
pub use venue_command::MockVenueCommand;
pub use venue_command::VenueCommand;
#[cfg(test)]
pub use venue_repository::MockVenueRepository;
pub use venue_repository::{VenueRepository, VenueRepositoryError};

#[cfg(test)]
mod tests;
