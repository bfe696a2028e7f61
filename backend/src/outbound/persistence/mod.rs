//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. Slot overlap checks are the exception:
//!   they run under a court row lock so they cannot race with the insert.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Embedded migrations**: `run_migrations` applies the SQL under
//!   `migrations/` before the pool is handed to the adapters.
//! - **Strongly typed errors**: All database errors are mapped to the
//!   port's `Connection` or `Query` error.
//!
//! # Example
//!
//! ```ignore
//! use courtside::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let config = PoolConfig::new("postgres://localhost/courtside");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_amenity_repository;
mod diesel_booking_repository;
mod diesel_court_repository;
mod diesel_dashboard_repository;
pub(crate) mod diesel_helpers;
mod diesel_notification_repository;
mod diesel_otp_repository;
mod diesel_payment_repository;
mod diesel_report_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod diesel_venue_repository;
mod models;
mod pool;
mod schema;
mod slot_queries;

pub use diesel_amenity_repository::DieselAmenityRepository;
pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_court_repository::DieselCourtRepository;
pub use diesel_dashboard_repository::DieselDashboardRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_otp_repository::DieselOtpRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_report_repository::DieselReportRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_venue_repository::DieselVenueRepository;
pub use pool::{DbPool, MigrationError, PoolConfig, PoolError, run_migrations};
