//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **razorpay**: payment gateway orders, refunds and signature checks
//! - **mail**: OTP delivery through an HTTP relay
//! - **security**: password hashing and bearer tokens
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod mail;
pub mod persistence;
pub mod razorpay;
pub mod security;
