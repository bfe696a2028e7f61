//! HTTP inbound adapter exposing REST endpoints.

pub mod account;
pub mod admin;
pub mod auth;
pub mod bookings;
pub mod catalogue;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod health;
pub mod notifications;
pub mod owner;
pub mod reports;
pub mod reviews;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Mount every versioned API route; the caller supplies the `/api/v1` scope.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(account::configure)
        .configure(catalogue::configure)
        .configure(reviews::configure)
        .configure(bookings::configure)
        .configure(owner::configure)
        .configure(notifications::configure)
        .configure(reports::configure)
        .configure(admin::configure);
}
