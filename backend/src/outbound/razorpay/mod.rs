//! Razorpay-compatible payment gateway adapter.
//!
//! This module provides a thin HTTP implementation of the `PaymentGateway`
//! port: orders and refunds over REST with basic auth, plus HMAC checks for
//! checkout callbacks and webhooks.

mod dto;
mod http_gateway;

pub use http_gateway::{RazorpayCredentials, RazorpayHttpGateway};
