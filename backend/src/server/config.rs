//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use courtside::domain::{BookingPolicy, DrivenPorts, OtpPolicy};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) ports: DrivenPorts,
    pub(crate) booking: BookingPolicy,
    pub(crate) otp: OtpPolicy,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration serving `ports` on `bind_addr` with default policies.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, ports: DrivenPorts) -> Self {
        Self {
            bind_addr,
            ports,
            booking: BookingPolicy::default(),
            otp: OtpPolicy::default(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Replace the booking policy, e.g. to apply the configured venue timezone.
    #[must_use]
    pub fn with_booking_policy(mut self, booking: BookingPolicy) -> Self {
        self.booking = booking;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
