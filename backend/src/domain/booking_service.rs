//! Booking lifecycle: reservation, payment capture, cancellation and
//! completion.
//!
//! The slot is held by a pending booking while the booker pays. Payment is
//! proven either by the checkout callback or by the gateway webhook; both
//! paths funnel into [`BookingService::capture`], so a booking is confirmed
//! once no matter which arrives first.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{debug, error, info, warn};

use crate::domain::driven_ports::Notifier;
use crate::domain::ports::{
    BookingCheckout, BookingCommand, BookingQuery, BookingRepository, BookingView, Cancellation,
    ConfirmOutcome, CourtRepository, MyBookingsQuery, OwnerBookingsQuery, PaymentGateway,
    PaymentRepository, ReserveOutcome, VenueRepository, WebhookOutcome,
};
use crate::domain::{
    Booking, BookingFilter, BookingId, BookingPolicy, BookingRequest, BookingScope, BookingStatus,
    CURRENCY, Checkout, CheckoutConfirmation, DrivenPorts, Error, GatewayEvent, Money,
    NewNotification, Payment, PaymentId, PaymentStatus, Principal, Refund, RefundId, RefundStatus,
    refund_due,
};

/// How a captured payment ended for its booking.
#[derive(Debug)]
enum Capture {
    /// The booking is confirmed.
    Confirmed(BookingView),
    /// The slot was lost; the payment was refunded.
    Refunded,
}

/// Booking service implementing [`BookingCommand`] and [`BookingQuery`].
#[derive(Clone)]
pub struct BookingService {
    venues: Arc<dyn VenueRepository>,
    courts: Arc<dyn CourtRepository>,
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
}

impl BookingService {
    /// Create the service from the shared port bundle.
    pub fn new(ports: &DrivenPorts, policy: BookingPolicy) -> Self {
        Self {
            venues: Arc::clone(&ports.venues),
            courts: Arc::clone(&ports.courts),
            bookings: Arc::clone(&ports.bookings),
            payments: Arc::clone(&ports.payments),
            gateway: Arc::clone(&ports.gateway),
            notifier: Notifier::new(ports),
            clock: Arc::clone(&ports.clock),
            policy,
        }
    }

    /// Cancel a pending booking so its slot is free again.
    async fn release_slot(
        &self,
        id: &BookingId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        self.bookings
            .transition(
                id,
                BookingStatus::Pending,
                BookingStatus::Cancelled,
                Some(reason.to_owned()),
                now,
            )
            .await?;
        Ok(())
    }

    async fn load(&self, id: &BookingId) -> Result<BookingView, Error> {
        self.bookings
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found("booking not found"))
    }

    /// Record the captured payment and confirm its booking.
    async fn capture(
        &self,
        mut payment: Payment,
        gateway_payment_id: &str,
    ) -> Result<Capture, Error> {
        let now = self.clock.utc();
        let newly_captured =
            matches!(payment.status, PaymentStatus::Created | PaymentStatus::Failed);
        if newly_captured {
            payment.status = PaymentStatus::Captured;
            payment.gateway_payment_id = Some(gateway_payment_id.to_owned());
            payment.failure_reason = None;
            payment.updated_at = now;
            self.payments.update(&payment).await?;
            info!(payment_id = %payment.id, booking_id = %payment.booking_id, "payment captured");
        }

        let view = self.load(&payment.booking_id).await?;
        let outcome = self
            .bookings
            .confirm(&payment.booking_id, self.policy.hold_cutoff(now), now)
            .await?;
        // Replayed captures for a booking already cancelled change nothing.
        let cancelled_now = newly_captured || matches!(outcome, ConfirmOutcome::SlotTaken(_));
        match outcome {
            ConfirmOutcome::Confirmed(booking) => {
                let view = BookingView { booking, ..view };
                let facts = view.facts();
                self.notifier
                    .send(vec![
                        NewNotification::booking_confirmed(view.booking.user_id, &facts),
                        NewNotification::new_booking(view.venue_owner_id, &facts),
                    ])
                    .await;
                info!(booking_id = %view.booking.id, "booking confirmed");
                Ok(Capture::Confirmed(view))
            }
            ConfirmOutcome::AlreadyConfirmed(booking) => {
                Ok(Capture::Confirmed(BookingView { booking, ..view }))
            }
            ConfirmOutcome::NotPending(booking) if booking.status == BookingStatus::Completed => {
                Ok(Capture::Confirmed(BookingView { booking, ..view }))
            }
            ConfirmOutcome::SlotTaken(booking) | ConfirmOutcome::NotPending(booking) => {
                warn!(
                    booking_id = %booking.id,
                    status = %booking.status,
                    "payment arrived for a booking that lost its slot"
                );
                let view = BookingView { booking, ..view };
                let refund = if payment.status == PaymentStatus::Captured {
                    let amount = payment.amount;
                    self.refund(&mut payment, amount, now).await?
                } else {
                    None
                };
                if cancelled_now {
                    self.notifier
                        .send(vec![NewNotification::booking_cancelled(
                            view.booking.user_id,
                            &view.facts(),
                            settled_amount(refund.as_ref()),
                        )])
                        .await;
                }
                Ok(Capture::Refunded)
            }
            ConfirmOutcome::Missing => Err(Error::not_found("booking not found")),
        }
    }

    /// Refund `amount` of a captured payment and record the outcome.
    ///
    /// A gateway failure is stored as a failed refund rather than undoing
    /// the cancellation that triggered it.
    async fn refund(
        &self,
        payment: &mut Payment,
        amount: Money,
        now: DateTime<Utc>,
    ) -> Result<Option<Refund>, Error> {
        if amount == Money::ZERO {
            return Ok(None);
        }
        let Some(gateway_payment_id) = payment.gateway_payment_id.clone() else {
            return Ok(None);
        };
        let mut refund = Refund {
            id: RefundId::random(),
            payment_id: payment.id,
            gateway_refund_id: None,
            amount,
            status: RefundStatus::Failed,
            created_at: now,
            updated_at: now,
        };
        match self.gateway.refund(&gateway_payment_id, amount).await {
            Ok(issued) => {
                refund.gateway_refund_id = Some(issued.refund_id);
                refund.amount = issued.amount;
                refund.status = issued.status;
            }
            Err(err) => {
                error!(payment_id = %payment.id, error = %err, "gateway refund failed");
            }
        }
        self.payments.create_refund(&refund).await?;
        if refund.status != RefundStatus::Failed {
            payment.status = payment.status_after_refund(refund.amount);
            payment.updated_at = now;
            self.payments.update(payment).await?;
        }
        Ok(Some(refund))
    }

    async fn apply_payment_failure(
        &self,
        order_id: &str,
        payment_id: String,
        reason: Option<String>,
    ) -> Result<WebhookOutcome, Error> {
        let Some(mut payment) = self.payments.find_by_order(order_id).await? else {
            debug!(order_id, "payment failure for unknown order");
            return Ok(WebhookOutcome::Ignored);
        };
        if payment.status != PaymentStatus::Created {
            return Ok(WebhookOutcome::Ignored);
        }
        let now = self.clock.utc();
        payment.status = PaymentStatus::Failed;
        payment.gateway_payment_id = Some(payment_id);
        payment.failure_reason = reason;
        payment.updated_at = now;
        self.payments.update(&payment).await?;

        let cancelled = self
            .bookings
            .transition(
                &payment.booking_id,
                BookingStatus::Pending,
                BookingStatus::Cancelled,
                Some("payment failed".to_owned()),
                now,
            )
            .await?;
        if cancelled.is_some() {
            let view = self.load(&payment.booking_id).await?;
            self.notifier
                .send(vec![NewNotification::payment_failed(
                    view.booking.user_id,
                    &view.facts(),
                )])
                .await;
        }
        info!(payment_id = %payment.id, "payment failed");
        Ok(WebhookOutcome::Applied)
    }

    async fn apply_refund_status(
        &self,
        gateway_refund_id: &str,
        status: RefundStatus,
    ) -> Result<WebhookOutcome, Error> {
        let Some(mut refund) = self
            .payments
            .find_refund_by_gateway_id(gateway_refund_id)
            .await?
        else {
            debug!(refund_id = gateway_refund_id, "refund event for unknown refund");
            return Ok(WebhookOutcome::Ignored);
        };
        if refund.status == status {
            return Ok(WebhookOutcome::Applied);
        }
        let now = self.clock.utc();
        refund.status = status;
        refund.updated_at = now;
        self.payments.update_refund(&refund).await?;

        let Some(mut payment) = self.payments.find_by_id(&refund.payment_id).await? else {
            return Ok(WebhookOutcome::Applied);
        };
        match status {
            RefundStatus::Processed => {
                payment.status = payment.status_after_refund(refund.amount);
                payment.updated_at = now;
                self.payments.update(&payment).await?;
                let view = self.load(&payment.booking_id).await?;
                self.notifier
                    .send(vec![NewNotification::refund_processed(
                        view.booking.user_id,
                        refund.amount,
                    )])
                    .await;
            }
            RefundStatus::Failed => {
                warn!(refund_id = %refund.id, "gateway reported a failed refund");
            }
            RefundStatus::Pending => {}
        }
        Ok(WebhookOutcome::Applied)
    }
}

/// Refund amount worth telling the booker about.
fn settled_amount(refund: Option<&Refund>) -> Option<Money> {
    refund
        .filter(|refund| refund.status != RefundStatus::Failed)
        .map(|refund| refund.amount)
}

#[async_trait]
impl BookingCommand for BookingService {
    async fn create(
        &self,
        principal: &Principal,
        request: BookingRequest,
    ) -> Result<BookingCheckout, Error> {
        let not_bookable = || Error::not_found("court not found");
        let court = self
            .courts
            .find_by_id(&request.court_id)
            .await?
            .filter(|court| court.active)
            .ok_or_else(not_bookable)?;
        let venue = self
            .venues
            .find_by_id(&court.venue_id)
            .await?
            .filter(|venue| venue.is_public())
            .ok_or_else(not_bookable)?;

        let now = self.clock.utc();
        request.check_window(&court.hours, now, &self.policy)?;
        let total = request.total(court.price_per_hour)?;
        let booking = Booking {
            id: BookingId::random(),
            user_id: principal.user_id,
            court_id: court.id,
            venue_id: venue.id,
            window: request.window,
            total,
            status: BookingStatus::Pending,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };

        match self
            .bookings
            .reserve(&booking, self.policy.hold_cutoff(now))
            .await?
        {
            ReserveOutcome::Reserved => {}
            ReserveOutcome::SlotTaken => {
                return Err(Error::conflict("the selected slot is no longer available"));
            }
        }

        let order = match self
            .gateway
            .create_order(total, CURRENCY, &booking.id.to_string())
            .await
        {
            Ok(order) => order,
            Err(err) => {
                warn!(
                    booking_id = %booking.id,
                    error = %err,
                    "order creation failed; releasing slot"
                );
                self.release_slot(&booking.id, "payment gateway unavailable", now)
                    .await?;
                return Err(Error::service_unavailable("payment gateway unavailable"));
            }
        };

        let payment = Payment {
            id: PaymentId::random(),
            booking_id: booking.id,
            gateway_order_id: order.order_id.clone(),
            gateway_payment_id: None,
            amount: order.amount,
            currency: order.currency.clone(),
            status: PaymentStatus::Created,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        };
        if let Err(err) = self.payments.create(&payment).await {
            error!(
                booking_id = %booking.id,
                order_id = %order.order_id,
                error = %err,
                "payment record failed; releasing slot"
            );
            self.release_slot(&booking.id, "payment could not be recorded", now)
                .await?;
            return Err(err.into());
        }
        info!(
            booking_id = %booking.id,
            order_id = %order.order_id,
            total = %total,
            "booking reserved"
        );

        Ok(BookingCheckout {
            booking: BookingView {
                booking,
                venue_name: venue.name,
                court_name: court.name,
                sport: court.sport,
                venue_owner_id: venue.owner_id,
            },
            checkout: Checkout {
                order_id: order.order_id,
                amount: order.amount,
                currency: order.currency,
                key_id: self.gateway.key_id(),
            },
        })
    }

    async fn confirm_payment(
        &self,
        principal: &Principal,
        confirmation: CheckoutConfirmation,
    ) -> Result<BookingView, Error> {
        if !self.gateway.verify_checkout(&confirmation) {
            return Err(Error::invalid_request("payment signature mismatch"));
        }
        let payment = self
            .payments
            .find_by_order(&confirmation.order_id)
            .await?
            .ok_or_else(|| Error::not_found("payment not found"))?;
        let view = self.load(&payment.booking_id).await?;
        if view.booking.user_id != principal.user_id {
            return Err(Error::forbidden("only the booker can confirm this payment"));
        }
        match self.capture(payment, &confirmation.payment_id).await? {
            Capture::Confirmed(view) => Ok(view),
            Capture::Refunded => Err(Error::conflict(
                "the slot was taken before payment completed; the payment has been refunded",
            )),
        }
    }

    async fn handle_webhook(&self, body: &[u8], signature: &str) -> Result<WebhookOutcome, Error> {
        let event = self.gateway.parse_webhook(body, signature)?;
        match event {
            GatewayEvent::PaymentCaptured {
                order_id,
                payment_id,
            } => {
                let Some(payment) = self.payments.find_by_order(&order_id).await? else {
                    debug!(%order_id, "capture for unknown order");
                    return Ok(WebhookOutcome::Ignored);
                };
                self.capture(payment, &payment_id).await?;
                Ok(WebhookOutcome::Applied)
            }
            GatewayEvent::PaymentFailed {
                order_id,
                payment_id,
                reason,
            } => {
                self.apply_payment_failure(&order_id, payment_id, reason)
                    .await
            }
            GatewayEvent::RefundProcessed { refund_id } => {
                self.apply_refund_status(&refund_id, RefundStatus::Processed)
                    .await
            }
            GatewayEvent::RefundFailed { refund_id } => {
                self.apply_refund_status(&refund_id, RefundStatus::Failed)
                    .await
            }
            GatewayEvent::Ignored { event } => {
                debug!(%event, "ignoring gateway event");
                Ok(WebhookOutcome::Ignored)
            }
        }
    }

    async fn cancel(
        &self,
        principal: &Principal,
        id: &BookingId,
        reason: Option<String>,
    ) -> Result<Cancellation, Error> {
        let view = self.load(id).await?;
        if view.booking.user_id != principal.user_id && !principal.is_admin() {
            return Err(Error::forbidden("only the booker can cancel this booking"));
        }
        let now = self.clock.utc();
        view.booking.ensure_cancellable(now, &self.policy)?;

        let booking = self
            .bookings
            .transition(
                id,
                view.booking.status,
                BookingStatus::Cancelled,
                reason,
                now,
            )
            .await?
            .ok_or_else(|| Error::conflict("the booking changed meanwhile; reload and retry"))?;

        let refund = match self.payments.find_by_booking(id).await? {
            Some(mut payment) if payment.status == PaymentStatus::Captured => {
                let amount = refund_due(
                    payment.amount,
                    now,
                    booking.starts_at(&self.policy),
                    &self.policy,
                );
                self.refund(&mut payment, amount, now).await?
            }
            _ => None,
        };

        let view = BookingView { booking, ..view };
        self.notifier
            .send(vec![NewNotification::booking_cancelled(
                view.booking.user_id,
                &view.facts(),
                settled_amount(refund.as_ref()),
            )])
            .await;
        info!(
            booking_id = %view.booking.id,
            refunded = refund.is_some(),
            "booking cancelled"
        );
        Ok(Cancellation {
            booking: view,
            refund,
        })
    }

    async fn complete(&self, principal: &Principal, id: &BookingId) -> Result<BookingView, Error> {
        let view = self.load(id).await?;
        if view.venue_owner_id != principal.user_id && !principal.is_admin() {
            return Err(Error::forbidden("only the venue owner can complete this booking"));
        }
        let now = self.clock.utc();
        view.booking.ensure_completable(now, &self.policy)?;
        let booking = self
            .bookings
            .transition(
                id,
                BookingStatus::Confirmed,
                BookingStatus::Completed,
                None,
                now,
            )
            .await?
            .ok_or_else(|| Error::conflict("the booking changed meanwhile; reload and retry"))?;
        let view = BookingView { booking, ..view };
        self.notifier
            .send(vec![NewNotification::booking_completed(
                view.booking.user_id,
                &view.facts(),
            )])
            .await;
        Ok(view)
    }
}

#[async_trait]
impl BookingQuery for BookingService {
    async fn get(&self, principal: &Principal, id: &BookingId) -> Result<BookingView, Error> {
        let view = self.load(id).await?;
        let allowed = principal.is_admin()
            || view.booking.user_id == principal.user_id
            || view.venue_owner_id == principal.user_id;
        if allowed {
            Ok(view)
        } else {
            Err(Error::forbidden("you cannot view this booking"))
        }
    }

    async fn list_mine(
        &self,
        principal: &Principal,
        query: MyBookingsQuery,
        page: PageRequest,
    ) -> Result<Page<BookingView>, Error> {
        let today = self.policy.local_date(self.clock.utc());
        let (from_date, before_date) = match query.scope {
            BookingScope::Upcoming => (Some(today), None),
            BookingScope::Past => (None, Some(today)),
            BookingScope::All => (None, None),
        };
        let filter = BookingFilter {
            user_id: Some(principal.user_id),
            status: query.status,
            from_date,
            before_date,
            ..BookingFilter::default()
        };
        let (rows, total) = self.bookings.list(&filter, page).await?;
        Ok(Page::new(rows, page, total))
    }

    async fn list_for_owner(
        &self,
        principal: &Principal,
        query: OwnerBookingsQuery,
        page: PageRequest,
    ) -> Result<Page<BookingView>, Error> {
        principal.require_owner()?;
        let filter = BookingFilter {
            venue_owner_id: (!principal.is_admin()).then_some(principal.user_id),
            venue_id: query.venue_id,
            status: query.status,
            ..BookingFilter::default()
        };
        let (rows, total) = self.bookings.list(&filter, page).await?;
        Ok(Page::new(rows, page, total))
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
