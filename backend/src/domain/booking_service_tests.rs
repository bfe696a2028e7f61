//! Tests for the booking service.

use pagination::PagePolicy;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::driven_ports::test_ports::{MockPorts, fixture_now};
use crate::domain::ports::{PaymentGatewayError, PaymentRepositoryError};
use crate::domain::test_fixtures::{booking, court, date, principal, venue, view, window};
use crate::domain::{
    Court, ErrorCode, GatewayOrder, GatewayRefund, NotificationKind, SlotWindow, UserRole,
    VenueStatus,
};

fn service(mocks: MockPorts) -> BookingService {
    BookingService::new(&mocks.into_ports(), BookingPolicy::default())
}

fn payment(booking: &Booking, status: PaymentStatus) -> Payment {
    Payment {
        id: PaymentId::random(),
        booking_id: booking.id,
        gateway_order_id: "order_1".into(),
        gateway_payment_id: (status != PaymentStatus::Created).then(|| "pay_1".to_owned()),
        amount: booking.total,
        currency: CURRENCY.into(),
        status,
        failure_reason: None,
        created_at: booking.created_at,
        updated_at: booking.created_at,
    }
}

fn confirmation() -> CheckoutConfirmation {
    CheckoutConfirmation {
        order_id: "order_1".into(),
        payment_id: "pay_1".into(),
        signature: "abc123".into(),
    }
}

fn money(minor: i64) -> Money {
    Money::from_minor(minor).expect("money")
}

struct Scene {
    owner: Principal,
    booker: Principal,
    court: Court,
}

#[fixture]
fn scene() -> Scene {
    let owner = principal(UserRole::FacilityOwner);
    let listed = venue(owner.user_id, VenueStatus::Approved);
    Scene {
        owner,
        booker: principal(UserRole::User),
        court: court(listed.id),
    }
}

impl Scene {
    fn booking(&self, slot: SlotWindow, status: BookingStatus) -> Booking {
        booking(self.booker.user_id, &self.court, slot, status, fixture_now())
    }

    fn view(&self, booking: Booking) -> BookingView {
        view(booking, self.owner.user_id)
    }

    fn expect_catalogue(&self, mocks: &mut MockPorts) {
        let court = self.court.clone();
        let mut listed = venue(self.owner.user_id, VenueStatus::Approved);
        listed.id = court.venue_id;
        mocks
            .courts
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(court)));
        mocks
            .venues
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(listed)));
    }

    fn request(&self, slot: SlotWindow) -> BookingRequest {
        BookingRequest {
            court_id: self.court.id,
            window: slot,
        }
    }
}

fn tomorrow_evening() -> SlotWindow {
    window(date(2026, 6, 2), 18, 20)
}

#[rstest]
#[tokio::test]
async fn create_reserves_and_opens_an_order(scene: Scene) {
    let mut mocks = MockPorts::default();
    scene.expect_catalogue(&mut mocks);
    mocks
        .bookings
        .expect_reserve()
        .withf(|booking, _| booking.status == BookingStatus::Pending)
        .return_once(|_, _| Ok(ReserveOutcome::Reserved));
    mocks
        .gateway
        .expect_create_order()
        .withf(|amount, currency, _| *amount == money(100_000) && currency == "INR")
        .return_once(|amount, currency, _| {
            Ok(GatewayOrder {
                order_id: "order_1".into(),
                amount,
                currency: currency.to_owned(),
            })
        });
    mocks
        .payments
        .expect_create()
        .withf(|payment| payment.status == PaymentStatus::Created)
        .return_once(|_| Ok(()));
    mocks
        .gateway
        .expect_key_id()
        .return_const("rzp_test_key".to_owned());

    let checkout = service(mocks)
        .create(&scene.booker, scene.request(tomorrow_evening()))
        .await
        .expect("booking created");
    assert_eq!(checkout.booking.booking.total, money(100_000));
    assert_eq!(checkout.booking.venue_owner_id, scene.owner.user_id);
    assert_eq!(checkout.checkout.order_id, "order_1");
    assert_eq!(checkout.checkout.key_id, "rzp_test_key");
}

#[rstest]
#[tokio::test]
async fn create_rejects_taken_slots(scene: Scene) {
    let mut mocks = MockPorts::default();
    scene.expect_catalogue(&mut mocks);
    mocks
        .bookings
        .expect_reserve()
        .return_once(|_, _| Ok(ReserveOutcome::SlotTaken));
    mocks.gateway.expect_create_order().never();

    let err = service(mocks)
        .create(&scene.booker, scene.request(tomorrow_evening()))
        .await
        .expect_err("slot taken");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_releases_the_slot_when_the_gateway_is_down(scene: Scene) {
    let mut mocks = MockPorts::default();
    scene.expect_catalogue(&mut mocks);
    mocks
        .bookings
        .expect_reserve()
        .return_once(|_, _| Ok(ReserveOutcome::Reserved));
    mocks
        .gateway
        .expect_create_order()
        .return_once(|_, _, _| Err(PaymentGatewayError::unavailable("timeout")));
    mocks
        .bookings
        .expect_transition()
        .withf(|_, from, to, _, _| {
            *from == BookingStatus::Pending && *to == BookingStatus::Cancelled
        })
        .times(1)
        .return_once(|_, _, _, _, _| Ok(None));
    mocks.payments.expect_create().never();

    let err = service(mocks)
        .create(&scene.booker, scene.request(tomorrow_evening()))
        .await
        .expect_err("gateway down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn create_releases_the_slot_when_the_payment_cannot_be_recorded(scene: Scene) {
    let mut mocks = MockPorts::default();
    scene.expect_catalogue(&mut mocks);
    mocks
        .bookings
        .expect_reserve()
        .return_once(|_, _| Ok(ReserveOutcome::Reserved));
    mocks
        .gateway
        .expect_create_order()
        .return_once(|amount, currency, _| {
            Ok(GatewayOrder {
                order_id: "order_1".into(),
                amount,
                currency: currency.to_owned(),
            })
        });
    mocks
        .payments
        .expect_create()
        .return_once(|_| Err(PaymentRepositoryError::query("duplicate order id")));
    mocks
        .bookings
        .expect_transition()
        .withf(|_, from, to, _, _| {
            *from == BookingStatus::Pending && *to == BookingStatus::Cancelled
        })
        .times(1)
        .return_once(|_, _, _, _, _| Ok(None));

    let err = service(mocks)
        .create(&scene.booker, scene.request(tomorrow_evening()))
        .await
        .expect_err("payment insert failed");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[case::already_started(window(date(2026, 6, 1), 15, 16))]
#[case::too_long(window(date(2026, 6, 2), 8, 15))]
#[case::outside_hours(window(date(2026, 6, 2), 21, 23))]
#[case::too_far_ahead(window(date(2026, 7, 15), 10, 11))]
#[tokio::test]
async fn create_validates_the_window(scene: Scene, #[case] slot: SlotWindow) {
    let mut mocks = MockPorts::default();
    scene.expect_catalogue(&mut mocks);
    mocks.bookings.expect_reserve().never();

    let err = service(mocks)
        .create(&scene.booker, scene.request(slot))
        .await
        .expect_err("invalid window");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn confirm_rejects_forged_signatures(scene: Scene) {
    let mut mocks = MockPorts::default();
    mocks.gateway.expect_verify_checkout().return_const(false);
    mocks.payments.expect_find_by_order().never();

    let err = service(mocks)
        .confirm_payment(&scene.booker, confirmation())
        .await
        .expect_err("forged");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn confirm_captures_and_notifies_both_parties(scene: Scene) {
    let pending = scene.booking(tomorrow_evening(), BookingStatus::Pending);
    let mut confirmed = pending.clone();
    confirmed.status = BookingStatus::Confirmed;
    let stored = payment(&pending, PaymentStatus::Created);
    let found = scene.view(pending);

    let mut mocks = MockPorts::default();
    mocks.gateway.expect_verify_checkout().return_const(true);
    mocks
        .payments
        .expect_find_by_order()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .bookings
        .expect_find()
        .returning(move |_| Ok(Some(found.clone())));
    mocks
        .payments
        .expect_update()
        .withf(|payment| {
            payment.status == PaymentStatus::Captured
                && payment.gateway_payment_id.as_deref() == Some("pay_1")
        })
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .bookings
        .expect_confirm()
        .return_once(move |_, _, _| Ok(ConfirmOutcome::Confirmed(confirmed)));
    mocks
        .notifications
        .expect_insert_many()
        .withf(|notes, _| {
            notes.iter().map(|note| note.kind).collect::<Vec<_>>()
                == [NotificationKind::BookingConfirmed, NotificationKind::NewBooking]
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let view = service(mocks)
        .confirm_payment(&scene.booker, confirmation())
        .await
        .expect("confirmed");
    assert_eq!(view.booking.status, BookingStatus::Confirmed);
}

#[rstest]
#[tokio::test]
async fn confirm_refunds_in_full_when_the_slot_was_lost(scene: Scene) {
    let pending = scene.booking(tomorrow_evening(), BookingStatus::Pending);
    let mut lost = pending.clone();
    lost.status = BookingStatus::Cancelled;
    let stored = payment(&pending, PaymentStatus::Created);
    let found = scene.view(pending);

    let mut mocks = MockPorts::default();
    mocks.allow_notifications();
    mocks.gateway.expect_verify_checkout().return_const(true);
    mocks
        .payments
        .expect_find_by_order()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .bookings
        .expect_find()
        .returning(move |_| Ok(Some(found.clone())));
    mocks
        .bookings
        .expect_confirm()
        .return_once(move |_, _, _| Ok(ConfirmOutcome::SlotTaken(lost)));
    mocks
        .gateway
        .expect_refund()
        .withf(|id, amount| id == "pay_1" && *amount == money(100_000))
        .return_once(|_, amount| {
            Ok(GatewayRefund {
                refund_id: "rfnd_1".into(),
                amount,
                status: RefundStatus::Pending,
            })
        });
    mocks
        .payments
        .expect_create_refund()
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .payments
        .expect_update()
        .withf(|payment| payment.status == PaymentStatus::Captured)
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .payments
        .expect_update()
        .withf(|payment| payment.status == PaymentStatus::Refunded)
        .times(1)
        .return_once(|_| Ok(()));

    let err = service(mocks)
        .confirm_payment(&scene.booker, confirmation())
        .await
        .expect_err("slot lost");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn confirm_is_idempotent(scene: Scene) {
    let confirmed = scene.booking(tomorrow_evening(), BookingStatus::Confirmed);
    let stored = payment(&confirmed, PaymentStatus::Captured);
    let found = scene.view(confirmed.clone());

    let mut mocks = MockPorts::default();
    mocks.gateway.expect_verify_checkout().return_const(true);
    mocks
        .payments
        .expect_find_by_order()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .bookings
        .expect_find()
        .returning(move |_| Ok(Some(found.clone())));
    mocks.payments.expect_update().never();
    mocks
        .bookings
        .expect_confirm()
        .return_once(move |_, _, _| Ok(ConfirmOutcome::AlreadyConfirmed(confirmed)));
    mocks.notifications.expect_insert_many().never();

    let view = service(mocks)
        .confirm_payment(&scene.booker, confirmation())
        .await
        .expect("already confirmed");
    assert_eq!(view.booking.status, BookingStatus::Confirmed);
}

#[rstest]
#[tokio::test]
async fn webhook_signature_mismatch_is_unauthorised() {
    let mut mocks = MockPorts::default();
    mocks
        .gateway
        .expect_parse_webhook()
        .return_once(|_, _| Err(PaymentGatewayError::invalid_signature()));

    let err = service(mocks)
        .handle_webhook(b"{}", "bad")
        .await
        .expect_err("bad signature");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case(GatewayEvent::PaymentCaptured { order_id: "order_x".into(), payment_id: "pay_x".into() })]
#[case(GatewayEvent::Ignored { event: "order.paid".into() })]
#[tokio::test]
async fn webhook_acknowledges_what_it_cannot_apply(#[case] event: GatewayEvent) {
    let mut mocks = MockPorts::default();
    mocks
        .gateway
        .expect_parse_webhook()
        .return_once(move |_, _| Ok(event));
    mocks.payments.expect_find_by_order().returning(|_| Ok(None));

    let outcome = service(mocks)
        .handle_webhook(b"{}", "sig")
        .await
        .expect("acknowledged");
    assert_eq!(outcome, WebhookOutcome::Ignored);
}

#[rstest]
#[tokio::test]
async fn webhook_payment_failure_releases_the_booking(scene: Scene) {
    let pending = scene.booking(tomorrow_evening(), BookingStatus::Pending);
    let stored = payment(&pending, PaymentStatus::Created);
    let mut cancelled = pending.clone();
    cancelled.status = BookingStatus::Cancelled;
    let found = scene.view(cancelled.clone());

    let mut mocks = MockPorts::default();
    mocks.gateway.expect_parse_webhook().return_once(|_, _| {
        Ok(GatewayEvent::PaymentFailed {
            order_id: "order_1".into(),
            payment_id: "pay_1".into(),
            reason: Some("card declined".into()),
        })
    });
    mocks
        .payments
        .expect_find_by_order()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .payments
        .expect_update()
        .withf(|payment| {
            payment.status == PaymentStatus::Failed
                && payment.failure_reason.as_deref() == Some("card declined")
        })
        .return_once(|_| Ok(()));
    mocks
        .bookings
        .expect_transition()
        .return_once(move |_, _, _, _, _| Ok(Some(cancelled)));
    mocks
        .bookings
        .expect_find()
        .return_once(move |_| Ok(Some(found)));
    mocks
        .notifications
        .expect_insert_many()
        .withf(|notes, _| {
            notes.len() == 1
                && notes.first().map(|note| note.kind) == Some(NotificationKind::PaymentFailed)
        })
        .return_once(|_, _| Ok(()));

    let outcome = service(mocks)
        .handle_webhook(b"{}", "sig")
        .await
        .expect("applied");
    assert_eq!(outcome, WebhookOutcome::Applied);
}

#[rstest]
#[tokio::test]
async fn replayed_capture_for_a_cancelled_booking_changes_nothing(scene: Scene) {
    let cancelled = scene.booking(tomorrow_evening(), BookingStatus::Cancelled);
    let stored = payment(&cancelled, PaymentStatus::Refunded);
    let found = scene.view(cancelled.clone());

    let mut mocks = MockPorts::default();
    mocks.gateway.expect_parse_webhook().return_once(|_, _| {
        Ok(GatewayEvent::PaymentCaptured {
            order_id: "order_1".into(),
            payment_id: "pay_1".into(),
        })
    });
    mocks
        .payments
        .expect_find_by_order()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .bookings
        .expect_find()
        .returning(move |_| Ok(Some(found.clone())));
    mocks
        .bookings
        .expect_confirm()
        .return_once(move |_, _, _| Ok(ConfirmOutcome::NotPending(cancelled)));
    mocks.payments.expect_update().never();
    mocks.gateway.expect_refund().never();
    mocks.notifications.expect_insert_many().never();

    let outcome = service(mocks)
        .handle_webhook(b"{}", "sig")
        .await
        .expect("acknowledged");
    assert_eq!(outcome, WebhookOutcome::Applied);
}

#[rstest]
#[case::early(window(date(2026, 6, 3), 18, 20), 100_000)]
#[case::late(window(date(2026, 6, 2), 10, 12), 50_000)]
#[tokio::test]
async fn cancel_refunds_by_notice_period(
    scene: Scene,
    #[case] slot: SlotWindow,
    #[case] expected: i64,
) {
    let confirmed = scene.booking(slot, BookingStatus::Confirmed);
    let stored = payment(&confirmed, PaymentStatus::Captured);
    let mut cancelled = confirmed.clone();
    cancelled.status = BookingStatus::Cancelled;
    let found = scene.view(confirmed);

    let mut mocks = MockPorts::default();
    mocks.allow_notifications();
    mocks
        .bookings
        .expect_find()
        .return_once(move |_| Ok(Some(found)));
    mocks
        .bookings
        .expect_transition()
        .withf(|_, from, to, _, _| {
            *from == BookingStatus::Confirmed && *to == BookingStatus::Cancelled
        })
        .return_once(move |_, _, _, _, _| Ok(Some(cancelled)));
    mocks
        .payments
        .expect_find_by_booking()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .gateway
        .expect_refund()
        .withf(move |_, amount| *amount == money(expected))
        .return_once(|_, amount| {
            Ok(GatewayRefund {
                refund_id: "rfnd_1".into(),
                amount,
                status: RefundStatus::Processed,
            })
        });
    mocks.payments.expect_create_refund().return_once(|_| Ok(()));
    mocks.payments.expect_update().return_once(|_| Ok(()));

    let cancellation = service(mocks)
        .cancel(&scene.booker, &BookingId::random(), Some("rain".into()))
        .await
        .expect("cancelled");
    assert_eq!(cancellation.booking.booking.status, BookingStatus::Cancelled);
    assert_eq!(
        cancellation.refund.map(|refund| refund.amount),
        Some(money(expected))
    );
}

#[rstest]
#[tokio::test]
async fn cancel_keeps_the_cancellation_when_the_refund_fails(scene: Scene) {
    let confirmed = scene.booking(tomorrow_evening(), BookingStatus::Confirmed);
    let stored = payment(&confirmed, PaymentStatus::Captured);
    let mut cancelled = confirmed.clone();
    cancelled.status = BookingStatus::Cancelled;
    let found = scene.view(confirmed);

    let mut mocks = MockPorts::default();
    mocks.allow_notifications();
    mocks
        .bookings
        .expect_find()
        .return_once(move |_| Ok(Some(found)));
    mocks
        .bookings
        .expect_transition()
        .return_once(move |_, _, _, _, _| Ok(Some(cancelled)));
    mocks
        .payments
        .expect_find_by_booking()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .gateway
        .expect_refund()
        .return_once(|_, _| Err(PaymentGatewayError::unavailable("down")));
    mocks
        .payments
        .expect_create_refund()
        .withf(|refund| refund.status == RefundStatus::Failed)
        .return_once(|_| Ok(()));
    mocks.payments.expect_update().never();

    let cancellation = service(mocks)
        .cancel(&scene.booker, &BookingId::random(), None)
        .await
        .expect("cancelled");
    assert_eq!(
        cancellation.refund.map(|refund| refund.status),
        Some(RefundStatus::Failed)
    );
}

#[rstest]
#[tokio::test]
async fn strangers_cannot_cancel(scene: Scene) {
    let found = scene.view(scene.booking(tomorrow_evening(), BookingStatus::Confirmed));
    let mut mocks = MockPorts::default();
    mocks
        .bookings
        .expect_find()
        .return_once(move |_| Ok(Some(found)));
    mocks.bookings.expect_transition().never();

    let err = service(mocks)
        .cancel(&principal(UserRole::User), &BookingId::random(), None)
        .await
        .expect_err("stranger");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case::slot_not_over(window(date(2026, 6, 1), 18, 19), true, ErrorCode::Conflict)]
#[case::not_the_owner(window(date(2026, 5, 31), 18, 19), false, ErrorCode::Forbidden)]
#[tokio::test]
async fn complete_requires_owner_and_finished_slot(
    scene: Scene,
    #[case] slot: SlotWindow,
    #[case] as_owner: bool,
    #[case] expected: ErrorCode,
) {
    let found = scene.view(scene.booking(slot, BookingStatus::Confirmed));
    let mut mocks = MockPorts::default();
    mocks
        .bookings
        .expect_find()
        .return_once(move |_| Ok(Some(found)));
    mocks.bookings.expect_transition().never();
    let actor = if as_owner { scene.owner } else { scene.booker };

    let err = service(mocks)
        .complete(&actor, &BookingId::random())
        .await
        .expect_err("refused");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn owner_completes_a_finished_booking(scene: Scene) {
    let played = scene.booking(window(date(2026, 5, 31), 18, 19), BookingStatus::Confirmed);
    let mut completed = played.clone();
    completed.status = BookingStatus::Completed;
    let found = scene.view(played);
    let mut mocks = MockPorts::default();
    mocks.allow_notifications();
    mocks
        .bookings
        .expect_find()
        .return_once(move |_| Ok(Some(found)));
    mocks
        .bookings
        .expect_transition()
        .return_once(move |_, _, _, _, _| Ok(Some(completed)));

    let view = service(mocks)
        .complete(&scene.owner, &BookingId::random())
        .await
        .expect("completed");
    assert_eq!(view.booking.status, BookingStatus::Completed);
}

#[rstest]
#[case::booker(0, true)]
#[case::owner(1, true)]
#[case::admin(2, true)]
#[case::stranger(3, false)]
#[tokio::test]
async fn bookings_are_visible_to_the_parties(
    scene: Scene,
    #[case] viewer: usize,
    #[case] visible: bool,
) {
    let found = scene.view(scene.booking(tomorrow_evening(), BookingStatus::Confirmed));
    let viewers = [
        scene.booker,
        scene.owner,
        principal(UserRole::Admin),
        principal(UserRole::User),
    ];
    let mut mocks = MockPorts::default();
    mocks
        .bookings
        .expect_find()
        .return_once(move |_| Ok(Some(found)));

    let result = service(mocks)
        .get(&viewers[viewer], &BookingId::random())
        .await;
    assert_eq!(result.is_ok(), visible);
}

#[rstest]
#[case(BookingScope::Upcoming, Some(date(2026, 6, 1)), None)]
#[case(BookingScope::Past, None, Some(date(2026, 6, 1)))]
#[case(BookingScope::All, None, None)]
#[tokio::test]
async fn my_bookings_scope_uses_the_local_date(
    #[case] scope: BookingScope,
    #[case] from: Option<chrono::NaiveDate>,
    #[case] before: Option<chrono::NaiveDate>,
) {
    let me = principal(UserRole::User);
    let mut mocks = MockPorts::default();
    mocks
        .bookings
        .expect_list()
        .withf(move |filter, _| {
            filter.user_id == Some(me.user_id)
                && filter.from_date == from
                && filter.before_date == before
        })
        .return_once(|_, _| Ok((Vec::new(), 0)));
    let page = PageRequest::new(None, None, PagePolicy::new(20, 100)).expect("page");

    let listed = service(mocks)
        .list_mine(
            &me,
            MyBookingsQuery {
                status: None,
                scope,
            },
            page,
        )
        .await
        .expect("listed");
    assert_eq!(listed.total(), 0);
}

#[rstest]
#[tokio::test]
async fn owner_listing_is_scoped_to_owned_venues() {
    let owner = principal(UserRole::FacilityOwner);
    let mut mocks = MockPorts::default();
    mocks
        .bookings
        .expect_list()
        .withf(move |filter, _| filter.venue_owner_id == Some(owner.user_id))
        .return_once(|_, _| Ok((Vec::new(), 0)));
    let page = PageRequest::new(None, None, PagePolicy::new(20, 100)).expect("page");

    service(mocks)
        .list_for_owner(&owner, OwnerBookingsQuery::default(), page)
        .await
        .expect("listed");

    let err = service(MockPorts::default())
        .list_for_owner(
            &principal(UserRole::User),
            OwnerBookingsQuery::default(),
            page,
        )
        .await
        .expect_err("plain users");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
