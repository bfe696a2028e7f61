//! Tests for the moderation service.

use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::driven_ports::test_ports::{MockPorts, fixture_now};
use crate::domain::ports::AmenityRepositoryError;
use crate::domain::test_fixtures::{account, principal, venue};
use crate::domain::{
    ErrorCode, NotificationKind, ReportReason,
};

fn service(mocks: MockPorts) -> ModerationService {
    ModerationService::new(&mocks.into_ports())
}

fn open_report(reporter_id: UserId) -> Report {
    Report {
        id: ReportId::random(),
        reporter_id,
        target_kind: ReportTargetKind::Venue,
        target_id: Uuid::new_v4(),
        reason: ReportReason::FakeListing,
        description: "Photos are from another venue".into(),
        status: ReportStatus::Open,
        resolution_note: None,
        resolved_by: None,
        created_at: fixture_now(),
        resolved_at: None,
    }
}

fn new_report(target_kind: ReportTargetKind, target_id: Uuid) -> NewReport {
    NewReport {
        target_kind,
        target_id,
        reason: ReportReason::Harassment,
        description: "Abusive messages after the match".into(),
    }
}

#[rstest]
#[case(UserRole::User)]
#[case(UserRole::FacilityOwner)]
#[tokio::test]
async fn moderation_requires_admin(#[case] role: UserRole) {
    let err = service(MockPorts::default())
        .approve_venue(&principal(role), &VenueId::random())
        .await
        .expect_err("not admin");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn banning_records_the_reason() {
    let admin = principal(UserRole::Admin);
    let target = account(UserRole::User);
    let id = target.id;
    let mut mocks = MockPorts::default();
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(target)));
    mocks
        .users
        .expect_update()
        .withf(|account| account.is_banned())
        .times(1)
        .return_once(|_| Ok(()));

    let banned = service(mocks)
        .ban_user(&admin, &id, "no-show abuse".into())
        .await
        .expect("banned");
    assert_eq!(
        banned.ban.map(|ban| ban.reason),
        Some("no-show abuse".to_owned())
    );
}

#[rstest]
#[tokio::test]
async fn admins_cannot_be_banned() {
    let other_admin = account(UserRole::Admin);
    let id = other_admin.id;
    let mut mocks = MockPorts::default();
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(other_admin)));
    mocks.users.expect_update().never();

    let err = service(mocks)
        .ban_user(&principal(UserRole::Admin), &id, "rogue".into())
        .await
        .expect_err("admin target");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admins_cannot_ban_themselves() {
    let admin = principal(UserRole::Admin);
    let err = service(MockPorts::default())
        .ban_user(&admin, &admin.user_id, "testing".into())
        .await
        .expect_err("self ban");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(true, NotificationKind::VenueApproved)]
#[case(false, NotificationKind::VenueRejected)]
#[tokio::test]
async fn owners_hear_the_moderation_outcome(
    #[case] approve: bool,
    #[case] kind: NotificationKind,
) {
    let pending = venue(UserId::random(), VenueStatus::Pending);
    let owner_id = pending.owner_id;
    let id = pending.id;
    let mut mocks = MockPorts::default();
    mocks
        .venues
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pending)));
    mocks.venues.expect_update().return_once(|_| Ok(()));
    mocks
        .notifications
        .expect_insert_many()
        .withf(move |notes, _| {
            notes
                .first()
                .is_some_and(|note| note.kind == kind && note.user_id == owner_id)
        })
        .times(1)
        .return_once(|_, _| Ok(()));
    let admin = principal(UserRole::Admin);
    let moderation = service(mocks);

    let moderated = if approve {
        moderation.approve_venue(&admin, &id).await
    } else {
        moderation
            .reject_venue(&admin, &id, "Blurry photos".into())
            .await
    }
    .expect("moderated");
    let expected = if approve {
        VenueStatus::Approved
    } else {
        VenueStatus::Rejected
    };
    assert_eq!(moderated.status, expected);
}

#[rstest]
#[tokio::test]
async fn resolving_a_report_notifies_the_reporter() {
    let reporter = UserId::random();
    let report = open_report(reporter);
    let id = report.id;
    let mut mocks = MockPorts::default();
    mocks
        .reports
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(report)));
    mocks.reports.expect_update().return_once(|_| Ok(()));
    mocks
        .notifications
        .expect_insert_many()
        .withf(move |notes, _| notes.first().is_some_and(|note| note.user_id == reporter))
        .return_once(|_, _| Ok(()));
    let admin = principal(UserRole::Admin);

    let closed = service(mocks)
        .resolve_report(&admin, &id, ReportStatus::Dismissed, Some("Listing verified".into()))
        .await
        .expect("closed");
    assert_eq!(closed.status, ReportStatus::Dismissed);
    assert_eq!(closed.resolved_by, Some(admin.user_id));
}

#[rstest]
#[tokio::test]
async fn closed_reports_stay_closed() {
    let mut report = open_report(UserId::random());
    report.status = ReportStatus::Resolved;
    let id = report.id;
    let mut mocks = MockPorts::default();
    mocks
        .reports
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(report)));
    mocks.reports.expect_update().never();

    let err = service(mocks)
        .resolve_report(&principal(UserRole::Admin), &id, ReportStatus::Dismissed, None)
        .await
        .expect_err("already closed");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn duplicate_amenities_conflict() {
    let mut mocks = MockPorts::default();
    mocks
        .amenities
        .expect_create()
        .return_once(|_| Err(AmenityRepositoryError::duplicate_name()));

    let err = service(mocks)
        .create_amenity(&principal(UserRole::Admin), "Parking".into(), None)
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn reporting_yourself_is_rejected() {
    let me = principal(UserRole::User);
    let mut mocks = MockPorts::default();
    mocks.reports.expect_create().never();

    let err = service(mocks)
        .submit(&me, new_report(ReportTargetKind::User, *me.user_id.as_uuid()))
        .await
        .expect_err("self report");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn reports_need_an_existing_target(
    #[case] exists: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let listed = venue(UserId::random(), VenueStatus::Approved);
    let target = *listed.id.as_uuid();
    let mut mocks = MockPorts::default();
    mocks
        .venues
        .expect_find_by_id()
        .return_once(move |_| Ok(exists.then_some(listed)));
    mocks
        .reports
        .expect_create()
        .times(usize::from(exists))
        .returning(|_| Ok(()));

    let result = service(mocks)
        .submit(
            &principal(UserRole::User),
            new_report(ReportTargetKind::Venue, target),
        )
        .await;
    assert_eq!(result.err().map(|err| err.code()), expected);
}
