//! Regression coverage for port error mapping.

use rstest::rstest;

use super::*;
use crate::domain::{Error, ErrorCode};

#[rstest]
#[case(UserRepositoryError::connection("refused").into(), ErrorCode::ServiceUnavailable)]
#[case(UserRepositoryError::query("syntax").into(), ErrorCode::InternalError)]
#[case(UserRepositoryError::duplicate_email().into(), ErrorCode::Conflict)]
#[case(AmenityRepositoryError::duplicate_name().into(), ErrorCode::Conflict)]
#[case(ReviewRepositoryError::duplicate().into(), ErrorCode::Conflict)]
#[case(BookingRepositoryError::connection("pool timed out").into(), ErrorCode::ServiceUnavailable)]
#[case(PaymentGatewayError::unavailable("502").into(), ErrorCode::ServiceUnavailable)]
#[case(PaymentGatewayError::invalid_signature().into(), ErrorCode::Unauthorized)]
#[case(PaymentGatewayError::invalid_payload("not json").into(), ErrorCode::InvalidRequest)]
#[case(TokenServiceError::expired().into(), ErrorCode::Unauthorized)]
#[case(TokenServiceError::signing("bad key").into(), ErrorCode::InternalError)]
#[case(PasswordHasherError::malformed().into(), ErrorCode::InternalError)]
#[case(OtpMailerError::rejected("bounced").into(), ErrorCode::ServiceUnavailable)]
fn port_errors_map_to_domain_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn repository_messages_name_the_repository() {
    let error: Error = VenueRepositoryError::query("relation missing").into();
    assert_eq!(error.message(), "venue repository error: relation missing");
}
