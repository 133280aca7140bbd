use featgate_errors::{ApiError, ErrorCode};
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case(-1, ErrorCode::UnknownServerError)]
#[test_case(0, ErrorCode::None)]
#[test_case(42, ErrorCode::InvalidRequest)]
#[test_case(95, ErrorCode::InvalidUpdateVersion)]
#[test_case(96, ErrorCode::FeatureUpdateFailed)]
fn wire_codes(code: i16, kind: ErrorCode) {
    assert_eq!(ErrorCode::from_code(code), kind);
    assert_eq!(kind.code(), code);
    assert_eq!(i16::from(kind), code);
}

#[test_case(i16::MIN)]
#[test_case(-2)]
#[test_case(1000)]
#[test_case(i16::MAX)]
fn unknown_wire_codes(code: i16) {
    assert_eq!(ErrorCode::try_from_code(code), None);
    assert_eq!(ErrorCode::from_code(code), ErrorCode::UnknownServerError);
}

#[test]
fn default_messages() {
    assert_eq!(
        ApiError::new(ErrorCode::InvalidUpdateVersion).message(),
        Some("The given update version was invalid.")
    );
    assert_eq!(ApiError::from(ErrorCode::None), ApiError::NONE);
    assert_eq!(ApiError::NONE.message(), None);
}
