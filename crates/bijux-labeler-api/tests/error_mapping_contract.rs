use bijux_labeler_api::error_mapping::{map_error, status_for_code, API_ERROR_SCHEMA_REF};
use bijux_labeler_api::{ApiError, ApiErrorCode};
use bijux_labeler_store::{StoreError, StoreErrorCode};
use serde_json::json;

#[test]
fn api_error_mapping_is_centralized_and_stable() {
    let expected = [
        (ApiErrorCode::NotFound, 404),
        (ApiErrorCode::AlreadyExists, 409),
        (ApiErrorCode::InvalidName, 400),
        (ApiErrorCode::InvalidPath, 400),
        (ApiErrorCode::InvalidRequest, 400),
        (ApiErrorCode::PayloadTooLarge, 413),
        (ApiErrorCode::IoError, 500),
        (ApiErrorCode::Internal, 500),
    ];
    assert_eq!(expected.len(), ApiErrorCode::ALL.len());
    for (code, status) in expected {
        let err = ApiError::new(code, "x", json!({}), "req-1");
        let mapped = map_error(&err);
        assert_eq!(mapped.status_code, status, "{code}");
        assert_eq!(mapped.schema_ref, API_ERROR_SCHEMA_REF);
        assert_eq!(status_for_code(code), status);
    }
}

#[test]
fn store_failures_keep_their_meaning_on_the_wire() {
    let err = ApiError::from(StoreError::new(StoreErrorCode::InvalidName, "bad"));
    assert_eq!(err.code, ApiErrorCode::InvalidName);
    assert_eq!(err.message, "bad");

    let err = ApiError::from(&StoreError::already_exists("project `cats`"))
        .with_request_id("req-00000000000000aa");
    let wire = serde_json::to_value(&err).expect("serialize");
    assert_eq!(wire["code"], "ALREADY_EXISTS");
    assert_eq!(wire["message"], "project `cats` already exists");
    assert_eq!(wire["request_id"], "req-00000000000000aa");
}

#[test]
fn api_error_rejects_unknown_fields() {
    let raw = json!({
        "code": "NOT_FOUND",
        "message": "m",
        "details": {},
        "request_id": "r",
        "extra": 1
    });
    assert!(serde_json::from_value::<ApiError>(raw).is_err());
}
