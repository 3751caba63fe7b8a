use super::*;

#[test]
fn account_errors_map_to_statuses() {
    assert_eq!(account_error_to_status(&AccountError::InvalidName), StatusCode::BAD_REQUEST);
    assert_eq!(account_error_to_status(&AccountError::ReauthRequired), StatusCode::FORBIDDEN);
    assert_eq!(account_error_to_status(&AccountError::NotFound), StatusCode::NOT_FOUND);
}

#[test]
fn upload_errors_map_to_statuses() {
    assert_eq!(account_error_to_status(&AccountError::Storage(StorageError::Empty)), StatusCode::BAD_REQUEST);
    assert_eq!(
        account_error_to_status(&AccountError::Storage(StorageError::UnsupportedType)),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        account_error_to_status(&AccountError::Storage(StorageError::TooLarge { size: 10, max: 5 })),
        StatusCode::PAYLOAD_TOO_LARGE
    );
    let io = std::io::Error::other("disk full");
    assert_eq!(
        account_error_to_status(&AccountError::Storage(StorageError::Io(io))),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn reauth_failure_message_is_exposed() {
    let (status, body) = account_error(AccountError::ReauthRequired);
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "reauthentication required");
}
