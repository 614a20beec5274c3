use super::*;

fn server(status: u16, kind: ErrorKind, message: Option<&str>) -> ApiError {
    ApiError::Server { status, kind, message: message.map(str::to_owned) }
}

// =============================================================================
// notice_for_message
// =============================================================================

#[test]
fn known_messages_are_mapped() {
    let notice = notice_for_message("invalid email or password");
    assert_eq!(notice.text, "Email address or password is incorrect.");
    assert_eq!(notice.action, NoticeAction::None);

    assert_eq!(notice_for_message("invalid csrf token").action, NoticeAction::RefreshCsrf);
    assert_eq!(notice_for_message("invalid or expired jwt").action, NoticeAction::ResetSession);
    assert_eq!(notice_for_message("missing or malformed jwt").action, NoticeAction::ResetSession);
}

#[test]
fn lookup_ignores_case_and_padding() {
    assert_eq!(notice_for_message("  Email Already Exists ").text, "This email address is already registered.");
}

#[test]
fn unknown_message_passes_through() {
    let notice = notice_for_message("quota exceeded");
    assert_eq!(notice.text, "quota exceeded");
    assert_eq!(notice.action, NoticeAction::None);
}

#[test]
fn empty_message_gets_generic_text() {
    assert_eq!(notice_for_message("").text, GENERIC_FAILURE);
}

// =============================================================================
// notice_for
// =============================================================================

#[test]
fn csrf_fetch_failure_is_communication_failure() {
    assert_eq!(notice_for(&ApiError::CsrfFetch).text, COMMUNICATION_FAILED);
}

#[test]
fn auth_without_message_resets_session() {
    let notice = notice_for(&ApiError::Auth { status: 401, message: None });
    assert_eq!(notice.text, SESSION_EXPIRED);
    assert_eq!(notice.action, NoticeAction::ResetSession);
}

#[test]
fn known_message_beats_variant_default() {
    let err = ApiError::Auth { status: 401, message: Some("invalid email or password".into()) };
    assert_eq!(notice_for(&err).action, NoticeAction::None);
}

#[test]
fn csrf_rejection_asks_for_refresh() {
    let err = ApiError::Csrf { status: 403, message: Some("missing csrf token in request header".into()) };
    let notice = notice_for(&err);
    assert_eq!(notice.action, NoticeAction::RefreshCsrf);
    assert_eq!(notice.text, "missing csrf token in request header");
}

#[test]
fn server_error_prefers_server_text() {
    assert_eq!(notice_for(&server(500, ErrorKind::Internal, Some("db down"))).text, "db down");
    assert_eq!(notice_for(&server(500, ErrorKind::Internal, None)).text, GENERIC_FAILURE);
    assert_eq!(notice_for(&server(404, ErrorKind::NotFound, None)).text, "The requested item was not found.");
}

#[test]
fn validation_reason_is_shown() {
    assert_eq!(notice_for(&ApiError::Validation("email is required".into())).text, "email is required");
}

#[test]
fn user_message_uses_notice_text() {
    assert_eq!(ApiError::CsrfFetch.user_message(), COMMUNICATION_FAILED);
}

// =============================================================================
// notice_for_event
// =============================================================================

#[test]
fn lifecycle_events_have_no_notice() {
    assert_eq!(notice_for_event(&SessionEvent::LoginSuccess), None);
    assert_eq!(notice_for_event(&SessionEvent::LogoutSuccess), None);
}

#[test]
fn unauthorized_event_resets_session() {
    let notice = notice_for_event(&SessionEvent::Unauthorized { reason: "session expired".into() }).unwrap();
    assert_eq!(notice.text, SESSION_EXPIRED);
    assert_eq!(notice.action, NoticeAction::ResetSession);

    let notice = notice_for_event(&SessionEvent::Unauthorized { reason: "missing or malformed jwt".into() }).unwrap();
    assert_eq!(notice.text, "Your credentials are invalid. Please log in again.");
}

#[test]
fn error_event_shows_message() {
    let notice = notice_for_event(&SessionEvent::Error { message: COMMUNICATION_FAILED.into() }).unwrap();
    assert_eq!(notice.text, COMMUNICATION_FAILED);
}
