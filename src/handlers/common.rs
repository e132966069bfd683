use crate::errors::{ApiError, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// 303 redirect after a successful form submission.
pub fn redirect_see_other(location: &str) -> Response {
    Redirect::to(location).into_response()
}

/// Outcome of a form-encoded mutation.
///
/// Ledger precondition violations and referential conflicts carry the
/// operator back to the source page with a human-readable message; lookups
/// that failed outright surface as regular error responses.
pub fn form_result(result: Result<(), ServiceError>, back: &str) -> Response {
    match result {
        Ok(()) => redirect_see_other(back),
        Err(
            err @ (ServiceError::NotFound(_)
            | ServiceError::DatabaseError(_)
            | ServiceError::EventError(_)
            | ServiceError::InternalError(_)),
        ) => err.into_response(),
        Err(err) => {
            let message: String =
                url::form_urlencoded::byte_serialize(err.response_message().as_bytes()).collect();
            Redirect::to(&format!("{}?error={}", back, message)).into_response()
        }
    }
}
