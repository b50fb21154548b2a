use super::state::ApiStateError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use club_database::DatabaseError;
use club_derive::api_model;
use club_domain::events::Entity;
use std::borrow::Cow;
use tracing::error;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Body of every JSON error response.
#[api_model]
pub struct ErrorResponse {
    /// Human-readable reason
    pub error: String,
}

/// Failure of a JSON endpoint.
///
/// `NotFound` and `BadRequest` carry the message shown to the client; every
/// other variant is logged and answered with a generic 500.
#[club_derive::club_error]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    BadRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("API state error{}: {source}", format_context(.context))]
    State { source: ApiStateError, context: Option<Cow<'static, str>> },

    #[error("Database error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Internal server error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    /// `404 {"error": "{Entity} not found"}`.
    #[must_use]
    pub fn not_found(entity: Entity) -> Self {
        Self::NotFound { message: format!("{entity} not found").into(), context: None }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::State { .. } | Self::Database { .. } | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            INTERNAL_MESSAGE.to_owned()
        } else {
            self.to_string()
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let error = ApiError::not_found(Entity::Tournament);
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "Tournament not found");

        let error = ApiError::bad_request("This email is already in use.");
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "This email is already in use.");
    }

    #[test]
    fn context_does_not_leak_into_client_messages() {
        let error: Result<(), ApiError> = Err(ApiError::not_found(Entity::Member));
        let error = error.context("loading member 4").unwrap_err();
        assert_eq!(error.to_string(), "Member not found");
    }

    #[test]
    fn server_errors_are_internal() {
        let error: ApiError = "pool closed".into();
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing = ApiStateError::MissingSlice { message: "Members".into(), context: None };
        assert_eq!(ApiError::from(missing).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
