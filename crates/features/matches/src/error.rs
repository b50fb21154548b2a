use club_kernel::prelude::{ApiError, DatabaseError, Entity, FieldErrors};
use std::borrow::Cow;

#[club_derive::club_error]
pub enum MatchError {
    #[error("Match {id} not found")]
    NotFound { id: i64 },

    #[error("{errors}")]
    Invalid { errors: FieldErrors },

    #[error("Database error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Query error{}: {source}", format_context(.context))]
    Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal matches error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<MatchError> for ApiError {
    fn from(error: MatchError) -> Self {
        match error {
            MatchError::NotFound { .. } => Self::not_found(Entity::Match),
            MatchError::Invalid { errors } => Self::bad_request(errors.to_string()),
            MatchError::Database { source, context } => Self::Database { source, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
