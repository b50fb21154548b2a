use club_kernel::prelude::{ApiError, DatabaseError, Entity, FieldErrors};
use std::borrow::Cow;

#[club_derive::club_error]
pub enum TournamentError {
    #[error("Tournament {id} not found")]
    NotFound { id: i64 },

    #[error("{errors}")]
    Invalid { errors: FieldErrors },

    #[error("Database error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Query error{}: {source}", format_context(.context))]
    Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal tournaments error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<TournamentError> for ApiError {
    fn from(error: TournamentError) -> Self {
        match error {
            TournamentError::NotFound { .. } => Self::not_found(Entity::Tournament),
            TournamentError::Invalid { errors } => Self::bad_request(errors.to_string()),
            TournamentError::Database { source, context } => Self::Database { source, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
