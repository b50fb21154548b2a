use club_kernel::prelude::{ApiError, DatabaseError, Entity, FieldErrors};
use std::borrow::Cow;

#[club_derive::club_error]
pub enum TeamError {
    #[error("Team {id} not found")]
    NotFound { id: i64 },

    #[error("{errors}")]
    Invalid { errors: FieldErrors },

    #[error("Database error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Query error{}: {source}", format_context(.context))]
    Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal teams error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<TeamError> for ApiError {
    fn from(error: TeamError) -> Self {
        match error {
            TeamError::NotFound { .. } => Self::not_found(Entity::Team),
            TeamError::Invalid { errors } => Self::bad_request(errors.to_string()),
            TeamError::Database { source, context } => Self::Database { source, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
