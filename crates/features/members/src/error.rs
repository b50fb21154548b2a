use club_kernel::prelude::{ApiError, DatabaseError, Entity, FieldErrors};
use std::borrow::Cow;

#[club_derive::club_error]
pub enum MemberError {
    #[error("Member {id} not found")]
    NotFound { id: i64 },

    /// Field rules or uniqueness failed; nothing was written.
    #[error("{errors}")]
    Invalid { errors: FieldErrors },

    #[error("Database error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Query error{}: {source}", format_context(.context))]
    Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Template error{}: {source}", format_context(.context))]
    Template { source: tera::Error, context: Option<Cow<'static, str>> },

    #[error("Internal members error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<MemberError> for ApiError {
    fn from(error: MemberError) -> Self {
        match error {
            MemberError::NotFound { .. } => Self::not_found(Entity::Member),
            MemberError::Invalid { errors } => Self::bad_request(errors.to_string()),
            MemberError::Database { source, context } => Self::Database { source, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
