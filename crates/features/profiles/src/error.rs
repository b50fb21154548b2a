use club_kernel::prelude::{ApiError, DatabaseError, Entity, FieldErrors};
use std::borrow::Cow;

#[club_derive::club_error]
pub enum ProfileError {
    #[error("Profile {id} not found")]
    NotFound { id: i64 },

    #[error("{errors}")]
    Invalid { errors: FieldErrors },

    #[error("Database error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Query error{}: {source}", format_context(.context))]
    Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    /// A stored enum value no variant matches.
    #[error("Stored value error{}: {source}", format_context(.context))]
    Stored { source: strum::ParseError, context: Option<Cow<'static, str>> },

    #[error("Internal profiles error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<ProfileError> for ApiError {
    fn from(error: ProfileError) -> Self {
        match error {
            ProfileError::NotFound { .. } => Self::not_found(Entity::Profile),
            ProfileError::Invalid { errors } => Self::bad_request(errors.to_string()),
            ProfileError::Database { source, context } => Self::Database { source, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
