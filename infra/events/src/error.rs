use std::borrow::Cow;

#[club_derive::club_error]
pub enum EventBusError {
    /// The channel registered for a type holds a different sender type.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Channel capacity must be at least one.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
