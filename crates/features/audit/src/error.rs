use club_event_bus::EventBusError;
use std::borrow::Cow;

/// Audit slice error type.
#[club_derive::club_error]
pub enum AuditError {
    #[error("Activity subscription failed{}: {source}", format_context(.context))]
    Subscribe { source: EventBusError, context: Option<Cow<'static, str>> },

    #[error("Audit error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
