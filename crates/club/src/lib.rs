//! Facade over the tennis club slices.
//! Re-exports the shared crates and wires every slice the same way for the
//! server, the seeding tool and integration tests.
//!
//! Keep this crate thin: it composes slices, it holds no business rules.
//!
//! ## Usage
//! - [`migrations`] lists every schema migration in dependency order.
//! - [`init`] builds the slice states for [`ApiState`](kernel::server::ApiState).
//! - [`router`] merges the slice routes with the system routes.

use club_database::{Database, Migration};
pub use club_domain as domain;
use club_domain::config::ApiConfig;
use club_domain::registry::InitializedSlice;
use club_event_bus::EventBus;
pub use club_kernel as kernel;
use club_kernel::prelude::ApiState;
use std::borrow::Cow;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;

pub use club_database as database;
pub use club_event_bus as event_bus;

pub mod server {
    pub mod router {
        pub use club_kernel::server::router::system_router;
    }
}

/// The feature slices, by name.
pub mod features {
    pub use club_audit as audit;
    pub use club_matches as matches;
    pub use club_members as members;
    pub use club_profiles as profiles;
    pub use club_teams as teams;
    pub use club_tournaments as tournaments;

    pub const ENABLED: &[&str] = &["members", "teams", "tournaments", "profiles", "matches", "audit"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[club_derive::club_error]
pub enum ClubError {
    #[error("Members slice failed{}: {source}", format_context(.context))]
    Members { source: features::members::MemberError, context: Option<Cow<'static, str>> },

    #[error("Audit slice failed{}: {source}", format_context(.context))]
    Audit { source: features::audit::AuditError, context: Option<Cow<'static, str>> },

    #[error("Club error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Every migration, referenced tables first.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    [
        features::teams::MIGRATIONS,
        features::members::MIGRATIONS,
        features::tournaments::MIGRATIONS,
        features::profiles::MIGRATIONS,
        features::matches::MIGRATIONS,
    ]
    .concat()
}

/// Initializes every slice.
///
/// # Errors
/// Returns the first slice that fails to start.
pub fn init(config: &ApiConfig, database: &Database, events: &EventBus) -> Result<Vec<InitializedSlice>, ClubError> {
    let slices = vec![
        features::members::init(database, events)?,
        features::teams::init(database, events),
        features::tournaments::init(database, events),
        features::profiles::init(database, events),
        features::matches::init(database, events),
        features::audit::init(&config.audit, events)?,
    ];

    info!(slices = slices.len(), "Club slices initialized");
    Ok(slices)
}

/// Routes of every slice plus the system routes.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .merge(server::router::system_router())
        .merge(features::members::router())
        .merge(features::teams::router())
        .merge(features::tournaments::router())
        .merge(features::profiles::router())
        .merge(features::matches::router())
        .merge(features::audit::router())
}
