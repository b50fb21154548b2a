//! Matches feature slice: singles matches between two members.

mod api;
mod error;
mod model;
mod repository;

pub use error::{MatchError, MatchErrorExt};
pub use model::{Match, MatchPatch, MatchView, NewMatch};
pub use repository::MatchRepository;

use axum::routing::{delete, put};
use club_kernel::prelude::{ApiState, Database, EventBus, InitializedSlice, Migration};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new("matches", "0001", include_str!("../migrations/0001_match.surql"))];

#[club_derive::club_slice]
pub struct Matches {
    repository: MatchRepository,
}

#[must_use]
pub fn init(db: &Database, events: &EventBus) -> InitializedSlice {
    let inner = MatchesInner { repository: MatchRepository::new(db.clone(), events.clone()) };

    info!("Matches slice initialized");
    InitializedSlice::new(Matches::new(inner))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(api::list_matches))
        .routes(routes!(api::create_match))
        .routes(routes!(api::match_detail))
        .routes(routes!(api::update_match))
        .route("/matches/api/matches/{id}/update/", put(api::update_match).patch(api::update_match))
        .routes(routes!(api::delete_match))
        .route("/matches/api/matches/{id}/delete/", delete(api::delete_match))
}
