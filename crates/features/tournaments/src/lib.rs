//! Tournaments feature slice.
//!
//! Entries live on the member side (`member.tournaments`); the tournament
//! views list them as `entrants`.

mod api;
mod error;
mod model;
mod repository;

pub use error::{TournamentError, TournamentErrorExt};
pub use model::{Entry, NewTournament, Tournament, TournamentPatch, TournamentView};
pub use repository::TournamentRepository;

use axum::routing::{delete, put};
use club_kernel::prelude::{ApiState, Database, EventBus, InitializedSlice, Migration};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new("tournaments", "0001", include_str!("../migrations/0001_tournament.surql"))];

#[club_derive::club_slice]
pub struct Tournaments {
    repository: TournamentRepository,
}

#[must_use]
pub fn init(db: &Database, events: &EventBus) -> InitializedSlice {
    let inner = TournamentsInner { repository: TournamentRepository::new(db.clone(), events.clone()) };

    info!("Tournaments slice initialized");
    InitializedSlice::new(Tournaments::new(inner))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(api::list_tournaments))
        .routes(routes!(api::create_tournament))
        .routes(routes!(api::tournament_detail))
        .routes(routes!(api::update_tournament))
        .route(
            "/tournaments/api/tournaments/{id}/update/",
            put(api::update_tournament).patch(api::update_tournament),
        )
        .routes(routes!(api::delete_tournament))
        .route("/tournaments/api/tournaments/{id}/delete/", delete(api::delete_tournament))
        .routes(routes!(api::register_entrant))
        .routes(routes!(api::withdraw_entrant))
}
