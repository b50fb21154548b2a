//! Teams feature slice.
//!
//! Deleting a team deletes its members, with their profiles and matches.

mod api;
mod error;
mod model;
mod repository;

pub use error::{TeamError, TeamErrorExt};
pub use model::{NewTeam, Team, TeamPatch, TeamView};
pub use repository::TeamRepository;

use axum::routing::{delete, put};
use club_kernel::prelude::{ApiState, Database, EventBus, InitializedSlice, Migration};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new("teams", "0001", include_str!("../migrations/0001_team.surql"))];

#[club_derive::club_slice]
pub struct Teams {
    repository: TeamRepository,
}

impl Teams {
    #[must_use]
    pub fn repository(&self) -> &TeamRepository {
        &self.repository
    }
}

#[must_use]
pub fn init(db: &Database, events: &EventBus) -> InitializedSlice {
    let inner = TeamsInner { repository: TeamRepository::new(db.clone(), events.clone()) };

    info!("Teams slice initialized");
    InitializedSlice::new(Teams::new(inner))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(api::list_teams))
        .routes(routes!(api::create_team))
        .routes(routes!(api::team_detail))
        .routes(routes!(api::update_team))
        .route("/teams/api/teams/{id}/update/", put(api::update_team).patch(api::update_team))
        .routes(routes!(api::delete_team))
        .route("/teams/api/teams/{id}/delete/", delete(api::delete_team))
}
