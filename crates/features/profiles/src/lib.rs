//! Profiles feature slice.

mod api;
mod error;
mod model;
mod repository;

pub use error::{ProfileError, ProfileErrorExt};
pub use model::{NewProfile, Profile, ProfilePatch, ProfileView, SkillLevel, Surface};
pub use repository::ProfileRepository;

use axum::routing::{delete, put};
use club_kernel::prelude::{ApiState, Database, EventBus, InitializedSlice, Migration};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new("profiles", "0001", include_str!("../migrations/0001_profile.surql"))];

#[club_derive::club_slice]
pub struct Profiles {
    repository: ProfileRepository,
}

#[must_use]
pub fn init(db: &Database, events: &EventBus) -> InitializedSlice {
    let inner = ProfilesInner { repository: ProfileRepository::new(db.clone(), events.clone()) };

    info!("Profiles slice initialized");
    InitializedSlice::new(Profiles::new(inner))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(api::list_profiles))
        .routes(routes!(api::create_profile))
        .routes(routes!(api::profile_detail))
        .routes(routes!(api::update_profile))
        .route("/profiles/api/profiles/{id}/update/", put(api::update_profile).patch(api::update_profile))
        .routes(routes!(api::delete_profile))
        .route("/profiles/api/profiles/{id}/delete/", delete(api::delete_profile))
}
