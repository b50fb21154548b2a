//! Members feature slice.
//!
//! Serves the member HTML pages under `/members/` and the JSON API under
//! `/members/api/members/`, and owns the demo data used by the seeding tool.

mod api;
mod error;
mod model;
mod repository;
pub mod seed;
mod views;

pub use error::{MemberError, MemberErrorExt};
pub use model::{Member, MemberForm, MemberPatch, MemberSummary, MemberView, NewMember};
pub use repository::MemberRepository;
pub use views::Pages;

use axum::routing::{delete, get, put};
use club_kernel::prelude::{ApiState, Database, EventBus, InitializedSlice, Migration};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const MIGRATIONS: &[Migration] =
    &[Migration::new("members", "0001", include_str!("../migrations/0001_member.surql"))];

#[club_derive::club_slice]
pub struct Members {
    repository: MemberRepository,
    pages: Pages,
}

impl Members {
    #[must_use]
    pub fn repository(&self) -> &MemberRepository {
        &self.repository
    }
}

/// Initializes the members slice.
///
/// # Errors
/// [`MemberError::Template`] when the page templates do not parse.
pub fn init(db: &Database, events: &EventBus) -> Result<InitializedSlice, MemberError> {
    let inner = MembersInner {
        repository: MemberRepository::new(db.clone(), events.clone()),
        pages: Pages::load()?,
    };

    info!("Members slice initialized");
    Ok(InitializedSlice::new(Members::new(inner)))
}

/// HTML pages and JSON endpoints of the slice.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .route("/members/", get(views::list_page))
        .route("/members/new/", get(views::new_page).post(views::create_page))
        .route("/members/{id}/", get(views::detail_page))
        .route("/members/{id}/edit/", get(views::edit_page).post(views::update_page))
        .route("/members/{id}/delete/", get(views::delete_page).post(views::destroy_page))
        .routes(routes!(api::list_members))
        .routes(routes!(api::create_member))
        .routes(routes!(api::member_detail))
        .routes(routes!(api::update_member))
        .route("/members/api/members/{id}/update/", put(api::update_member).patch(api::update_member))
        .routes(routes!(api::delete_member))
        .route("/members/api/members/{id}/delete/", delete(api::delete_member))
}
