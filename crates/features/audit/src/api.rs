use crate::Audit;
use crate::trail::Activity;
use axum::Json;
use axum::extract::State;
use club_derive::{api_handler, api_model};
use club_kernel::domain::constants::ACTIVITY_TAG;
use club_kernel::prelude::{ApiError, ApiState};

#[api_model]
pub struct ActivityList {
    pub activity: Vec<Activity>,
}

#[api_handler(
    get,
    path = "/api/activity/",
    responses((status = OK, description = "Latest record changes, newest first", body = ActivityList)),
    tag = ACTIVITY_TAG,
)]
pub async fn list_activity(State(state): State<ApiState>) -> Result<Json<ActivityList>, ApiError> {
    let audit = state.try_get_slice::<Audit>()?;
    Ok(Json(ActivityList { activity: audit.trail.recent() }))
}
