use crate::Profiles;
use crate::model::{NewProfile, ProfileDetail, ProfileList, ProfilePatch, ProfileSaved, ProfileView};
use crate::repository::ProfileRepository;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use club_derive::api_handler;
use club_kernel::domain::constants::PROFILES_TAG;
use club_kernel::prelude::{ApiError, ApiState, DeleteResponse, Entity, ErrorResponse, parse_id, parse_json};

fn repository(state: &ApiState) -> Result<&ProfileRepository, ApiError> {
    Ok(&state.try_get_slice::<Profiles>()?.repository)
}

fn profile_id(raw: &str) -> Result<i64, ApiError> {
    parse_id(raw).ok_or_else(|| ApiError::not_found(Entity::Profile))
}

#[api_handler(
    get,
    path = "/profiles/api/profiles/",
    responses((status = OK, description = "Every profile", body = ProfileList)),
    tag = PROFILES_TAG,
)]
pub async fn list_profiles(State(state): State<ApiState>) -> Result<Json<ProfileList>, ApiError> {
    let profiles = repository(&state)?.list().await?;
    Ok(Json(ProfileList { profiles: profiles.into_iter().map(ProfileView::from).collect() }))
}

#[api_handler(
    post,
    path = "/profiles/api/profiles/create/",
    request_body = NewProfile,
    responses(
        (status = CREATED, description = "Profile created", body = ProfileSaved),
        (status = BAD_REQUEST, description = "Malformed body, unknown member or member already has a profile", body = ErrorResponse),
    ),
    tag = PROFILES_TAG,
)]
pub async fn create_profile(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProfileSaved>), ApiError> {
    let draft: NewProfile = parse_json(&body)?;
    let profile = repository(&state)?.create(draft).await?;
    Ok((StatusCode::CREATED, Json(ProfileSaved::new(profile))))
}

#[api_handler(
    get,
    path = "/profiles/api/profiles/{id}/",
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = OK, description = "The profile", body = ProfileDetail),
        (status = NOT_FOUND, description = "No such profile", body = ErrorResponse),
    ),
    tag = PROFILES_TAG,
)]
pub async fn profile_detail(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileDetail>, ApiError> {
    let profile = repository(&state)?.get(profile_id(&id)?).await?;
    Ok(Json(ProfileDetail { profile: profile.into() }))
}

/// Also served for `PUT` and `PATCH`.
#[api_handler(
    post,
    path = "/profiles/api/profiles/{id}/update/",
    params(("id" = i64, Path, description = "Profile id")),
    request_body = ProfilePatch,
    responses(
        (status = OK, description = "Profile updated", body = ProfileSaved),
        (status = BAD_REQUEST, description = "Malformed body or rule violation", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such profile", body = ErrorResponse),
    ),
    tag = PROFILES_TAG,
)]
pub async fn update_profile(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ProfileSaved>, ApiError> {
    let repository = repository(&state)?;
    let current = repository.get(profile_id(&id)?).await?;
    let patch: ProfilePatch = parse_json(&body)?;

    let profile = repository.update(current.id, patch.apply(&current)).await?;
    Ok(Json(ProfileSaved::new(profile)))
}

/// Also served for `DELETE`.
#[api_handler(
    post,
    path = "/profiles/api/profiles/{id}/delete/",
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = OK, description = "Profile deleted", body = DeleteResponse),
        (status = NOT_FOUND, description = "No such profile", body = ErrorResponse),
    ),
    tag = PROFILES_TAG,
)]
pub async fn delete_profile(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let (profile, label) = repository(&state)?.delete(profile_id(&id)?).await?;
    Ok(Json(DeleteResponse::new(profile.id, label)))
}
