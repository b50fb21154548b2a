use crate::Matches;
use crate::model::{NewMatch, MatchDetail, MatchList, MatchPatch, MatchSaved, MatchView};
use crate::repository::MatchRepository;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use club_derive::api_handler;
use club_kernel::domain::constants::MATCHES_TAG;
use club_kernel::prelude::{ApiError, ApiState, DeleteResponse, Entity, ErrorResponse, parse_id, parse_json};

fn repository(state: &ApiState) -> Result<&MatchRepository, ApiError> {
    Ok(&state.try_get_slice::<Matches>()?.repository)
}

fn match_id(raw: &str) -> Result<i64, ApiError> {
    parse_id(raw).ok_or_else(|| ApiError::not_found(Entity::Match))
}

#[api_handler(
    get,
    path = "/matches/api/matches/",
    responses((status = OK, description = "Every match", body = MatchList)),
    tag = MATCHES_TAG,
)]
pub async fn list_matches(State(state): State<ApiState>) -> Result<Json<MatchList>, ApiError> {
    let matches = repository(&state)?.list().await?;
    Ok(Json(MatchList { matches: matches.into_iter().map(MatchView::from).collect() }))
}

#[api_handler(
    post,
    path = "/matches/api/matches/create/",
    request_body = NewMatch,
    responses(
        (status = CREATED, description = "Match created", body = MatchSaved),
        (status = BAD_REQUEST, description = "Malformed body, unknown member or rule violation", body = ErrorResponse),
    ),
    tag = MATCHES_TAG,
)]
pub async fn create_match(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MatchSaved>), ApiError> {
    let draft: NewMatch = parse_json(&body)?;
    let tennis_match = repository(&state)?.create(draft).await?;
    Ok((StatusCode::CREATED, Json(MatchSaved::new(tennis_match))))
}

#[api_handler(
    get,
    path = "/matches/api/matches/{id}/",
    params(("id" = i64, Path, description = "Match id")),
    responses(
        (status = OK, description = "The match", body = MatchDetail),
        (status = NOT_FOUND, description = "No such match", body = ErrorResponse),
    ),
    tag = MATCHES_TAG,
)]
pub async fn match_detail(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<MatchDetail>, ApiError> {
    let tennis_match = repository(&state)?.get(match_id(&id)?).await?;
    Ok(Json(MatchDetail { tennis_match: tennis_match.into() }))
}

/// Also served for `PUT` and `PATCH`.
#[api_handler(
    post,
    path = "/matches/api/matches/{id}/update/",
    params(("id" = i64, Path, description = "Match id")),
    request_body = MatchPatch,
    responses(
        (status = OK, description = "Match updated", body = MatchSaved),
        (status = BAD_REQUEST, description = "Malformed body or rule violation", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such match", body = ErrorResponse),
    ),
    tag = MATCHES_TAG,
)]
pub async fn update_match(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MatchSaved>, ApiError> {
    let repository = repository(&state)?;
    let current = repository.get(match_id(&id)?).await?;
    let patch: MatchPatch = parse_json(&body)?;

    let tennis_match = repository.update(current.id, patch.apply(&current)).await?;
    Ok(Json(MatchSaved::new(tennis_match)))
}

/// Also served for `DELETE`.
#[api_handler(
    post,
    path = "/matches/api/matches/{id}/delete/",
    params(("id" = i64, Path, description = "Match id")),
    responses(
        (status = OK, description = "Match deleted", body = DeleteResponse),
        (status = NOT_FOUND, description = "No such match", body = ErrorResponse),
    ),
    tag = MATCHES_TAG,
)]
pub async fn delete_match(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let (tennis_match, label) = repository(&state)?.delete(match_id(&id)?).await?;
    Ok(Json(DeleteResponse::new(tennis_match.id, label)))
}
