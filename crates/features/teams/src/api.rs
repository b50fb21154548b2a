use crate::Teams;
use crate::model::{NewTeam, TeamDetail, TeamList, TeamPatch, TeamSaved};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use club_derive::api_handler;
use club_kernel::domain::constants::TEAMS_TAG;
use club_kernel::prelude::{ApiError, ApiState, DeleteResponse, Entity, ErrorResponse, parse_id, parse_json};

fn teams(state: &ApiState) -> Result<&Teams, ApiError> {
    Ok(state.try_get_slice::<Teams>()?)
}

fn team_id(raw: &str) -> Result<i64, ApiError> {
    parse_id(raw).ok_or_else(|| ApiError::not_found(Entity::Team))
}

#[api_handler(
    get,
    path = "/teams/api/teams/",
    responses((status = OK, description = "Every team", body = TeamList)),
    tag = TEAMS_TAG,
)]
pub async fn list_teams(State(state): State<ApiState>) -> Result<Json<TeamList>, ApiError> {
    let repository = &teams(&state)?.repository;
    let mut views = Vec::new();
    for team in repository.list().await? {
        views.push(repository.view(team).await?);
    }
    Ok(Json(TeamList { teams: views }))
}

#[api_handler(
    post,
    path = "/teams/api/teams/create/",
    request_body = NewTeam,
    responses(
        (status = CREATED, description = "Team created", body = TeamSaved),
        (status = BAD_REQUEST, description = "Malformed body or rule violation", body = ErrorResponse),
    ),
    tag = TEAMS_TAG,
)]
pub async fn create_team(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<TeamSaved>), ApiError> {
    let draft: NewTeam = parse_json(&body)?;
    let repository = &teams(&state)?.repository;
    let team = repository.view(repository.create(draft).await?).await?;
    Ok((StatusCode::CREATED, Json(TeamSaved { success: true, team })))
}

#[api_handler(
    get,
    path = "/teams/api/teams/{id}/",
    params(("id" = i64, Path, description = "Team id")),
    responses(
        (status = OK, description = "The team", body = TeamDetail),
        (status = NOT_FOUND, description = "No such team", body = ErrorResponse),
    ),
    tag = TEAMS_TAG,
)]
pub async fn team_detail(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<TeamDetail>, ApiError> {
    let repository = &teams(&state)?.repository;
    let team = repository.view(repository.get(team_id(&id)?).await?).await?;
    Ok(Json(TeamDetail { team }))
}

/// Also served for `PUT` and `PATCH`.
#[api_handler(
    post,
    path = "/teams/api/teams/{id}/update/",
    params(("id" = i64, Path, description = "Team id")),
    request_body = TeamPatch,
    responses(
        (status = OK, description = "Team updated", body = TeamSaved),
        (status = BAD_REQUEST, description = "Malformed body or rule violation", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such team", body = ErrorResponse),
    ),
    tag = TEAMS_TAG,
)]
pub async fn update_team(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<TeamSaved>, ApiError> {
    let repository = &teams(&state)?.repository;
    let current = repository.get(team_id(&id)?).await?;
    let patch: TeamPatch = parse_json(&body)?;

    let team = repository.update(current.id, patch.apply(&current)).await?;
    Ok(Json(TeamSaved { success: true, team: repository.view(team).await? }))
}

/// Also served for `DELETE`.
#[api_handler(
    post,
    path = "/teams/api/teams/{id}/delete/",
    params(("id" = i64, Path, description = "Team id")),
    responses(
        (status = OK, description = "Team deleted with its members", body = DeleteResponse),
        (status = NOT_FOUND, description = "No such team", body = ErrorResponse),
    ),
    tag = TEAMS_TAG,
)]
pub async fn delete_team(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let (team, _) = teams(&state)?.repository.delete(team_id(&id)?).await?;
    Ok(Json(DeleteResponse::new(team.id, team.name)))
}
