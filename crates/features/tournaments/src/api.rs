use crate::Tournaments;
use crate::model::{
    Entry, NewTournament, Tournament, TournamentDetail, TournamentList, TournamentPatch, TournamentSaved,
};
use crate::repository::TournamentRepository;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use club_derive::api_handler;
use club_kernel::domain::constants::TOURNAMENTS_TAG;
use club_kernel::prelude::{ApiError, ApiState, DeleteResponse, Entity, ErrorResponse, parse_id, parse_json};

fn repository(state: &ApiState) -> Result<&TournamentRepository, ApiError> {
    Ok(&state.try_get_slice::<Tournaments>()?.repository)
}

fn tournament_id(raw: &str) -> Result<i64, ApiError> {
    parse_id(raw).ok_or_else(|| ApiError::not_found(Entity::Tournament))
}

async fn saved(repository: &TournamentRepository, tournament: Tournament) -> Result<Json<TournamentSaved>, ApiError> {
    Ok(Json(TournamentSaved { success: true, tournament: repository.view(tournament).await? }))
}

#[api_handler(
    get,
    path = "/tournaments/api/tournaments/",
    responses((status = OK, description = "Every tournament", body = TournamentList)),
    tag = TOURNAMENTS_TAG,
)]
pub async fn list_tournaments(State(state): State<ApiState>) -> Result<Json<TournamentList>, ApiError> {
    let repository = repository(&state)?;
    let mut tournaments = Vec::new();
    for tournament in repository.list().await? {
        tournaments.push(repository.view(tournament).await?);
    }
    Ok(Json(TournamentList { tournaments }))
}

#[api_handler(
    post,
    path = "/tournaments/api/tournaments/create/",
    request_body = NewTournament,
    responses(
        (status = CREATED, description = "Tournament created", body = TournamentSaved),
        (status = BAD_REQUEST, description = "Malformed body or rule violation", body = ErrorResponse),
    ),
    tag = TOURNAMENTS_TAG,
)]
pub async fn create_tournament(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<TournamentSaved>), ApiError> {
    let draft: NewTournament = parse_json(&body)?;
    let repository = repository(&state)?;
    let tournament = repository.create(draft).await?;
    Ok((StatusCode::CREATED, saved(repository, tournament).await?))
}

#[api_handler(
    get,
    path = "/tournaments/api/tournaments/{id}/",
    params(("id" = i64, Path, description = "Tournament id")),
    responses(
        (status = OK, description = "The tournament", body = TournamentDetail),
        (status = NOT_FOUND, description = "No such tournament", body = ErrorResponse),
    ),
    tag = TOURNAMENTS_TAG,
)]
pub async fn tournament_detail(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<TournamentDetail>, ApiError> {
    let repository = repository(&state)?;
    let tournament = repository.get(tournament_id(&id)?).await?;
    Ok(Json(TournamentDetail { tournament: repository.view(tournament).await? }))
}

/// Also served for `PUT` and `PATCH`.
#[api_handler(
    post,
    path = "/tournaments/api/tournaments/{id}/update/",
    params(("id" = i64, Path, description = "Tournament id")),
    request_body = TournamentPatch,
    responses(
        (status = OK, description = "Tournament updated", body = TournamentSaved),
        (status = BAD_REQUEST, description = "Malformed body or rule violation", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such tournament", body = ErrorResponse),
    ),
    tag = TOURNAMENTS_TAG,
)]
pub async fn update_tournament(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<TournamentSaved>, ApiError> {
    let repository = repository(&state)?;
    let current = repository.get(tournament_id(&id)?).await?;
    let patch: TournamentPatch = parse_json(&body)?;

    let tournament = repository.update(current.id, patch.apply(&current)).await?;
    saved(repository, tournament).await
}

/// Also served for `DELETE`.
#[api_handler(
    post,
    path = "/tournaments/api/tournaments/{id}/delete/",
    params(("id" = i64, Path, description = "Tournament id")),
    responses(
        (status = OK, description = "Tournament deleted and withdrawn from member entries", body = DeleteResponse),
        (status = NOT_FOUND, description = "No such tournament", body = ErrorResponse),
    ),
    tag = TOURNAMENTS_TAG,
)]
pub async fn delete_tournament(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let tournament = repository(&state)?.delete(tournament_id(&id)?).await?;
    Ok(Json(DeleteResponse::new(tournament.id, tournament.name)))
}

#[api_handler(
    post,
    path = "/tournaments/api/tournaments/{id}/register/",
    params(("id" = i64, Path, description = "Tournament id")),
    request_body = Entry,
    responses(
        (status = OK, description = "Member entered", body = TournamentSaved),
        (status = BAD_REQUEST, description = "Malformed body or unknown member", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such tournament", body = ErrorResponse),
    ),
    tag = TOURNAMENTS_TAG,
)]
pub async fn register_entrant(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<TournamentSaved>, ApiError> {
    let repository = repository(&state)?;
    let current = repository.get(tournament_id(&id)?).await?;
    let entry: Entry = parse_json(&body)?;

    let tournament = repository.register(current.id, entry.member).await?;
    saved(repository, tournament).await
}

#[api_handler(
    post,
    path = "/tournaments/api/tournaments/{id}/withdraw/",
    params(("id" = i64, Path, description = "Tournament id")),
    request_body = Entry,
    responses(
        (status = OK, description = "Member withdrawn", body = TournamentSaved),
        (status = BAD_REQUEST, description = "Malformed body or unknown member", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such tournament", body = ErrorResponse),
    ),
    tag = TOURNAMENTS_TAG,
)]
pub async fn withdraw_entrant(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<TournamentSaved>, ApiError> {
    let repository = repository(&state)?;
    let current = repository.get(tournament_id(&id)?).await?;
    let entry: Entry = parse_json(&body)?;

    let tournament = repository.withdraw(current.id, entry.member).await?;
    saved(repository, tournament).await
}
