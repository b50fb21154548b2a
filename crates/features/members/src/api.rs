use crate::Members;
use crate::model::{MemberDetail, MemberList, MemberPatch, MemberSaved, MemberView, NewMember};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use club_derive::api_handler;
use club_kernel::domain::constants::MEMBERS_TAG;
use club_kernel::prelude::{ApiError, ApiState, DeleteResponse, Entity, ErrorResponse, parse_id, parse_json};

fn members(state: &ApiState) -> Result<&Members, ApiError> {
    Ok(state.try_get_slice::<Members>()?)
}

fn member_id(raw: &str) -> Result<i64, ApiError> {
    parse_id(raw).ok_or_else(|| ApiError::not_found(Entity::Member))
}

#[api_handler(
    get,
    path = "/members/api/members/",
    responses((status = OK, description = "Every member", body = MemberList)),
    tag = MEMBERS_TAG,
)]
pub async fn list_members(State(state): State<ApiState>) -> Result<Json<MemberList>, ApiError> {
    let members = members(&state)?.repository.list().await?;
    Ok(Json(MemberList { members: members.into_iter().map(MemberView::from).collect() }))
}

#[api_handler(
    post,
    path = "/members/api/members/create/",
    request_body = NewMember,
    responses(
        (status = CREATED, description = "Member created", body = MemberSaved),
        (status = BAD_REQUEST, description = "Malformed body or rule violation", body = ErrorResponse),
    ),
    tag = MEMBERS_TAG,
)]
pub async fn create_member(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MemberSaved>), ApiError> {
    let draft: NewMember = parse_json(&body)?;
    let member = members(&state)?.repository.create(draft).await?;
    Ok((StatusCode::CREATED, Json(MemberSaved::new(member))))
}

#[api_handler(
    get,
    path = "/members/api/members/{id}/",
    params(("id" = i64, Path, description = "Member id")),
    responses(
        (status = OK, description = "The member", body = MemberDetail),
        (status = NOT_FOUND, description = "No such member", body = ErrorResponse),
    ),
    tag = MEMBERS_TAG,
)]
pub async fn member_detail(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<MemberDetail>, ApiError> {
    let member = members(&state)?.repository.get(member_id(&id)?).await?;
    Ok(Json(MemberDetail { member: member.into() }))
}

/// Also served for `PUT` and `PATCH`.
#[api_handler(
    post,
    path = "/members/api/members/{id}/update/",
    params(("id" = i64, Path, description = "Member id")),
    request_body = MemberPatch,
    responses(
        (status = OK, description = "Member updated", body = MemberSaved),
        (status = BAD_REQUEST, description = "Malformed body or rule violation", body = ErrorResponse),
        (status = NOT_FOUND, description = "No such member", body = ErrorResponse),
    ),
    tag = MEMBERS_TAG,
)]
pub async fn update_member(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MemberSaved>, ApiError> {
    let repository = &members(&state)?.repository;
    let current = repository.get(member_id(&id)?).await?;
    let patch: MemberPatch = parse_json(&body)?;

    let member = repository.update(current.id, patch.apply(&current)).await?;
    Ok(Json(MemberSaved::new(member)))
}

/// Also served for `DELETE`.
#[api_handler(
    post,
    path = "/members/api/members/{id}/delete/",
    params(("id" = i64, Path, description = "Member id")),
    responses(
        (status = OK, description = "Member deleted with its profile and matches", body = DeleteResponse),
        (status = NOT_FOUND, description = "No such member", body = ErrorResponse),
    ),
    tag = MEMBERS_TAG,
)]
pub async fn delete_member(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let member = members(&state)?.repository.delete(member_id(&id)?).await?;
    Ok(Json(DeleteResponse::new(member.id, member.display_name())))
}
