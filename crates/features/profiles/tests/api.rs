use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use club_kernel::prelude::{ApiConfig, ApiState, Database, EventBus};
use club_members::{MemberRepository, NewMember};
use serde_json::{Value, json};
use tower::ServiceExt;

struct Club {
    app: Router,
    members: MemberRepository,
}

async fn club() -> Club {
    let db = Database::builder().url("mem://").session("club_test", "profiles").init().await.unwrap();
    db.migrate(club_members::MIGRATIONS).await.unwrap();
    db.migrate(club_profiles::MIGRATIONS).await.unwrap();
    let events = EventBus::new();
    let state = ApiState::builder()
        .config(ApiConfig::default())
        .db(db.clone())
        .events(events.clone())
        .register_slice(club_profiles::init(&db, &events))
        .build()
        .unwrap();

    let (app, _) = club_profiles::router().with_state(state).split_for_parts();
    Club { app, members: MemberRepository::new(db, events) }
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request.header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn member(club: &Club, first: &str, last: &str) -> i64 {
    club.members
        .create(NewMember {
            firstname: first.to_owned(),
            lastname: last.to_owned(),
            email: format!("{}@tennis.com", first.to_lowercase()),
            ..NewMember::default()
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn create_applies_defaults() {
    let club = club().await;
    let naomi = member(&club, "Naomi", "Osaka").await;

    let (status, body) =
        call(&club.app, Method::POST, "/profiles/api/profiles/create/", Some(json!({"member": naomi}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"success": true, "profile": {"id": 1, "member": naomi, "bio": "", "skill_level": "beginner", "favorite_surface": null}})
    );
}

#[tokio::test]
async fn a_member_has_at_most_one_profile() {
    let club = club().await;
    let naomi = member(&club, "Naomi", "Osaka").await;
    let simona = member(&club, "Simona", "Halep").await;
    let create = "/profiles/api/profiles/create/";

    call(&club.app, Method::POST, create, Some(json!({"member": naomi, "skill_level": "professional"}))).await;
    let (status, body) = call(&club.app, Method::POST, create, Some(json!({"member": naomi}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "This member already has a profile."}));

    call(&club.app, Method::POST, create, Some(json!({"member": simona}))).await;
    let (status, body) =
        call(&club.app, Method::PATCH, "/profiles/api/profiles/2/update/", Some(json!({"member": naomi}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "This member already has a profile.");

    let (status, _) =
        call(&club.app, Method::PATCH, "/profiles/api/profiles/1/update/", Some(json!({"bio": "Four majors"}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_members_and_levels_are_rejected() {
    let club = club().await;

    let (status, body) =
        call(&club.app, Method::POST, "/profiles/api/profiles/create/", Some(json!({"member": 12}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Member 12 does not exist.");

    let naomi = member(&club, "Naomi", "Osaka").await;
    let (status, body) = call(
        &club.app,
        Method::POST,
        "/profiles/api/profiles/create/",
        Some(json!({"member": naomi, "favorite_surface": "carpet"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("carpet"), "{body}");
}

#[tokio::test]
async fn update_and_clear_the_surface() {
    let club = club().await;
    let rafa = member(&club, "Rafael", "Nadal").await;
    call(
        &club.app,
        Method::POST,
        "/profiles/api/profiles/create/",
        Some(json!({"member": rafa, "favorite_surface": "clay", "skill_level": "professional"})),
    )
    .await;

    let (status, body) =
        call(&club.app, Method::PUT, "/profiles/api/profiles/1/update/", Some(json!({"favorite_surface": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["favorite_surface"], Value::Null);
    assert_eq!(body["profile"]["skill_level"], "professional");

    let (_, body) = call(&club.app, Method::GET, "/profiles/api/profiles/", None).await;
    assert_eq!(body["profiles"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_names_the_profile_and_keeps_the_member() {
    let club = club().await;
    let andy = member(&club, "Andy", "Murray").await;
    call(&club.app, Method::POST, "/profiles/api/profiles/create/", Some(json!({"member": andy}))).await;

    let (status, body) = call(&club.app, Method::POST, "/profiles/api/profiles/1/delete/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "deleted": {"id": 1, "name": "Andy Murray profile"}}));
    assert!(club.members.find(andy).await.unwrap().is_some());

    let (status, body) = call(&club.app, Method::GET, "/profiles/api/profiles/1/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Profile not found"}));
}

#[tokio::test]
async fn deleting_the_member_deletes_the_profile() {
    let club = club().await;
    let maria = member(&club, "Maria", "Sharapova").await;
    call(&club.app, Method::POST, "/profiles/api/profiles/create/", Some(json!({"member": maria}))).await;

    club.members.delete(maria).await.unwrap();

    assert_eq!(call(&club.app, Method::GET, "/profiles/api/profiles/1/", None).await.0, StatusCode::NOT_FOUND);
}
