use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use club::domain::config::ApiConfig;
use club_server::Server;
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

async fn app(seed: bool) -> Router {
    let mut cfg = ApiConfig::default();
    cfg.database.seed = seed;
    Server::builder().config(cfg).build().await.unwrap().app()
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request.header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec())
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn create(app: &Router, uri: &str, body: Value) -> i64 {
    let (status, body) = call(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body.as_object().unwrap().values().find_map(|v| v["id"].as_i64()).unwrap()
}

#[tokio::test]
async fn health_and_api_explorer() {
    let app = app(false).await;

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let (status, _) = send(&app, Method::GET, "/api", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn root_redirects_to_the_member_list() {
    let app = app(false).await;

    let response = app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/members/");
}

#[tokio::test]
async fn seeding_fills_an_empty_club() {
    let app = app(true).await;

    let (_, body) = call(&app, Method::GET, "/members/api/members/", None).await;
    let members = body["members"].as_array().unwrap();
    assert_eq!(members.len(), 8);
    assert_eq!(members[0]["lastname"], "Djokovic");

    let (status, page) = send(&app, Method::GET, "/members/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(page).unwrap().contains("Serena"));
}

#[tokio::test]
async fn deleting_a_team_removes_its_members_and_their_records() {
    let app = app(false).await;
    let team = create(&app, "/teams/api/teams/create/", json!({"name": "Aces"})).await;
    let roger = create(
        &app,
        "/members/api/members/create/",
        json!({"firstname": "Roger", "lastname": "Federer", "email": "roger@tennis.com", "team": team}),
    )
    .await;
    let rafa = create(
        &app,
        "/members/api/members/create/",
        json!({"firstname": "Rafael", "lastname": "Nadal", "email": "rafa@tennis.com"}),
    )
    .await;
    create(&app, "/profiles/api/profiles/create/", json!({"member": roger})).await;
    create(
        &app,
        "/matches/api/matches/create/",
        json!({"date": "2024-06-01", "location": "Court 1", "player1": roger, "player2": rafa, "winner": rafa}),
    )
    .await;

    let (status, body) = call(&app, Method::DELETE, &format!("/teams/api/teams/{team}/delete/"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"]["name"], "Aces");

    let (status, _) = call(&app, Method::GET, &format!("/members/api/members/{roger}/"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(call(&app, Method::GET, "/profiles/api/profiles/", None).await.1, json!({"profiles": []}));
    assert_eq!(call(&app, Method::GET, "/matches/api/matches/", None).await.1, json!({"matches": []}));

    let (status, _) = call(&app, Method::GET, &format!("/members/api/members/{rafa}/"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn writes_show_up_in_the_activity_trail() {
    let app = app(false).await;
    create(&app, "/tournaments/api/tournaments/create/", json!({
        "name": "Club Open", "location": "Main courts", "start_date": "2024-07-01", "end_date": "2024-07-07",
    }))
    .await;

    let mut activity = Value::Null;
    for _ in 0..100 {
        activity = call(&app, Method::GET, "/api/activity/", None).await.1;
        if !activity["activity"].as_array().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(activity["activity"][0]["message"], "Tournament Club Open created successfully!");
}
