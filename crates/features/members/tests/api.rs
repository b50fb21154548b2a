use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use club_kernel::prelude::{ApiConfig, ApiState, Database, EventBus};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::builder().url("mem://").session("club_test", "members").init().await.unwrap();
    db.migrate(club_members::MIGRATIONS).await.unwrap();
    let events = EventBus::new();
    let state = ApiState::builder()
        .config(ApiConfig::default())
        .db(db.clone())
        .events(events.clone())
        .register_slice(club_members::init(&db, &events).unwrap())
        .build()
        .unwrap();

    let (router, _) = club_members::router().with_state(state).split_for_parts();
    router
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

async fn create(app: &Router, first: &str, last: &str) -> i64 {
    let email = format!("{}.{}@tennis.com", first.to_lowercase(), last.to_lowercase());
    let (status, body) = call(
        app,
        Method::POST,
        "/members/api/members/create/",
        Some(json!({"firstname": first, "lastname": last, "email": email})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["member"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn create_returns_201_with_the_summary() {
    let app = app().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/members/api/members/create/",
        Some(json!({"firstname": "Serena", "lastname": "Williams", "email": "serena.williams@tennis.com", "phone": "555-0101"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"success": true, "member": {"id": 1, "firstname": "Serena", "lastname": "Williams", "email": "serena.williams@tennis.com"}})
    );
}

#[tokio::test]
async fn list_and_detail_expose_exactly_the_view_fields() {
    let app = app().await;
    let id = create(&app, "Roger", "Federer").await;

    let (status, body) = call(&app, Method::GET, "/members/api/members/", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["members"][0].as_object().unwrap();
    let mut keys: Vec<_> = listed.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["email", "firstname", "id", "joined_date", "lastname", "phone"]);
    assert_eq!(listed["phone"], "");

    let (status, body) = call(&app, Method::GET, &format!("/members/api/members/{id}/"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["member"]["firstname"], "Roger");
    assert_eq!(body["member"].as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn duplicate_email_is_a_bad_request() {
    let app = app().await;
    create(&app, "Rafael", "Nadal").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/members/api/members/create/",
        Some(json!({"firstname": "Rafa", "lastname": "Nadal", "email": "rafael.nadal@tennis.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "This email is already in use."}));
}

#[tokio::test]
async fn malformed_and_incomplete_bodies_are_bad_requests() {
    let app = app().await;

    let request = Request::post("/members/api/members/create/").body(Body::from("{oops")).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) =
        call(&app, Method::POST, "/members/api/members/create/", Some(json!({"firstname": "Naomi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("lastname"), "{body}");
}

#[tokio::test]
async fn update_accepts_partial_bodies_on_every_method() {
    let app = app().await;
    let id = create(&app, "Novak", "Djokovic").await;
    let uri = format!("/members/api/members/{id}/update/");

    let (status, body) = call(&app, Method::PATCH, &uri, Some(json!({"phone": "555-0105"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["member"]["email"], "novak.djokovic@tennis.com");

    let (status, _) = call(&app, Method::PUT, &uri, Some(json!({"firstname": "Nole"}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::POST, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, &format!("/members/api/members/{id}/"), None).await;
    assert_eq!(body["member"]["firstname"], "Nole");
    assert_eq!(body["member"]["phone"], "555-0105");
}

#[tokio::test]
async fn explicit_null_only_clears_the_team() {
    let app = app().await;
    let id = create(&app, "Coco", "Gauff").await;
    let uri = format!("/members/api/members/{id}/update/");

    for field in ["firstname", "lastname", "email", "phone"] {
        let (status, body) = call(&app, Method::PATCH, &uri, Some(json!({ field: null }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
        assert!(body["error"].as_str().unwrap().contains("invalid type: null"), "{body}");
    }

    let (status, _) = call(&app, Method::PATCH, &uri, Some(json!({"team": null}))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, Method::GET, &format!("/members/api/members/{id}/"), None).await;
    assert_eq!(body["member"]["email"], "coco.gauff@tennis.com");
}

#[tokio::test]
async fn missing_members_are_404_even_with_bad_bodies() {
    let app = app().await;

    let (status, body) = call(&app, Method::GET, "/members/api/members/42/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Member not found"}));

    let request = Request::post("/members/api/members/42/update/").body(Body::from("{oops")).unwrap();
    assert_eq!(app.clone().oneshot(request).await.unwrap().status(), StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, "/members/api/members/42/delete/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, Method::GET, "/members/api/members/abc/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_reports_the_removed_member() {
    let app = app().await;
    let id = create(&app, "Andy", "Murray").await;

    let (status, body) = call(&app, Method::DELETE, &format!("/members/api/members/{id}/delete/"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "deleted": {"id": id, "name": "Andy Murray"}}));

    let (status, _) = call(&app, Method::POST, &format!("/members/api/members/{id}/delete/"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_only_answers_get() {
    let app = app().await;
    let (status, _) = call(&app, Method::DELETE, "/members/api/members/", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
