use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use club::kernel::prelude::ApiState;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "Tennis Club", description = "Members, teams, tournaments, profiles and matches"))]
struct ApiDoc;

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let (api_routes, api_doc) = utoipa_axum::router::OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(club::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    Router::new()
        .route("/", get(|| async { Redirect::to("/members/") }))
        .merge(api_routes)
        .merge(Scalar::with_url("/api", api_doc))
}
