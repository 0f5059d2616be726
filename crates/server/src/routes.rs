use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::state::AppState;
use common::types::Health;

pub mod auth;
pub mod leagues;
pub mod players;
pub mod seasons;
pub mod teams;

#[utoipa::path(
    get, path = "/health", tag = "meta",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: API routes, uploaded media and the
/// OpenAPI explorer.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let media_dir = ServeDir::new(state.media.root());

    let users = Router::new()
        .route("/register/", post(auth::register))
        .route("/token", post(auth::login))
        .route("/users/me/", get(auth::me).put(auth::update_me));

    let leagues = Router::new()
        .route("/leagues", post(leagues::create))
        .route("/leagues/search", get(leagues::search))
        .route("/leagues/:id/join", post(leagues::join))
        .route("/leagues/fantasy-team/upload", post(leagues::upload_fantasy_team_image));

    let seasons = Router::new()
        .route("/seasons/", post(seasons::create).get(seasons::list))
        .route("/seasons/current", get(seasons::current))
        .route(
            "/seasons/:id",
            get(seasons::get).put(seasons::update).delete(seasons::delete),
        );

    let teams = Router::new()
        .route("/teams", post(teams::create).get(teams::list))
        .route("/teams/upload", post(teams::create_upload))
        .route("/teams/:id", get(teams::get).put(teams::update));

    let players = Router::new()
        .route("/players", post(players::create))
        .route("/players/upload", post(players::create_upload))
        .route("/players/batch-upload", post(players::batch_upload));

    Router::new()
        .route("/health", get(health))
        .merge(users)
        .merge(leagues)
        .merge(seasons)
        .merge(teams)
        .merge(players)
        .with_state(state)
        .nest_service("/media", media_dir)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
