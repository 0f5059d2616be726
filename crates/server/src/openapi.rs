use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::update_me,
        crate::routes::leagues::create,
        crate::routes::leagues::search,
        crate::routes::leagues::join,
        crate::routes::leagues::upload_fantasy_team_image,
        crate::routes::seasons::create,
        crate::routes::seasons::list,
        crate::routes::seasons::current,
        crate::routes::seasons::get,
        crate::routes::seasons::update,
        crate::routes::seasons::delete,
        crate::routes::teams::create,
        crate::routes::teams::create_upload,
        crate::routes::teams::list,
        crate::routes::teams::get,
        crate::routes::teams::update,
        crate::routes::players::create,
        crate::routes::players::create_upload,
        crate::routes::players::batch_upload,
    ),
    components(schemas(
        crate::routes::auth::TokenResponse,
        crate::routes::leagues::LeagueCreated,
        crate::routes::leagues::UploadResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and profile"),
        (name = "leagues", description = "League creation, search and membership"),
        (name = "seasons", description = "Season and week scheduling"),
        (name = "teams", description = "Team management"),
        (name = "players", description = "Player rosters"),
        (name = "meta", description = "Service health")
    )
)]
pub struct ApiDoc;
