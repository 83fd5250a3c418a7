use axum::{Router, http::Method, routing::get};
use movie_models::HallType;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

use crate::config::Config;
use crate::errors::ErrorResponse;
use crate::migration::Migrator;
use crate::movies;
use crate::resources::{self, Actor, Cinema, CinemaOffer, Genre, Hall};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "moviedb",
        description = "Movie catalogue showing eager, projected, selective, explicit and lazy loading"
    ),
    tags((name = "movies", description = "Movie loading strategies, grouping, filtering and writes")),
    components(schemas(Genre, Actor, Cinema, CinemaOffer, Hall, HallType, ErrorResponse))
)]
pub struct ApiDoc;

async fn health() -> &'static str {
    "ok"
}

/// Open the pool described by `config` and bring the schema up to date.
///
/// # Errors
///
/// Returns the `DbErr` of the connection attempt or of a failed migration.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.connect_options()).await?;
    Migrator::up(&db, None).await?;
    tracing::info!(in_memory = config.is_in_memory(), "database ready");
    Ok(db)
}

/// The whole application: movie endpoints, catalogue resources, `/health`
/// and the API reference at `/docs`.
pub fn router(db: DatabaseConnection) -> Router {
    let (movie_routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(movies::router())
        .split_for_parts();

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    movie_routes
        .merge(resources::router())
        .route("/health", get(health))
        .merge(Scalar::with_url("/docs", api))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(db)
}
