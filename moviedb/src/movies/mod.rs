//! `/api/movies`: one endpoint per way of loading a movie and its relations,
//! plus grouping, filtering and writes.

pub mod dto;
pub mod filter;
pub mod handlers;
pub mod queries;

use sea_orm::DatabaseConnection;
use utoipa_axum::{router::OpenApiRouter, routes};

pub use dto::{MovieCreate, MovieDto, MovieUpdate};
pub use filter::MovieFilter;

/// Documented movie routes.
pub fn router() -> OpenApiRouter<DatabaseConnection> {
    OpenApiRouter::new()
        .routes(routes!(handlers::create_movie))
        .routes(routes!(
            handlers::get_movie,
            handlers::update_movie,
            handlers::delete_movie
        ))
        .routes(routes!(handlers::get_movie_projected))
        .routes(routes!(handlers::get_movie_selective))
        .routes(routes!(handlers::get_movie_explicit))
        .routes(routes!(handlers::get_movies_lazy))
        .routes(routes!(handlers::get_grouped_by_showing))
        .routes(routes!(handlers::get_grouped_by_genre_count))
        .routes(routes!(handlers::filter_movies))
}
