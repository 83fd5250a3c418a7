use axum::{
    Json,
    extract::{Path, Query},
    http::StatusCode,
};
use chrono::Utc;

use super::dto::{GenreCountGroup, MovieCreate, MovieDto, MovieUpdate, SelectiveMovie, ShowingGroup};
use super::filter::MovieFilter;
use super::queries;
use crate::context::DbContext;
use crate::errors::{ApiError, ErrorResponse};
use crate::validation::Validatable;

fn not_found(id: i32) -> ApiError {
    ApiError::not_found("Movie", Some(id.to_string()))
}

/// Name the movie in a not-found raised inside a write transaction.
fn with_movie_id(id: i32) -> impl FnOnce(ApiError) -> ApiError {
    move |err| match err {
        ApiError::NotFound { .. } => not_found(id),
        other => other,
    }
}

#[utoipa::path(
    get,
    path = "/api/movies/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie with genres, cinemas and recent actors", body = MovieDto),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
pub async fn get_movie(ctx: DbContext, Path(id): Path<i32>) -> Result<Json<MovieDto>, ApiError> {
    queries::movie_detail(ctx.connection(), id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

#[utoipa::path(
    get,
    path = "/api/movies/projected/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie read with column-only selects", body = MovieDto),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
pub async fn get_movie_projected(
    ctx: DbContext,
    Path(id): Path<i32>,
) -> Result<Json<MovieDto>, ApiError> {
    queries::movie_projected(ctx.connection(), id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

#[utoipa::path(
    get,
    path = "/api/movies/selective/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Title, genre names and counts", body = SelectiveMovie),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
pub async fn get_movie_selective(
    ctx: DbContext,
    Path(id): Path<i32>,
) -> Result<Json<SelectiveMovie>, ApiError> {
    queries::movie_selective(ctx.connection(), id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

#[utoipa::path(
    get,
    path = "/api/movies/explicit/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie with explicitly loaded genres and their count", body = MovieDto),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
pub async fn get_movie_explicit(
    mut ctx: DbContext,
    Path(id): Path<i32>,
) -> Result<Json<MovieDto>, ApiError> {
    queries::movie_explicit(&mut ctx, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

#[utoipa::path(
    get,
    path = "/api/movies/lazy",
    tag = "movies",
    responses((status = 200, description = "All movies, genres loaded one movie at a time", body = [MovieDto]))
)]
pub async fn get_movies_lazy(mut ctx: DbContext) -> Result<Json<Vec<MovieDto>>, ApiError> {
    let movies = queries::movies_lazy(&mut ctx).await?;
    tracing::debug!(
        movies = movies.len(),
        tracked = ctx.tracked_count(),
        "lazy loading finished"
    );
    Ok(Json(movies))
}

#[utoipa::path(
    get,
    path = "/api/movies/grouped-by-showing",
    tag = "movies",
    responses((status = 200, description = "Movies grouped by whether they are showing", body = [ShowingGroup]))
)]
pub async fn get_grouped_by_showing(
    ctx: DbContext,
) -> Result<Json<Vec<ShowingGroup>>, ApiError> {
    Ok(Json(queries::grouped_by_showing(ctx.connection()).await?))
}

#[utoipa::path(
    get,
    path = "/api/movies/grouped-by-genre-count",
    tag = "movies",
    responses((status = 200, description = "Movies grouped by number of genres", body = [GenreCountGroup]))
)]
pub async fn get_grouped_by_genre_count(
    ctx: DbContext,
) -> Result<Json<Vec<GenreCountGroup>>, ApiError> {
    Ok(Json(queries::grouped_by_genre_count(ctx.connection()).await?))
}

#[utoipa::path(
    get,
    path = "/api/movies/filter",
    tag = "movies",
    params(MovieFilter),
    responses(
        (status = 200, description = "Movies matching every given criterion", body = [MovieDto]),
        (status = 400, description = "Malformed query string")
    )
)]
pub async fn filter_movies(
    ctx: DbContext,
    Query(filter): Query<MovieFilter>,
) -> Result<Json<Vec<MovieDto>>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(
        queries::filter_movies(ctx.connection(), &filter, today).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/movies",
    tag = "movies",
    request_body = MovieCreate,
    responses(
        (status = 201, description = "Movie created", body = MovieDto),
        (status = 422, description = "Invalid movie or unknown genre, hall or actor", body = ErrorResponse)
    )
)]
pub async fn create_movie(
    mut ctx: DbContext,
    Json(payload): Json<MovieCreate>,
) -> Result<(StatusCode, Json<MovieDto>), ApiError> {
    payload.validate()?;

    let id = ctx
        .save(move |txn| Box::pin(async move { queries::create_movie(txn, payload).await }))
        .await?;
    tracing::info!(movie_id = id, "movie created");

    let movie = queries::movie_projected(ctx.connection(), id)
        .await?
        .ok_or_else(|| ApiError::internal("Movie vanished after creation", None))?;
    Ok((StatusCode::CREATED, Json(movie)))
}

#[utoipa::path(
    put,
    path = "/api/movies/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    request_body = MovieUpdate,
    responses(
        (status = 200, description = "Movie updated", body = MovieDto),
        (status = 404, description = "Movie not found", body = ErrorResponse),
        (status = 422, description = "Invalid update", body = ErrorResponse)
    )
)]
pub async fn update_movie(
    mut ctx: DbContext,
    Path(id): Path<i32>,
    Json(payload): Json<MovieUpdate>,
) -> Result<Json<MovieDto>, ApiError> {
    payload.validate()?;

    ctx.save(move |txn| Box::pin(async move { queries::update_movie(txn, id, payload).await }))
        .await
        .map_err(with_movie_id(id))?;
    tracing::info!(movie_id = id, "movie updated");

    queries::movie_projected(ctx.connection(), id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

#[utoipa::path(
    delete,
    path = "/api/movies/{id}",
    tag = "movies",
    params(("id" = i32, Path, description = "Movie id")),
    responses(
        (status = 204, description = "Movie deleted"),
        (status = 404, description = "Movie not found", body = ErrorResponse)
    )
)]
pub async fn delete_movie(mut ctx: DbContext, Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    ctx.save(move |txn| Box::pin(async move { queries::delete_movie(txn, id).await }))
        .await
        .map_err(with_movie_id(id))?;
    tracing::info!(movie_id = id, "movie deleted");
    Ok(StatusCode::NO_CONTENT)
}
