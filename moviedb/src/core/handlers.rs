use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use hyper::HeaderMap;
use sea_orm::DatabaseConnection;

use super::traits::CrudResource;
use crate::context::DbContext;
use crate::errors::ApiError;
use crate::filtering::{apply_filters, calculate_content_range, parse_pagination, parse_sorting};
use crate::models::ListParams;
use crate::validation::Validatable;

/// List one page of a resource, with a `Content-Range` header carrying the
/// total number of matching rows.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` for a malformed `filter` and a database
/// error when the query fails.
pub async fn get_all<T>(
    ctx: DbContext,
    Query(params): Query<ListParams>,
) -> Result<(HeaderMap, Json<Vec<T>>), ApiError>
where
    T: CrudResource,
{
    let condition = apply_filters(
        params.filter.as_deref(),
        &T::filterable_columns(),
        &T::text_columns(),
    )?;
    let (offset, limit) = parse_pagination(&params);
    let (order_column, order_direction) =
        parse_sorting(&params, &T::sortable_columns(), T::ID_COLUMN);

    let db = ctx.connection();
    let items = T::get_all(db, &condition, order_column, order_direction, offset, limit).await?;
    let total_count = T::total_count(db, &condition).await?;

    let headers = calculate_content_range(offset, limit, total_count, T::RESOURCE_NAME_PLURAL);
    Ok((headers, Json(items)))
}

/// # Errors
///
/// Returns `ApiError::NotFound` when no row has this id.
pub async fn get_one<T>(ctx: DbContext, Path(id): Path<i32>) -> Result<Json<T>, ApiError>
where
    T: CrudResource,
{
    T::get_one(ctx.connection(), id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(T::RESOURCE_NAME_SINGULAR, Some(id.to_string())))
}

/// # Errors
///
/// Returns 422 for an invalid payload or a dangling reference and 409 when a
/// unique value is already taken.
pub async fn create_one<T>(
    mut ctx: DbContext,
    Json(payload): Json<T::CreateModel>,
) -> Result<(StatusCode, Json<T>), ApiError>
where
    T: CrudResource,
{
    payload.validate()?;
    let created = ctx
        .save(move |txn| Box::pin(async move { T::create(txn, payload).await }))
        .await?;
    tracing::info!(resource = T::RESOURCE_NAME_SINGULAR, "created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown id, otherwise the same errors
/// as [`create_one`].
pub async fn update_one<T>(
    mut ctx: DbContext,
    Path(id): Path<i32>,
    Json(payload): Json<T::UpdateModel>,
) -> Result<Json<T>, ApiError>
where
    T: CrudResource,
{
    payload.validate()?;
    let updated = ctx
        .save(move |txn| Box::pin(async move { T::update(txn, id, payload).await }))
        .await?;
    tracing::info!(resource = T::RESOURCE_NAME_SINGULAR, id, "updated");
    Ok(Json(updated))
}

/// Deleting a row also removes the rows that depend on it.
///
/// # Errors
///
/// Returns `ApiError::NotFound` for an unknown id.
pub async fn delete_one<T>(mut ctx: DbContext, Path(id): Path<i32>) -> Result<StatusCode, ApiError>
where
    T: CrudResource,
{
    ctx.save(move |txn| Box::pin(async move { T::delete(txn, id).await }))
        .await?;
    tracing::info!(resource = T::RESOURCE_NAME_SINGULAR, id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Routes for `/api/{plural}` and `/api/{plural}/{id}`.
pub fn resource_router<T>() -> Router<DatabaseConnection>
where
    T: CrudResource,
{
    let collection = format!("/api/{}", T::RESOURCE_NAME_PLURAL);
    let item = format!("/api/{}/{{id}}", T::RESOURCE_NAME_PLURAL);

    Router::new()
        .route(&collection, get(get_all::<T>).post(create_one::<T>))
        .route(
            &item,
            get(get_one::<T>).put(update_one::<T>).delete(delete_one::<T>),
        )
}
