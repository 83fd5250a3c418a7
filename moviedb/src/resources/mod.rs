//! Catalogue resources served by the generic CRUD handlers.

pub mod actor;
pub mod cinema;
pub mod genre;
pub mod hall;

use axum::{Router, routing::put};
use sea_orm::DatabaseConnection;

use crate::core::resource_router;

pub use actor::Actor;
pub use cinema::{Cinema, CinemaOffer};
pub use genre::Genre;
pub use hall::Hall;

/// `/api/genres`, `/api/actors`, `/api/cinemas` (with the offer sub-resource)
/// and `/api/halls`.
pub fn router() -> Router<DatabaseConnection> {
    Router::new()
        .merge(resource_router::<Genre>())
        .merge(resource_router::<Actor>())
        .merge(resource_router::<Cinema>())
        .merge(resource_router::<Hall>())
        .route(
            "/api/cinemas/{id}/offer",
            put(cinema::put_offer).delete(cinema::delete_offer),
        )
}
