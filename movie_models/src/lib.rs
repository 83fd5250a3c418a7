//! Sea-ORM entities for the movie catalogue.
//!
//! Many-to-many relations go through explicit join entities
//! (`movie_genre`, `movie_actor`, `movie_hall`) so that `Related::via` can be
//! used for eager loading and `movie_actor` can carry the role played.

pub mod actor;
pub mod cinema;
pub mod cinema_offer;
pub mod genre;
pub mod hall;
pub mod movie;
pub mod movie_actor;
pub mod movie_genre;
pub mod movie_hall;

pub use hall::HallType;
