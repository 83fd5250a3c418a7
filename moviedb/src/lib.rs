//! # moviedb
//!
//! A movie catalogue HTTP API over Sea-ORM. The movie endpoints each read a
//! movie and its relations (genres, cinemas reached through halls, actor
//! roles) in a different way: eager joins, column projections, selective
//! counts, explicit loading through a tracking [`DbContext`], and the N+1
//! lazy pattern. Genres, actors, cinemas and halls are plain CRUD resources
//! implementing [`CrudResource`].
//!
//! ```rust,ignore
//! let config = Config::from_env()?;
//! let db = moviedb::connect(&config).await?;
//! let app = moviedb::router(db);
//! axum::serve(tokio::net::TcpListener::bind(config.bind_addr).await?, app).await?;
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod filtering;
pub mod migration;
pub mod models;
pub mod movies;
pub mod resources;
pub mod seed;
pub mod validation;

pub use app::{connect, router};
pub use config::Config;
pub use context::DbContext;
pub use self::core::CrudResource;
pub use errors::ApiError;
