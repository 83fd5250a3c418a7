//! # Persistence context
//!
//! [`DbContext`] is the unit of work handed to every request. It wraps a clone
//! of the pooled [`DatabaseConnection`], keeps an identity map of rows loaded
//! with tracking, and commits writes inside one transaction through
//! [`DbContext::save`].
//!
//! Queries themselves are plain sea-orm `Select`s: filters, joins, includes and
//! grouping are expressed with the query builder and translated to SQL by
//! sea-orm.
//!
//! ```rust,ignore
//! async fn handler(mut ctx: DbContext, Path(id): Path<i32>) -> Result<Json<Movie>, ApiError> {
//!     let movie = ctx
//!         .get::<movie::Entity>(id)
//!         .await?
//!         .ok_or_else(|| ApiError::not_found("Movie", Some(id.to_string())))?;
//!     Ok(Json(movie.into()))
//! }
//! ```

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use sea_orm::{
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PrimaryKeyTrait, Select,
    TransactionError, TransactionTrait,
};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use crate::errors::ApiError;

/// Rows that can be placed in the identity map.
pub trait Identity {
    /// Primary key of the row.
    fn identity(&self) -> i32;
}

/// Future returned by the unit of work passed to [`DbContext::save`].
pub type SaveFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 'c>>;

type IdentityKey = (TypeId, i32);

/// Request-scoped unit of work.
pub struct DbContext {
    conn: DatabaseConnection,
    tracked: HashMap<IdentityKey, Box<dyn Any + Send + Sync>>,
}

impl DbContext {
    #[must_use]
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            tracked: HashMap::new(),
        }
    }

    /// Connection for reads that need no tracking (projections, counts, joins).
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Tracked lookup by primary key.
    ///
    /// A row this context already tracks is served from the identity map.
    /// A missing row is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates the `DbErr` of the underlying query.
    pub async fn get<E>(&mut self, id: i32) -> Result<Option<E::Model>, DbErr>
    where
        E: EntityTrait,
        E::Model: Identity + Clone + Send + Sync + 'static,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        if let Some(model) = self.lookup::<E::Model>(id) {
            tracing::trace!(entity = std::any::type_name::<E>(), id, "identity map hit");
            return Ok(Some(model));
        }

        let found = E::find_by_id(id).one(&self.conn).await?;
        if let Some(model) = &found {
            self.track(model.clone());
        }
        Ok(found)
    }

    /// Untracked read of any select statement.
    ///
    /// # Errors
    ///
    /// Propagates the `DbErr` of the underlying query.
    pub async fn query<E>(&self, select: Select<E>) -> Result<Vec<E::Model>, DbErr>
    where
        E: EntityTrait,
    {
        select.all(&self.conn).await
    }

    /// Tracked read. Rows already in the identity map are returned as the
    /// tracked instance rather than the freshly read one.
    ///
    /// # Errors
    ///
    /// Propagates the `DbErr` of the underlying query.
    pub async fn query_tracking<E>(&mut self, select: Select<E>) -> Result<Vec<E::Model>, DbErr>
    where
        E: EntityTrait,
        E::Model: Identity + Clone + Send + Sync + 'static,
    {
        let rows = select.all(&self.conn).await?;
        let resolved = rows
            .into_iter()
            .map(|row| match self.lookup::<E::Model>(row.identity()) {
                Some(tracked) => tracked,
                None => {
                    self.track(row.clone());
                    row
                }
            })
            .collect();
        Ok(resolved)
    }

    #[must_use]
    pub fn is_tracked<E>(&self, id: i32) -> bool
    where
        E: EntityTrait,
        E::Model: 'static,
    {
        self.tracked.contains_key(&(TypeId::of::<E::Model>(), id))
    }

    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Run `work` in a transaction and commit it.
    ///
    /// The identity map is cleared afterwards whatever the outcome, since the
    /// tracked rows may no longer match the database.
    ///
    /// # Errors
    ///
    /// Returns the classified `ApiError` (conflict, validation, not found or
    /// database) when the transaction fails; nothing is committed in that case.
    pub async fn save<F, T>(&mut self, work: F) -> Result<T, ApiError>
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> SaveFuture<'c, T> + Send,
        T: Send,
    {
        let outcome = self.conn.transaction::<F, T, DbErr>(work).await;
        self.tracked.clear();

        outcome.map_err(|err| match err {
            TransactionError::Connection(db_err) | TransactionError::Transaction(db_err) => {
                ApiError::from(db_err)
            }
        })
    }

    fn lookup<M>(&self, id: i32) -> Option<M>
    where
        M: Clone + 'static,
    {
        self.tracked
            .get(&(TypeId::of::<M>(), id))
            .and_then(|boxed| boxed.downcast_ref::<M>())
            .cloned()
    }

    fn track<M>(&mut self, model: M)
    where
        M: Identity + Send + Sync + 'static,
    {
        self.tracked
            .insert((TypeId::of::<M>(), model.identity()), Box::new(model));
    }
}

impl<S> FromRequestParts<S> for DbContext
where
    S: Send + Sync,
    DatabaseConnection: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new(DatabaseConnection::from_ref(state)))
    }
}

macro_rules! impl_identity {
    ($($model:path),+ $(,)?) => {
        $(
            impl Identity for $model {
                fn identity(&self) -> i32 {
                    self.id
                }
            }
        )+
    };
}

impl_identity!(
    movie_models::movie::Model,
    movie_models::genre::Model,
    movie_models::actor::Model,
    movie_models::cinema::Model,
    movie_models::cinema_offer::Model,
    movie_models::hall::Model,
);
