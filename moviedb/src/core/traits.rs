use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, FromQueryResult, IntoActiveModel, Order,
    PaginatorTrait, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::validation::Validatable;

pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this update model into an existing active model
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge operation fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// A catalogue table exposed through the generic list/get/create/update/delete
/// handlers.
///
/// Implementors declare their sea-orm types, their names and which columns can
/// be filtered and sorted; the default methods do the rest. Override a method
/// to load related rows (see `Cinema::get_one`).
#[async_trait]
pub trait CrudResource: Serialize + Sized + Send + Sync + 'static {
    type EntityType: EntityTrait<
            Model = Self::ModelType,
            Column = Self::ColumnType,
            PrimaryKey = Self::PrimaryKeyType,
        > + Sync;
    type ModelType: FromQueryResult
        + IntoActiveModel<Self::ActiveModelType>
        + Into<Self>
        + Clone
        + Send
        + Sync;
    type PrimaryKeyType: PrimaryKeyTrait<ValueType = i32>;
    type ColumnType: ColumnTrait + Copy + Send + Sync + std::fmt::Debug;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>
        + ActiveModelBehavior
        + Send
        + Sync;
    type CreateModel: Into<Self::ActiveModelType> + Validatable + DeserializeOwned + Send + 'static;
    type UpdateModel: MergeIntoActiveModel<Self::ActiveModelType>
        + Validatable
        + DeserializeOwned
        + Send
        + 'static;

    const ID_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;

    async fn get_all(
        db: &DatabaseConnection,
        condition: &Condition,
        order_column: Self::ColumnType,
        order_direction: Order,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, DbErr> {
        let models = Self::EntityType::find()
            .filter(condition.clone())
            .order_by(order_column, order_direction)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_one(db: &DatabaseConnection, id: i32) -> Result<Option<Self>, DbErr> {
        let model = Self::EntityType::find_by_id(id).one(db).await?;
        Ok(model.map(Into::into))
    }

    async fn create<C>(db: &C, create_model: Self::CreateModel) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let active_model: Self::ActiveModelType = create_model.into();
        let model = active_model.insert(db).await?;
        Ok(model.into())
    }

    async fn update<C>(db: &C, id: i32, update_model: Self::UpdateModel) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let model = Self::EntityType::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("{} not found", Self::RESOURCE_NAME_SINGULAR))
            })?;
        let existing: Self::ActiveModelType = model.into_active_model();
        let updated_model = update_model.merge_into_activemodel(existing)?;
        let updated = updated_model.update(db).await?;
        Ok(updated.into())
    }

    async fn delete<C>(db: &C, id: i32) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Self::EntityType::delete_by_id(id).exec(db).await?;
        match res.rows_affected {
            0 => Err(DbErr::RecordNotFound(format!(
                "{} not found",
                Self::RESOURCE_NAME_SINGULAR
            ))),
            _ => Ok(()),
        }
    }

    async fn total_count(db: &DatabaseConnection, condition: &Condition) -> Result<u64, DbErr> {
        Self::EntityType::find()
            .filter(condition.clone())
            .count(db)
            .await
    }

    #[must_use]
    fn sortable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("id", Self::ID_COLUMN)]
    }

    #[must_use]
    fn filterable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![("id", Self::ID_COLUMN)]
    }

    /// Filterable columns matched by substring and searched by `q`.
    #[must_use]
    fn text_columns() -> Vec<&'static str> {
        vec![]
    }
}
