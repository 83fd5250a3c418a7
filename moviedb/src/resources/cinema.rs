use async_trait::async_trait;
use axum::{Json, extract::Path, http::StatusCode};
use chrono::NaiveDate;
use movie_models::{cinema, cinema_offer, hall};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::hall::Hall;
use crate::context::DbContext;
use crate::core::{CrudResource, MergeIntoActiveModel};
use crate::errors::ApiError;
use crate::validation::{Validatable, ValidationError, ValidationErrors, validators};

const NAME_MAX: usize = 150;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CinemaOffer {
    pub id: i32,
    pub cinema_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub discount_percentage: Decimal,
}

impl From<cinema_offer::Model> for CinemaOffer {
    fn from(model: cinema_offer::Model) -> Self {
        Self {
            id: model.id,
            cinema_id: model.cinema_id,
            start_date: model.start_date,
            end_date: model.end_date,
            discount_percentage: model.discount_percentage,
        }
    }
}

/// A cinema. `halls` and `offer` are only loaded for the single cinema view.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Cinema {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub halls: Vec<Hall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<CinemaOffer>,
}

impl From<cinema::Model> for Cinema {
    fn from(model: cinema::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            halls: Vec::new(),
            offer: None,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CinemaCreate {
    pub name: String,
}

impl From<CinemaCreate> for cinema::ActiveModel {
    fn from(create: CinemaCreate) -> Self {
        cinema::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(create.name.trim().to_string()),
        }
    }
}

impl Validatable for CinemaCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("name", &self.name));
        errors.check(validators::validate_length("name", &self.name, None, Some(NAME_MAX)));
        errors.result()
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CinemaUpdate {
    #[serde(default)]
    pub name: Option<String>,
}

impl MergeIntoActiveModel<cinema::ActiveModel> for CinemaUpdate {
    fn merge_into_activemodel(
        self,
        mut existing: cinema::ActiveModel,
    ) -> Result<cinema::ActiveModel, DbErr> {
        if let Some(name) = self.name {
            existing.name = ActiveValue::Set(name.trim().to_string());
        }
        Ok(existing)
    }
}

impl Validatable for CinemaUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            errors.check(validators::validate_required("name", name));
            errors.check(validators::validate_length("name", name, None, Some(NAME_MAX)));
        }
        errors.result()
    }
}

#[async_trait]
impl CrudResource for Cinema {
    type EntityType = cinema::Entity;
    type ModelType = cinema::Model;
    type PrimaryKeyType = cinema::PrimaryKey;
    type ColumnType = cinema::Column;
    type ActiveModelType = cinema::ActiveModel;
    type CreateModel = CinemaCreate;
    type UpdateModel = CinemaUpdate;

    const ID_COLUMN: cinema::Column = cinema::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "cinema";
    const RESOURCE_NAME_PLURAL: &'static str = "cinemas";

    async fn get_one(db: &DatabaseConnection, id: i32) -> Result<Option<Self>, DbErr> {
        let Some(model) = cinema::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let halls = model
            .find_related(hall::Entity)
            .order_by_asc(hall::Column::Id)
            .all(db)
            .await?;
        let offer = model.find_related(cinema_offer::Entity).one(db).await?;

        let mut cinema = Self::from(model);
        cinema.halls = halls.into_iter().map(Hall::from).collect();
        cinema.offer = offer.map(CinemaOffer::from);
        Ok(Some(cinema))
    }

    fn sortable_columns() -> Vec<(&'static str, cinema::Column)> {
        vec![("id", cinema::Column::Id), ("name", cinema::Column::Name)]
    }

    fn filterable_columns() -> Vec<(&'static str, cinema::Column)> {
        vec![("id", cinema::Column::Id), ("name", cinema::Column::Name)]
    }

    fn text_columns() -> Vec<&'static str> {
        vec!["name"]
    }
}

/// Body of `PUT /api/cinemas/{id}/offer`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OfferPayload {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub discount_percentage: Decimal,
}

impl OfferPayload {
    fn apply(self, offer: &mut cinema_offer::ActiveModel) {
        offer.start_date = ActiveValue::Set(self.start_date);
        offer.end_date = ActiveValue::Set(self.end_date);
        offer.discount_percentage = ActiveValue::Set(self.discount_percentage);
    }
}

impl Validatable for OfferPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_range(
            "discount_percentage",
            self.discount_percentage,
            Some(Decimal::ZERO),
            Some(Decimal::ONE_HUNDRED),
        ));
        errors.check(validators::validate_decimal(
            "discount_percentage",
            self.discount_percentage,
            5,
            2,
        ));
        if self.start_date > self.end_date {
            errors.add(ValidationError::new(
                "end_date",
                "Must not be before start_date",
            ));
        }
        errors.result()
    }
}

/// Create or replace the offer of a cinema.
///
/// # Errors
///
/// Returns 404 for an unknown cinema and 422 for an invalid offer.
pub async fn put_offer(
    mut ctx: DbContext,
    Path(id): Path<i32>,
    Json(payload): Json<OfferPayload>,
) -> Result<Json<CinemaOffer>, ApiError> {
    payload.validate()?;

    let offer = ctx
        .save(move |txn| {
            Box::pin(async move {
                cinema::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| DbErr::RecordNotFound("cinema not found".to_string()))?;

                let existing = cinema_offer::Entity::find()
                    .filter(cinema_offer::Column::CinemaId.eq(id))
                    .one(txn)
                    .await?;

                match existing {
                    Some(model) => {
                        let mut offer = model.into_active_model();
                        payload.apply(&mut offer);
                        offer.update(txn).await
                    }
                    None => {
                        let mut offer = cinema_offer::ActiveModel {
                            cinema_id: ActiveValue::Set(id),
                            ..Default::default()
                        };
                        payload.apply(&mut offer);
                        offer.insert(txn).await
                    }
                }
            })
        })
        .await?;

    tracing::info!(cinema_id = id, "offer saved");
    Ok(Json(offer.into()))
}

/// # Errors
///
/// Returns 404 when the cinema has no offer.
pub async fn delete_offer(mut ctx: DbContext, Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    ctx.save(move |txn| {
        Box::pin(async move {
            let res = cinema_offer::Entity::delete_many()
                .filter(cinema_offer::Column::CinemaId.eq(id))
                .exec(txn)
                .await?;
            match res.rows_affected {
                0 => Err(DbErr::RecordNotFound("offer not found".to_string())),
                _ => Ok(()),
            }
        })
    })
    .await?;

    tracing::info!(cinema_id = id, "offer removed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn offer(start: (i32, u32, u32), end: (i32, u32, u32), discount: &str) -> OfferPayload {
        OfferPayload {
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            discount_percentage: Decimal::from_str(discount).unwrap(),
        }
    }

    #[test]
    fn test_valid_offer() {
        assert!(offer((2024, 1, 1), (2024, 1, 31), "10.00").validate().is_ok());
        assert!(offer((2024, 1, 1), (2024, 1, 1), "100").validate().is_ok());
    }

    #[test]
    fn test_discount_out_of_range() {
        let errors = offer((2024, 1, 1), (2024, 1, 31), "100.01")
            .validate()
            .unwrap_err();
        assert_eq!(errors.errors()[0].field, "discount_percentage");
        assert!(offer((2024, 1, 1), (2024, 1, 31), "-5").validate().is_err());
        assert!(offer((2024, 1, 1), (2024, 1, 31), "12.345").validate().is_err());
    }

    #[test]
    fn test_end_before_start() {
        let errors = offer((2024, 2, 1), (2024, 1, 1), "5").validate().unwrap_err();
        assert_eq!(errors.errors()[0].field, "end_date");
    }

    #[test]
    fn test_list_view_omits_unloaded_relations() {
        let cinema = Cinema::from(cinema::Model {
            id: 1,
            name: "Agora Mall".to_string(),
        });
        let json = serde_json::to_value(&cinema).unwrap();
        assert!(json.get("halls").is_none());
        assert!(json.get("offer").is_none());
    }
}
