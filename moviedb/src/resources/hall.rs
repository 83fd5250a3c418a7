use async_trait::async_trait;
use movie_models::{HallType, hall};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, DbErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::{CrudResource, MergeIntoActiveModel};
use crate::validation::{Validatable, ValidationErrors, validators};

pub(crate) const PRICE_PRECISION: u32 = 9;
pub(crate) const PRICE_SCALE: u32 = 2;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Hall {
    pub id: i32,
    pub price: Decimal,
    pub hall_type: HallType,
    pub cinema_id: i32,
}

impl From<hall::Model> for Hall {
    fn from(model: hall::Model) -> Self {
        Self {
            id: model.id,
            price: model.price,
            hall_type: model.hall_type,
            cinema_id: model.cinema_id,
        }
    }
}

/// New hall. Without `hall_type` the column default (2D) applies.
#[derive(Debug, Deserialize, ToSchema)]
pub struct HallCreate {
    pub price: Decimal,
    #[serde(default)]
    pub hall_type: Option<HallType>,
    pub cinema_id: i32,
}

impl From<HallCreate> for hall::ActiveModel {
    fn from(create: HallCreate) -> Self {
        hall::ActiveModel {
            id: ActiveValue::NotSet,
            price: ActiveValue::Set(create.price),
            hall_type: create.hall_type.map_or(ActiveValue::NotSet, ActiveValue::Set),
            cinema_id: ActiveValue::Set(create.cinema_id),
        }
    }
}

fn validate_price(errors: &mut ValidationErrors, price: Decimal) {
    errors.check(validators::validate_range(
        "price",
        price,
        Some(Decimal::ZERO),
        None,
    ));
    errors.check(validators::validate_decimal(
        "price",
        price,
        PRICE_PRECISION,
        PRICE_SCALE,
    ));
}

impl Validatable for HallCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_price(&mut errors, self.price);
        errors.result()
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct HallUpdate {
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub hall_type: Option<HallType>,
    #[serde(default)]
    pub cinema_id: Option<i32>,
}

impl MergeIntoActiveModel<hall::ActiveModel> for HallUpdate {
    fn merge_into_activemodel(
        self,
        mut existing: hall::ActiveModel,
    ) -> Result<hall::ActiveModel, DbErr> {
        if let Some(price) = self.price {
            existing.price = ActiveValue::Set(price);
        }
        if let Some(hall_type) = self.hall_type {
            existing.hall_type = ActiveValue::Set(hall_type);
        }
        if let Some(cinema_id) = self.cinema_id {
            existing.cinema_id = ActiveValue::Set(cinema_id);
        }
        Ok(existing)
    }
}

impl Validatable for HallUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(price) = self.price {
            validate_price(&mut errors, price);
        }
        errors.result()
    }
}

#[async_trait]
impl CrudResource for Hall {
    type EntityType = hall::Entity;
    type ModelType = hall::Model;
    type PrimaryKeyType = hall::PrimaryKey;
    type ColumnType = hall::Column;
    type ActiveModelType = hall::ActiveModel;
    type CreateModel = HallCreate;
    type UpdateModel = HallUpdate;

    const ID_COLUMN: hall::Column = hall::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "hall";
    const RESOURCE_NAME_PLURAL: &'static str = "halls";

    fn sortable_columns() -> Vec<(&'static str, hall::Column)> {
        vec![
            ("id", hall::Column::Id),
            ("price", hall::Column::Price),
            ("hall_type", hall::Column::HallType),
            ("cinema_id", hall::Column::CinemaId),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, hall::Column)> {
        vec![
            ("id", hall::Column::Id),
            ("hall_type", hall::Column::HallType),
            ("cinema_id", hall::Column::CinemaId),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create(price: &str) -> HallCreate {
        HallCreate {
            price: Decimal::from_str(price).unwrap(),
            hall_type: None,
            cinema_id: 1,
        }
    }

    #[test]
    fn test_price_within_precision_is_accepted() {
        assert!(create("220.00").validate().is_ok());
        assert!(create("9999999.99").validate().is_ok());
    }

    #[test]
    fn test_price_beyond_precision_is_rejected() {
        assert!(create("12.345").validate().is_err());
        assert!(create("10000000.00").validate().is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        assert!(create("-1.00").validate().is_err());
    }

    #[test]
    fn test_missing_hall_type_leaves_column_default() {
        let active: hall::ActiveModel = create("10.00").into();
        assert!(matches!(active.hall_type, ActiveValue::NotSet));
    }

    #[test]
    fn test_hall_type_wire_names() {
        let create: HallCreate =
            serde_json::from_str(r#"{"price": "15.50", "hall_type": "3D", "cinema_id": 2}"#)
                .unwrap();
        assert_eq!(create.hall_type, Some(HallType::ThreeDimensions));
    }
}
