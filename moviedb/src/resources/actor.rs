use async_trait::async_trait;
use chrono::NaiveDate;
use movie_models::actor;
use sea_orm::{ActiveValue, DbErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::{CrudResource, MergeIntoActiveModel};
use crate::validation::{Validatable, ValidationErrors, validators};

const NAME_MAX: usize = 150;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl From<actor::Model> for Actor {
    fn from(model: actor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            biography: model.biography,
            birth_date: model.birth_date,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActorCreate {
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl From<ActorCreate> for actor::ActiveModel {
    fn from(create: ActorCreate) -> Self {
        actor::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(create.name.trim().to_string()),
            biography: ActiveValue::Set(create.biography),
            birth_date: ActiveValue::Set(create.birth_date),
        }
    }
}

impl Validatable for ActorCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("name", &self.name));
        errors.check(validators::validate_length("name", &self.name, None, Some(NAME_MAX)));
        errors.result()
    }
}

/// Partial update. `biography` and `birth_date` distinguish an absent key
/// (unchanged) from an explicit `null` (cleared).
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ActorUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<String>)]
    pub biography: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[schema(value_type = Option<NaiveDate>)]
    pub birth_date: Option<Option<NaiveDate>>,
}

impl MergeIntoActiveModel<actor::ActiveModel> for ActorUpdate {
    fn merge_into_activemodel(
        self,
        mut existing: actor::ActiveModel,
    ) -> Result<actor::ActiveModel, DbErr> {
        if let Some(name) = self.name {
            existing.name = ActiveValue::Set(name.trim().to_string());
        }
        if let Some(biography) = self.biography {
            existing.biography = ActiveValue::Set(biography);
        }
        if let Some(birth_date) = self.birth_date {
            existing.birth_date = ActiveValue::Set(birth_date);
        }
        Ok(existing)
    }
}

impl Validatable for ActorUpdate {
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
impl CrudResource for Actor {
    type EntityType = actor::Entity;
    type ModelType = actor::Model;
    type PrimaryKeyType = actor::PrimaryKey;
    type ColumnType = actor::Column;
    type ActiveModelType = actor::ActiveModel;
    type CreateModel = ActorCreate;
    type UpdateModel = ActorUpdate;

    const ID_COLUMN: actor::Column = actor::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "actor";
    const RESOURCE_NAME_PLURAL: &'static str = "actors";

    fn sortable_columns() -> Vec<(&'static str, actor::Column)> {
        vec![
            ("id", actor::Column::Id),
            ("name", actor::Column::Name),
            ("birth_date", actor::Column::BirthDate),
        ]
    }

    fn filterable_columns() -> Vec<(&'static str, actor::Column)> {
        vec![
            ("id", actor::Column::Id),
            ("name", actor::Column::Name),
            ("biography", actor::Column::Biography),
            ("birth_date", actor::Column::BirthDate),
        ]
    }

    fn text_columns() -> Vec<&'static str> {
        vec!["name", "biography"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> actor::ActiveModel {
        actor::ActiveModel {
            id: ActiveValue::Unchanged(7),
            name: ActiveValue::Unchanged("Tom Holland".to_string()),
            biography: ActiveValue::Unchanged(Some("English actor".to_string())),
            birth_date: ActiveValue::Unchanged(NaiveDate::from_ymd_opt(1996, 6, 1)),
        }
    }

    #[test]
    fn test_absent_key_keeps_value_and_null_clears_it() {
        let update: ActorUpdate = serde_json::from_str(r#"{"biography": null}"#).unwrap();
        assert_eq!(update.biography, Some(None));
        assert_eq!(update.birth_date, None);

        let merged = update.merge_into_activemodel(existing()).unwrap();
        assert!(matches!(merged.biography, ActiveValue::Set(None)));
        assert!(matches!(merged.birth_date, ActiveValue::Unchanged(Some(_))));
    }

    #[test]
    fn test_overlong_name_is_rejected() {
        let update = ActorUpdate {
            name: Some("x".repeat(NAME_MAX + 1)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
