use async_trait::async_trait;
use movie_models::genre;
use sea_orm::{ActiveValue, DbErr};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::{CrudResource, MergeIntoActiveModel};
use crate::validation::{Validatable, ValidationErrors, validators};

const NAME_MAX: usize = 150;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl From<genre::Model> for Genre {
    fn from(model: genre::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenreCreate {
    pub name: String,
}

impl From<GenreCreate> for genre::ActiveModel {
    fn from(create: GenreCreate) -> Self {
        genre::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(create.name.trim().to_string()),
        }
    }
}

impl Validatable for GenreCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_required("name", &self.name));
        errors.check(validators::validate_length("name", &self.name, None, Some(NAME_MAX)));
        errors.result()
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenreUpdate {
    #[serde(default)]
    pub name: Option<String>,
}

impl MergeIntoActiveModel<genre::ActiveModel> for GenreUpdate {
    fn merge_into_activemodel(
        self,
        mut existing: genre::ActiveModel,
    ) -> Result<genre::ActiveModel, DbErr> {
        if let Some(name) = self.name {
            existing.name = ActiveValue::Set(name.trim().to_string());
        }
        Ok(existing)
    }
}

impl Validatable for GenreUpdate {
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
impl CrudResource for Genre {
    type EntityType = genre::Entity;
    type ModelType = genre::Model;
    type PrimaryKeyType = genre::PrimaryKey;
    type ColumnType = genre::Column;
    type ActiveModelType = genre::ActiveModel;
    type CreateModel = GenreCreate;
    type UpdateModel = GenreUpdate;

    const ID_COLUMN: genre::Column = genre::Column::Id;
    const RESOURCE_NAME_SINGULAR: &'static str = "genre";
    const RESOURCE_NAME_PLURAL: &'static str = "genres";

    fn sortable_columns() -> Vec<(&'static str, genre::Column)> {
        vec![("id", genre::Column::Id), ("name", genre::Column::Name)]
    }

    fn filterable_columns() -> Vec<(&'static str, genre::Column)> {
        vec![("id", genre::Column::Id), ("name", genre::Column::Name)]
    }

    fn text_columns() -> Vec<&'static str> {
        vec!["name"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_rejected() {
        let errors = GenreCreate {
            name: "   ".to_string(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "name");
    }

    #[test]
    fn test_empty_update_leaves_model_untouched() {
        let existing = genre::ActiveModel {
            id: ActiveValue::Unchanged(1),
            name: ActiveValue::Unchanged("Drama".to_string()),
        };
        let merged = GenreUpdate::default()
            .merge_into_activemodel(existing)
            .unwrap();
        assert!(matches!(merged.name, ActiveValue::Unchanged(ref name) if name == "Drama"));
    }
}
