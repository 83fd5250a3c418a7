use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Projection format of a cinema hall. Stored as `"2D"` / `"3D"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum HallType {
    #[default]
    #[sea_orm(string_value = "2D")]
    #[serde(rename = "2D")]
    TwoDimensions,
    #[sea_orm(string_value = "3D")]
    #[serde(rename = "3D")]
    ThreeDimensions,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "halls")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Ticket price, `DECIMAL(9, 2)`.
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub price: Decimal,
    pub hall_type: HallType,
    pub cinema_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cinema::Entity",
        from = "Column::CinemaId",
        to = "super::cinema::Column::Id",
        on_delete = "Cascade"
    )]
    Cinema,
    #[sea_orm(has_many = "super::movie_hall::Entity")]
    MovieHalls,
}

impl Related<super::cinema::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cinema.def()
    }
}

impl Related<super::movie_hall::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieHalls.def()
    }
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_hall::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_hall::Relation::Hall.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
