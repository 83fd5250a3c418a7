use sea_orm::entity::prelude::*;

/// A movie being shown in a hall.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_halls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub movie_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub hall_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::Id",
        on_delete = "Cascade"
    )]
    Movie,
    #[sea_orm(
        belongs_to = "super::hall::Entity",
        from = "Column::HallId",
        to = "super::hall::Column::Id",
        on_delete = "Cascade"
    )]
    Hall,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movie.def()
    }
}

impl Related<super::hall::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hall.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
