use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub biography: Option<String>,
    pub birth_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_actor::Entity")]
    MovieActors,
}

impl Related<super::movie_actor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieActors.def()
    }
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_actor::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_actor::Relation::Actor.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
