use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cinemas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::hall::Entity")]
    Halls,
    #[sea_orm(has_one = "super::cinema_offer::Entity")]
    Offer,
}

impl Related<super::hall::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Halls.def()
    }
}

impl Related<super::cinema_offer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
