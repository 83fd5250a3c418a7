use sea_orm::entity::prelude::*;

/// Time-boxed discount a cinema applies to its tickets. At most one per cinema.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cinema_offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub cinema_id: i32,
    pub start_date: Date,
    pub end_date: Date,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub discount_percentage: Decimal,
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
}

impl Related<super::cinema::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cinema.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
