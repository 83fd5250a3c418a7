use sea_orm::entity::prelude::*;

/// A film in the catalogue.
///
/// `in_theaters` marks movies currently showing; `release_date` is stored as a
/// plain date so "upcoming" comparisons are calendar based.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub in_theaters: bool,
    pub release_date: Date,
    pub poster_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_genre::Entity")]
    MovieGenres,
    #[sea_orm(has_many = "super::movie_actor::Entity")]
    MovieActors,
    #[sea_orm(has_many = "super::movie_hall::Entity")]
    MovieHalls,
}

impl Related<super::movie_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenres.def()
    }
}

impl Related<super::movie_actor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieActors.def()
    }
}

impl Related<super::movie_hall::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieHalls.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genre::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genre::Relation::Movie.def().rev())
    }
}

impl Related<super::actor::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_actor::Relation::Actor.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_actor::Relation::Movie.def().rev())
    }
}

impl Related<super::hall::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_hall::Relation::Hall.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_hall::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
