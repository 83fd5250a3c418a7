//! Schema migrations, run at startup and by the integration tests.

use movie_models::{
    HallType, actor, cinema, cinema_offer, genre, hall, movie, movie_actor, movie_genre, movie_hall,
};
use sea_orm::ActiveEnum;
use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateCatalogueTables),
            Box::new(CreateCinemaTables),
            Box::new(CreateJoinTables),
        ]
    }
}

fn id_column<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn cascade_fk(
    name: &str,
    from: (impl IntoIden + 'static, impl IntoIden),
    to: (impl IntoIden + 'static, impl IntoIden),
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(from.0, from.1)
        .to(to.0, to.1)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

pub struct CreateCatalogueTables;

#[async_trait::async_trait]
impl MigrationName for CreateCatalogueTables {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_catalogue_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCatalogueTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(movie::Entity)
                    .if_not_exists()
                    .col(&mut id_column(movie::Column::Id))
                    .col(ColumnDef::new(movie::Column::Title).string_len(250).not_null())
                    .col(
                        ColumnDef::new(movie::Column::InTheaters)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(movie::Column::ReleaseDate).date().not_null())
                    .col(
                        ColumnDef::new(movie::Column::PosterUrl)
                            .string_len(500)
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(genre::Entity)
                    .if_not_exists()
                    .col(&mut id_column(genre::Column::Id))
                    .col(
                        ColumnDef::new(genre::Column::Name)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(actor::Entity)
                    .if_not_exists()
                    .col(&mut id_column(actor::Column::Id))
                    .col(ColumnDef::new(actor::Column::Name).string_len(150).not_null())
                    .col(ColumnDef::new(actor::Column::Biography).text().null())
                    .col(ColumnDef::new(actor::Column::BirthDate).date().null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(actor::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(genre::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(movie::Entity).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateCinemaTables;

#[async_trait::async_trait]
impl MigrationName for CreateCinemaTables {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_cinema_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCinemaTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(cinema::Entity)
                    .if_not_exists()
                    .col(&mut id_column(cinema::Column::Id))
                    .col(ColumnDef::new(cinema::Column::Name).string_len(150).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(cinema_offer::Entity)
                    .if_not_exists()
                    .col(&mut id_column(cinema_offer::Column::Id))
                    .col(
                        ColumnDef::new(cinema_offer::Column::CinemaId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(cinema_offer::Column::StartDate).date().not_null())
                    .col(ColumnDef::new(cinema_offer::Column::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(cinema_offer::Column::DiscountPercentage)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .foreign_key(&mut cascade_fk(
                        "fk_cinema_offers_cinema",
                        (cinema_offer::Entity, cinema_offer::Column::CinemaId),
                        (cinema::Entity, cinema::Column::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(hall::Entity)
                    .if_not_exists()
                    .col(&mut id_column(hall::Column::Id))
                    .col(ColumnDef::new(hall::Column::Price).decimal_len(9, 2).not_null())
                    .col(
                        ColumnDef::new(hall::Column::HallType)
                            .string_len(2)
                            .not_null()
                            .default(HallType::default().to_value()),
                    )
                    .col(ColumnDef::new(hall::Column::CinemaId).integer().not_null())
                    .foreign_key(&mut cascade_fk(
                        "fk_halls_cinema",
                        (hall::Entity, hall::Column::CinemaId),
                        (cinema::Entity, cinema::Column::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(hall::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(cinema_offer::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(cinema::Entity).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateJoinTables;

#[async_trait::async_trait]
impl MigrationName for CreateJoinTables {
    fn name(&self) -> &'static str {
        "m20240101_000003_create_join_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateJoinTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(movie_genre::Entity)
                    .if_not_exists()
                    .col(ColumnDef::new(movie_genre::Column::MovieId).integer().not_null())
                    .col(ColumnDef::new(movie_genre::Column::GenreId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(movie_genre::Column::MovieId)
                            .col(movie_genre::Column::GenreId),
                    )
                    .foreign_key(&mut cascade_fk(
                        "fk_movie_genres_movie",
                        (movie_genre::Entity, movie_genre::Column::MovieId),
                        (movie::Entity, movie::Column::Id),
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_movie_genres_genre",
                        (movie_genre::Entity, movie_genre::Column::GenreId),
                        (genre::Entity, genre::Column::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(movie_actor::Entity)
                    .if_not_exists()
                    .col(ColumnDef::new(movie_actor::Column::MovieId).integer().not_null())
                    .col(ColumnDef::new(movie_actor::Column::ActorId).integer().not_null())
                    .col(
                        ColumnDef::new(movie_actor::Column::Character)
                            .string_len(150)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(movie_actor::Column::BillingOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(movie_actor::Column::MovieId)
                            .col(movie_actor::Column::ActorId),
                    )
                    .foreign_key(&mut cascade_fk(
                        "fk_movie_actors_movie",
                        (movie_actor::Entity, movie_actor::Column::MovieId),
                        (movie::Entity, movie::Column::Id),
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_movie_actors_actor",
                        (movie_actor::Entity, movie_actor::Column::ActorId),
                        (actor::Entity, actor::Column::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(movie_hall::Entity)
                    .if_not_exists()
                    .col(ColumnDef::new(movie_hall::Column::MovieId).integer().not_null())
                    .col(ColumnDef::new(movie_hall::Column::HallId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(movie_hall::Column::MovieId)
                            .col(movie_hall::Column::HallId),
                    )
                    .foreign_key(&mut cascade_fk(
                        "fk_movie_halls_movie",
                        (movie_hall::Entity, movie_hall::Column::MovieId),
                        (movie::Entity, movie::Column::Id),
                    ))
                    .foreign_key(&mut cascade_fk(
                        "fk_movie_halls_hall",
                        (movie_hall::Entity, movie_hall::Column::HallId),
                        (hall::Entity, hall::Column::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(movie_hall::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(movie_actor::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(movie_genre::Entity).to_owned())
            .await?;
        Ok(())
    }
}
