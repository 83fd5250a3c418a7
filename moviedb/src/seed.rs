//! Sample catalogue loaded when `SEED_DEMO_DATA` is set.

use chrono::NaiveDate;
use movie_models::{
    HallType, actor, cinema, cinema_offer, genre, hall, movie, movie_actor, movie_genre, movie_hall,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, TransactionTrait,
};

struct DemoMovie {
    title: &'static str,
    in_theaters: bool,
    release_date: (i32, u32, u32),
    genres: &'static [&'static str],
    /// (cinema, hall type)
    halls: &'static [(&'static str, HallType)],
    /// (actor, character)
    cast: &'static [(&'static str, &'static str)],
}

const GENRES: &[&str] = &["Action", "Animation", "Comedy", "Science fiction", "Drama"];

/// (name, birth date)
const ACTORS: &[(&str, Option<(i32, u32, u32)>)] = &[
    ("Tom Holland", Some((1996, 6, 1))),
    ("Samuel L. Jackson", Some((1948, 12, 21))),
    ("Robert Downey Jr.", Some((1965, 4, 4))),
    ("Chris Evans", Some((1981, 6, 13))),
    ("Dwayne Johnson", Some((1972, 5, 2))),
    ("Auli'i Cravalho", Some((2000, 11, 22))),
    ("Scarlett Johansson", Some((1984, 11, 22))),
    ("Keanu Reeves", Some((1964, 9, 2))),
    ("Jessica Henwick", None),
];

/// (cinema, [(hall type, price in cents)])
const CINEMAS: &[(&str, &[(HallType, i64)])] = &[
    (
        "Agora Mall",
        &[(HallType::TwoDimensions, 22_000), (HallType::ThreeDimensions, 32_000)],
    ),
    (
        "Sambil",
        &[(HallType::TwoDimensions, 20_000), (HallType::ThreeDimensions, 29_000)],
    ),
    ("Megacentro", &[(HallType::TwoDimensions, 25_000)]),
    ("Acropolis", &[(HallType::ThreeDimensions, 33_000)]),
];

const MOVIES: &[DemoMovie] = &[
    DemoMovie {
        title: "Avengers: Endgame",
        in_theaters: true,
        release_date: (2019, 4, 26),
        genres: &["Action", "Science fiction"],
        halls: &[
            ("Agora Mall", HallType::TwoDimensions),
            ("Agora Mall", HallType::ThreeDimensions),
            ("Sambil", HallType::TwoDimensions),
        ],
        cast: &[
            ("Robert Downey Jr.", "Tony Stark"),
            ("Chris Evans", "Steve Rogers"),
            ("Scarlett Johansson", "Natasha Romanoff"),
        ],
    },
    DemoMovie {
        title: "Spider-Man: Far From Home",
        in_theaters: false,
        release_date: (2019, 7, 2),
        genres: &["Action", "Science fiction", "Comedy"],
        halls: &[],
        cast: &[
            ("Tom Holland", "Peter Parker"),
            ("Samuel L. Jackson", "Nick Fury"),
        ],
    },
    DemoMovie {
        title: "Spider-Man: No Way Home",
        in_theaters: true,
        release_date: (2021, 12, 17),
        genres: &["Action", "Science fiction", "Comedy"],
        halls: &[
            ("Sambil", HallType::ThreeDimensions),
            ("Megacentro", HallType::TwoDimensions),
            ("Acropolis", HallType::ThreeDimensions),
        ],
        cast: &[("Tom Holland", "Peter Parker")],
    },
    DemoMovie {
        title: "Moana",
        in_theaters: false,
        release_date: (2016, 11, 23),
        genres: &["Animation", "Comedy"],
        halls: &[],
        cast: &[("Auli'i Cravalho", "Moana"), ("Dwayne Johnson", "Maui")],
    },
    DemoMovie {
        title: "The Matrix Resurrections",
        in_theaters: false,
        release_date: (2031, 12, 22),
        genres: &["Science fiction", "Action", "Drama"],
        halls: &[("Agora Mall", HallType::TwoDimensions)],
        cast: &[("Keanu Reeves", "Neo"), ("Jessica Henwick", "Bugs")],
    },
];

fn date((year, month, day): (i32, u32, u32)) -> Result<NaiveDate, DbErr> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DbErr::Custom(format!("invalid demo date {year}-{month}-{day}")))
}

fn lookup<'a, T>(rows: &'a [(&str, T)], name: &str) -> Result<&'a T, DbErr> {
    rows.iter()
        .find(|(row_name, _)| *row_name == name)
        .map(|(_, row)| row)
        .ok_or_else(|| DbErr::Custom(format!("unknown demo entry {name}")))
}

/// Insert the demo catalogue unless the database already has movies.
///
/// # Errors
///
/// Propagates database errors; nothing is inserted in that case.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    if movie::Entity::find().count(db).await? > 0 {
        tracing::info!("movies already present, skipping demo data");
        return Ok(());
    }

    db.transaction::<_, (), DbErr>(|txn| Box::pin(async move { insert_demo_data(txn).await }))
        .await
        .map_err(|err| match err {
            sea_orm::TransactionError::Connection(err)
            | sea_orm::TransactionError::Transaction(err) => err,
        })?;

    tracing::info!(movies = MOVIES.len(), "demo data seeded");
    Ok(())
}

async fn insert_demo_data(txn: &DatabaseTransaction) -> Result<(), DbErr> {
    let mut genres = Vec::with_capacity(GENRES.len());
    for name in GENRES {
        let model = genre::ActiveModel {
            name: ActiveValue::Set((*name).to_string()),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        genres.push((*name, model.id));
    }

    let mut actors = Vec::with_capacity(ACTORS.len());
    for (name, birth_date) in ACTORS {
        let model = actor::ActiveModel {
            name: ActiveValue::Set((*name).to_string()),
            biography: ActiveValue::Set(None),
            birth_date: ActiveValue::Set(birth_date.map(date).transpose()?),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        actors.push((*name, model.id));
    }

    let mut halls: Vec<(&str, Vec<(HallType, i32)>)> = Vec::with_capacity(CINEMAS.len());
    for (name, cinema_halls) in CINEMAS {
        let cinema = cinema::ActiveModel {
            name: ActiveValue::Set((*name).to_string()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        let mut ids = Vec::with_capacity(cinema_halls.len());
        for (hall_type, cents) in *cinema_halls {
            let hall = hall::ActiveModel {
                price: ActiveValue::Set(Decimal::new(*cents, 2)),
                hall_type: ActiveValue::Set(*hall_type),
                cinema_id: ActiveValue::Set(cinema.id),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            ids.push((*hall_type, hall.id));
        }
        halls.push((*name, ids));

        if *name == "Agora Mall" {
            cinema_offer::ActiveModel {
                cinema_id: ActiveValue::Set(cinema.id),
                start_date: ActiveValue::Set(date((2024, 1, 1))?),
                end_date: ActiveValue::Set(date((2024, 3, 31))?),
                discount_percentage: ActiveValue::Set(Decimal::new(1000, 2)),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
    }

    for demo in MOVIES {
        let movie = movie::ActiveModel {
            title: ActiveValue::Set(demo.title.to_string()),
            in_theaters: ActiveValue::Set(demo.in_theaters),
            release_date: ActiveValue::Set(date(demo.release_date)?),
            poster_url: ActiveValue::Set(String::new()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        for name in demo.genres {
            movie_genre::ActiveModel {
                movie_id: ActiveValue::Set(movie.id),
                genre_id: ActiveValue::Set(*lookup(&genres, name)?),
            }
            .insert(txn)
            .await?;
        }

        for (cinema_name, hall_type) in demo.halls {
            let hall_id = lookup(&halls, cinema_name)?
                .iter()
                .find(|(kind, _)| kind == hall_type)
                .map(|(_, id)| *id)
                .ok_or_else(|| DbErr::Custom(format!("{cinema_name} has no such hall")))?;
            movie_hall::ActiveModel {
                movie_id: ActiveValue::Set(movie.id),
                hall_id: ActiveValue::Set(hall_id),
            }
            .insert(txn)
            .await?;
        }

        for ((name, character), order) in demo.cast.iter().zip(1..) {
            movie_actor::ActiveModel {
                movie_id: ActiveValue::Set(movie.id),
                actor_id: ActiveValue::Set(*lookup(&actors, name)?),
                character: ActiveValue::Set((*character).to_string()),
                billing_order: ActiveValue::Set(order),
            }
            .insert(txn)
            .await?;
        }
    }

    Ok(())
}
