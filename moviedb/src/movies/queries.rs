//! The loading strategies behind the movie endpoints.
//!
//! Each function shows one way of reaching a movie's related rows:
//!
//! - [`movie_detail`]: eager, one query per relation with joins and filters
//! - [`movie_projected`]: column-only selects decoded into tuples
//! - [`movie_selective`]: names and counts only
//! - [`movie_explicit`]: tracked lookup, then an explicit related load and count
//! - [`movies_lazy`]: one genre query per movie (N+1)
//! - [`movies_with_genres`]: batched many-to-many loader

use chrono::NaiveDate;
use movie_models::{actor, cinema, genre, hall, movie, movie_actor, movie_genre, movie_hall};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, JoinType, LoaderTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use std::collections::{BTreeMap, BTreeSet};

use super::dto::{
    ActorDto, ActorRole, CinemaDto, GenreCountGroup, MovieCreate, MovieDto, MovieSummary,
    MovieUpdate, SelectiveMovie, ShowingGroup, dedup_cinemas,
};
use super::filter::MovieFilter;
use crate::context::DbContext;
use crate::resources::Genre;

/// Actors born before this date are left out of the detail view.
pub const ACTOR_BIRTH_CUTOFF: NaiveDate = match NaiveDate::from_ymd_opt(1980, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

fn movie_not_found() -> DbErr {
    DbErr::RecordNotFound("movie not found".to_string())
}

/// Movie with genres (name descending), the cinemas of its halls (first
/// occurrence of each cinema) and the roles of actors born from 1980 on.
///
/// # Errors
///
/// Propagates database errors.
pub async fn movie_detail(db: &DatabaseConnection, id: i32) -> Result<Option<MovieDto>, DbErr> {
    let Some(movie) = movie::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let genres = movie
        .find_related(genre::Entity)
        .order_by_desc(genre::Column::Name)
        .all(db)
        .await?;

    let cinemas = movie
        .find_related(hall::Entity)
        .find_also_related(cinema::Entity)
        .order_by_asc(hall::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(_, cinema)| cinema.map(CinemaDto::from))
        .collect();

    let actors = movie
        .find_related(movie_actor::Entity)
        .find_also_related(actor::Entity)
        .filter(actor::Column::BirthDate.gte(ACTOR_BIRTH_CUTOFF))
        .order_by_asc(movie_actor::Column::BillingOrder)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(role, actor)| actor.map(|actor| ActorDto::from_role(role, actor)))
        .collect();

    let mut dto = MovieDto::from(movie);
    dto.genres = genres.into_iter().map(Genre::from).collect();
    dto.cinemas = dedup_cinemas(cinemas);
    dto.actors = actors;
    Ok(Some(dto))
}

/// Same shape as [`movie_detail`], read with column-only selects. Actors are
/// not filtered by birth date.
///
/// # Errors
///
/// Propagates database errors.
pub async fn movie_projected<C>(db: &C, id: i32) -> Result<Option<MovieDto>, DbErr>
where
    C: ConnectionTrait,
{
    let Some((id, title, in_theaters, release_date, poster_url)) =
        movie::Entity::find_by_id(id)
            .select_only()
            .columns([
                movie::Column::Id,
                movie::Column::Title,
                movie::Column::InTheaters,
                movie::Column::ReleaseDate,
                movie::Column::PosterUrl,
            ])
            .into_tuple::<(i32, String, bool, NaiveDate, String)>()
            .one(db)
            .await?
    else {
        return Ok(None);
    };

    let genres = genre::Entity::find()
        .select_only()
        .columns([genre::Column::Id, genre::Column::Name])
        .inner_join(movie_genre::Entity)
        .filter(movie_genre::Column::MovieId.eq(id))
        .order_by_desc(genre::Column::Name)
        .into_tuple::<(i32, String)>()
        .all(db)
        .await?
        .into_iter()
        .map(|(id, name)| Genre { id, name })
        .collect();

    let cinemas = cinema::Entity::find()
        .select_only()
        .columns([cinema::Column::Id, cinema::Column::Name])
        .inner_join(hall::Entity)
        .join(JoinType::InnerJoin, hall::Relation::MovieHalls.def())
        .filter(movie_hall::Column::MovieId.eq(id))
        .order_by_asc(hall::Column::Id)
        .into_tuple::<(i32, String)>()
        .all(db)
        .await?
        .into_iter()
        .map(|(id, name)| CinemaDto { id, name })
        .collect();

    let actors = movie_actor::Entity::find()
        .select_only()
        .column(movie_actor::Column::ActorId)
        .column(actor::Column::Name)
        .column(movie_actor::Column::Character)
        .inner_join(actor::Entity)
        .filter(movie_actor::Column::MovieId.eq(id))
        .order_by_asc(movie_actor::Column::BillingOrder)
        .into_tuple::<(i32, String, String)>()
        .all(db)
        .await?
        .into_iter()
        .map(|(id, name, character)| ActorDto {
            id,
            name,
            character,
        })
        .collect();

    Ok(Some(MovieDto {
        id,
        title,
        in_theaters,
        release_date,
        poster_url,
        genres,
        cinemas: dedup_cinemas(cinemas),
        actors,
        genre_count: None,
    }))
}

/// Title, genre names and counts, without materialising related rows.
///
/// # Errors
///
/// Propagates database errors.
pub async fn movie_selective(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<SelectiveMovie>, DbErr> {
    let Some((id, title)) = movie::Entity::find_by_id(id)
        .select_only()
        .columns([movie::Column::Id, movie::Column::Title])
        .into_tuple::<(i32, String)>()
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let genres = genre::Entity::find()
        .select_only()
        .column(genre::Column::Name)
        .inner_join(movie_genre::Entity)
        .filter(movie_genre::Column::MovieId.eq(id))
        .order_by_desc(genre::Column::Name)
        .into_tuple::<String>()
        .all(db)
        .await?;

    let actor_count = movie_actor::Entity::find()
        .filter(movie_actor::Column::MovieId.eq(id))
        .count(db)
        .await?;

    let cinema_count = hall::Entity::find()
        .select_only()
        .column(hall::Column::CinemaId)
        .distinct()
        .inner_join(movie_hall::Entity)
        .filter(movie_hall::Column::MovieId.eq(id))
        .count(db)
        .await?;

    Ok(Some(SelectiveMovie {
        id,
        title,
        genres,
        actor_count,
        cinema_count,
    }))
}

/// Tracked lookup of the movie, then a separate load of its genres and a
/// separate count. Nothing related is read for a missing movie.
///
/// # Errors
///
/// Propagates database errors.
pub async fn movie_explicit(ctx: &mut DbContext, id: i32) -> Result<Option<MovieDto>, DbErr> {
    let Some(movie) = ctx.get::<movie::Entity>(id).await? else {
        return Ok(None);
    };

    let genres = ctx
        .query_tracking(movie.find_related(genre::Entity).order_by_asc(genre::Column::Id))
        .await?;
    let genre_count = movie
        .find_related(genre::Entity)
        .count(ctx.connection())
        .await?;

    let mut dto = MovieDto::from(movie);
    dto.genres = genres.into_iter().map(Genre::from).collect();
    dto.genre_count = Some(genre_count);
    Ok(Some(dto))
}

/// Every movie with its genres, fetching the genres of each movie on its own.
///
/// # Errors
///
/// Propagates database errors.
pub async fn movies_lazy(ctx: &mut DbContext) -> Result<Vec<MovieDto>, DbErr> {
    let movies = ctx
        .query_tracking(movie::Entity::find().order_by_asc(movie::Column::Id))
        .await?;

    let mut loaded = Vec::with_capacity(movies.len());
    for movie in movies {
        let genres = ctx
            .query_tracking(movie.find_related(genre::Entity).order_by_asc(genre::Column::Id))
            .await?;
        tracing::debug!(movie_id = movie.id, genres = genres.len(), "lazy loaded genres");

        let mut dto = MovieDto::from(movie);
        dto.genres = genres.into_iter().map(Genre::from).collect();
        loaded.push(dto);
    }
    Ok(loaded)
}

/// Every movie with its genres in two queries.
///
/// # Errors
///
/// Propagates database errors.
pub async fn movies_with_genres(db: &DatabaseConnection) -> Result<Vec<MovieDto>, DbErr> {
    let movies = movie::Entity::find()
        .order_by_asc(movie::Column::Id)
        .all(db)
        .await?;
    let genres = movies
        .load_many_to_many(genre::Entity, movie_genre::Entity, db)
        .await?;

    Ok(movies
        .into_iter()
        .zip(genres)
        .map(|(movie, mut genres)| {
            genres.sort_by_key(|genre| genre.id);
            let mut dto = MovieDto::from(movie);
            dto.genres = genres.into_iter().map(Genre::from).collect();
            dto
        })
        .collect())
}

/// `GROUP BY in_theaters` with the movies of each group.
///
/// # Errors
///
/// Propagates database errors.
pub async fn grouped_by_showing(db: &DatabaseConnection) -> Result<Vec<ShowingGroup>, DbErr> {
    let counts = movie::Entity::find()
        .select_only()
        .column(movie::Column::InTheaters)
        .column_as(movie::Column::Id.count(), "count")
        .group_by(movie::Column::InTheaters)
        .order_by_asc(movie::Column::InTheaters)
        .into_tuple::<(bool, i64)>()
        .all(db)
        .await?;

    let mut groups = Vec::with_capacity(counts.len());
    for (in_theaters, count) in counts {
        let movies = movie::Entity::find()
            .filter(movie::Column::InTheaters.eq(in_theaters))
            .order_by_asc(movie::Column::Id)
            .all(db)
            .await?;
        groups.push(ShowingGroup {
            in_theaters,
            count,
            movies: movies.into_iter().map(MovieSummary::from).collect(),
        });
    }
    Ok(groups)
}

/// Movies grouped by their number of genres, fewest first.
///
/// # Errors
///
/// Propagates database errors.
pub async fn grouped_by_genre_count(
    db: &DatabaseConnection,
) -> Result<Vec<GenreCountGroup>, DbErr> {
    Ok(group_by_genre_count(movies_with_genres(db).await?))
}

fn group_by_genre_count(movies: Vec<MovieDto>) -> Vec<GenreCountGroup> {
    let mut groups: BTreeMap<usize, (Vec<String>, BTreeSet<String>)> = BTreeMap::new();
    for movie in movies {
        let (titles, genres) = groups.entry(movie.genres.len()).or_default();
        titles.push(movie.title);
        genres.extend(movie.genres.into_iter().map(|genre| genre.name));
    }

    groups
        .into_iter()
        .map(|(genre_count, (titles, genres))| GenreCountGroup {
            genre_count,
            titles,
            genres: genres.into_iter().collect(),
        })
        .collect()
}

/// Movies matching `filter`, each with its genres.
///
/// # Errors
///
/// Propagates database errors.
pub async fn filter_movies(
    db: &DatabaseConnection,
    filter: &MovieFilter,
    today: NaiveDate,
) -> Result<Vec<MovieDto>, DbErr> {
    let rows = filter
        .apply(movie::Entity::find(), today)
        .find_with_related(genre::Entity)
        .order_by_asc(movie::Column::Id)
        .order_by_asc(genre::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(movie, genres)| {
            let mut dto = MovieDto::from(movie);
            dto.genres = genres.into_iter().map(Genre::from).collect();
            dto
        })
        .collect())
}

async fn link_genres<C>(db: &C, movie_id: i32, genre_ids: &[i32]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if genre_ids.is_empty() {
        return Ok(());
    }
    movie_genre::Entity::insert_many(genre_ids.iter().map(|&genre_id| {
        movie_genre::ActiveModel {
            movie_id: ActiveValue::Set(movie_id),
            genre_id: ActiveValue::Set(genre_id),
        }
    }))
    .exec_without_returning(db)
    .await?;
    Ok(())
}

async fn link_halls<C>(db: &C, movie_id: i32, hall_ids: &[i32]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if hall_ids.is_empty() {
        return Ok(());
    }
    movie_hall::Entity::insert_many(hall_ids.iter().map(|&hall_id| movie_hall::ActiveModel {
        movie_id: ActiveValue::Set(movie_id),
        hall_id: ActiveValue::Set(hall_id),
    }))
    .exec_without_returning(db)
    .await?;
    Ok(())
}

async fn link_actors<C>(db: &C, movie_id: i32, actors: Vec<ActorRole>) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if actors.is_empty() {
        return Ok(());
    }
    movie_actor::Entity::insert_many(actors.into_iter().map(|role| movie_actor::ActiveModel {
        movie_id: ActiveValue::Set(movie_id),
        actor_id: ActiveValue::Set(role.actor_id),
        character: ActiveValue::Set(role.character.trim().to_string()),
        billing_order: ActiveValue::Set(role.order),
    }))
    .exec_without_returning(db)
    .await?;
    Ok(())
}

/// Insert a movie and its relations. Returns the new id.
///
/// # Errors
///
/// Fails with a foreign key violation when a referenced genre, hall or actor
/// does not exist.
pub async fn create_movie<C>(db: &C, payload: MovieCreate) -> Result<i32, DbErr>
where
    C: ConnectionTrait,
{
    let movie = movie::ActiveModel {
        id: ActiveValue::NotSet,
        title: ActiveValue::Set(payload.title.trim().to_string()),
        in_theaters: ActiveValue::Set(payload.in_theaters),
        release_date: ActiveValue::Set(payload.release_date),
        poster_url: ActiveValue::Set(payload.poster_url),
    }
    .insert(db)
    .await?;

    link_genres(db, movie.id, &payload.genre_ids).await?;
    link_halls(db, movie.id, &payload.hall_ids).await?;
    link_actors(db, movie.id, payload.actors).await?;
    Ok(movie.id)
}

/// Update the given fields; a present relation list replaces the current one.
///
/// # Errors
///
/// `DbErr::RecordNotFound` for an unknown id, or a foreign key violation for
/// a dangling reference.
pub async fn update_movie<C>(db: &C, id: i32, payload: MovieUpdate) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let movie = movie::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(movie_not_found)?;

    let mut active = movie.into_active_model();
    if let Some(title) = payload.title {
        active.title = ActiveValue::Set(title.trim().to_string());
    }
    if let Some(in_theaters) = payload.in_theaters {
        active.in_theaters = ActiveValue::Set(in_theaters);
    }
    if let Some(release_date) = payload.release_date {
        active.release_date = ActiveValue::Set(release_date);
    }
    if let Some(poster_url) = payload.poster_url {
        active.poster_url = ActiveValue::Set(poster_url);
    }
    if active.is_changed() {
        active.update(db).await?;
    }

    if let Some(genre_ids) = payload.genre_ids {
        movie_genre::Entity::delete_many()
            .filter(movie_genre::Column::MovieId.eq(id))
            .exec(db)
            .await?;
        link_genres(db, id, &genre_ids).await?;
    }
    if let Some(hall_ids) = payload.hall_ids {
        movie_hall::Entity::delete_many()
            .filter(movie_hall::Column::MovieId.eq(id))
            .exec(db)
            .await?;
        link_halls(db, id, &hall_ids).await?;
    }
    if let Some(actors) = payload.actors {
        movie_actor::Entity::delete_many()
            .filter(movie_actor::Column::MovieId.eq(id))
            .exec(db)
            .await?;
        link_actors(db, id, actors).await?;
    }
    Ok(())
}

/// Delete a movie; its join rows go with it.
///
/// # Errors
///
/// `DbErr::RecordNotFound` for an unknown id.
pub async fn delete_movie<C>(db: &C, id: i32) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let res = movie::Entity::delete_by_id(id).exec(db).await?;
    match res.rows_affected {
        0 => Err(movie_not_found()),
        _ => Ok(()),
    }
}
