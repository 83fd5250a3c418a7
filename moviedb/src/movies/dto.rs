use chrono::NaiveDate;
use movie_models::{actor, cinema, movie, movie_actor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::resources::Genre;
use crate::validation::{Validatable, ValidationError, ValidationErrors, validators};

const TITLE_MAX: usize = 250;
const POSTER_URL_MAX: usize = 500;
const CHARACTER_MAX: usize = 150;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CinemaDto {
    pub id: i32,
    pub name: String,
}

impl From<cinema::Model> for CinemaDto {
    fn from(model: cinema::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// An actor as cast in one movie.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActorDto {
    pub id: i32,
    pub name: String,
    pub character: String,
}

impl ActorDto {
    #[must_use]
    pub fn from_role(role: movie_actor::Model, actor: actor::Model) -> Self {
        Self {
            id: actor.id,
            name: actor.name,
            character: role.character,
        }
    }
}

/// Movie as returned by the detail, projected, explicit, lazy and filter
/// endpoints. Collections that an endpoint does not load are left empty.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    pub poster_url: String,
    pub genres: Vec<Genre>,
    pub cinemas: Vec<CinemaDto>,
    pub actors: Vec<ActorDto>,
    /// Only set by the explicit loading endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_count: Option<u64>,
}

impl From<movie::Model> for MovieDto {
    fn from(model: movie::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            in_theaters: model.in_theaters,
            release_date: model.release_date,
            poster_url: model.poster_url,
            genres: Vec::new(),
            cinemas: Vec::new(),
            actors: Vec::new(),
            genre_count: None,
        }
    }
}

/// Plain movie row, used inside groups.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MovieSummary {
    pub id: i32,
    pub title: String,
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    pub poster_url: String,
}

impl From<movie::Model> for MovieSummary {
    fn from(model: movie::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            in_theaters: model.in_theaters,
            release_date: model.release_date,
            poster_url: model.poster_url,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SelectiveMovie {
    pub id: i32,
    pub title: String,
    /// Genre names, descending.
    pub genres: Vec<String>,
    pub actor_count: u64,
    /// Distinct cinemas among the halls showing the movie.
    pub cinema_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ShowingGroup {
    pub in_theaters: bool,
    pub count: i64,
    pub movies: Vec<MovieSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GenreCountGroup {
    pub genre_count: usize,
    pub titles: Vec<String>,
    /// Distinct genre names across the group, sorted.
    pub genres: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorRole {
    pub actor_id: i32,
    pub character: String,
    /// Billing order, lowest first.
    pub order: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MovieCreate {
    pub title: String,
    #[serde(default)]
    pub in_theaters: bool,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub hall_ids: Vec<i32>,
    #[serde(default)]
    pub actors: Vec<ActorRole>,
}

/// Partial update. A present relation list replaces the current set.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MovieUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub in_theaters: Option<bool>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<i32>>,
    #[serde(default)]
    pub hall_ids: Option<Vec<i32>>,
    #[serde(default)]
    pub actors: Option<Vec<ActorRole>>,
}

fn check_title(errors: &mut ValidationErrors, title: &str) {
    errors.check(validators::validate_required("title", title));
    errors.check(validators::validate_length("title", title, None, Some(TITLE_MAX)));
}

fn check_poster_url(errors: &mut ValidationErrors, poster_url: &str) {
    errors.check(validators::validate_length(
        "poster_url",
        poster_url,
        None,
        Some(POSTER_URL_MAX),
    ));
}

fn check_relations(
    errors: &mut ValidationErrors,
    genre_ids: &[i32],
    hall_ids: &[i32],
    actors: &[ActorRole],
) {
    errors.check(validators::validate_unique("genre_ids", genre_ids.iter()));
    errors.check(validators::validate_unique("hall_ids", hall_ids.iter()));
    errors.check(validators::validate_unique(
        "actors",
        actors.iter().map(|role| role.actor_id),
    ));
    for role in actors {
        if role.character.trim().is_empty() {
            errors.add(ValidationError::new(
                "actors",
                format!("Character of actor {} is required", role.actor_id),
            ));
        }
        errors.check(validators::validate_length(
            "actors",
            &role.character,
            None,
            Some(CHARACTER_MAX),
        ));
    }
}

impl Validatable for MovieCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_title(&mut errors, &self.title);
        check_poster_url(&mut errors, &self.poster_url);
        check_relations(&mut errors, &self.genre_ids, &self.hall_ids, &self.actors);
        errors.result()
    }
}

impl Validatable for MovieUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }
        if let Some(poster_url) = &self.poster_url {
            check_poster_url(&mut errors, poster_url);
        }
        check_relations(
            &mut errors,
            self.genre_ids.as_deref().unwrap_or_default(),
            self.hall_ids.as_deref().unwrap_or_default(),
            self.actors.as_deref().unwrap_or_default(),
        );
        errors.result()
    }
}

/// Keep the first occurrence of every cinema id, preserving order.
#[must_use]
pub fn dedup_cinemas(cinemas: Vec<CinemaDto>) -> Vec<CinemaDto> {
    let mut seen = HashSet::new();
    cinemas
        .into_iter()
        .filter(|cinema| seen.insert(cinema.id))
        .collect()
}
