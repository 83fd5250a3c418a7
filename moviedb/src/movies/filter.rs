use chrono::NaiveDate;
use movie_models::{movie, movie_genre};
use sea_orm::sea_query::Query;
use sea_orm::{ColumnTrait, QueryFilter, Select};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query string of `GET /api/movies/filter`. Criteria are combined with AND.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct MovieFilter {
    /// Substring of the title. Empty means no title criterion.
    pub title: Option<String>,
    /// Only movies currently showing.
    #[serde(default)]
    pub in_theaters: bool,
    /// Only movies released after today (UTC).
    #[serde(default)]
    pub upcoming: bool,
    /// Only movies with this genre. `0` means no genre criterion.
    pub genre_id: Option<i32>,
}

impl MovieFilter {
    /// Narrow `select` to the movies matching this filter.
    #[must_use]
    pub fn apply(&self, mut select: Select<movie::Entity>, today: NaiveDate) -> Select<movie::Entity> {
        if let Some(title) = self.title.as_deref().filter(|title| !title.is_empty()) {
            select = select.filter(movie::Column::Title.contains(title));
        }

        if self.in_theaters {
            select = select.filter(movie::Column::InTheaters.eq(true));
        }

        if self.upcoming {
            select = select.filter(movie::Column::ReleaseDate.gt(today));
        }

        if let Some(genre_id) = self.genre_id.filter(|id| *id != 0) {
            select = select.filter(
                movie::Column::Id.in_subquery(
                    Query::select()
                        .column(movie_genre::Column::MovieId)
                        .from(movie_genre::Entity)
                        .and_where(movie_genre::Column::GenreId.eq(genre_id))
                        .to_owned(),
                ),
            );
        }

        select
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    fn sql(filter: &MovieFilter) -> String {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        filter
            .apply(movie::Entity::find(), today)
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn test_default_filter_selects_everything() {
        assert!(!sql(&MovieFilter::default()).contains("WHERE"));
    }

    #[test]
    fn test_empty_title_and_zero_genre_are_ignored() {
        let filter = MovieFilter {
            title: Some(String::new()),
            genre_id: Some(0),
            ..Default::default()
        };
        assert!(!sql(&filter).contains("WHERE"));
    }

    #[test]
    fn test_criteria_are_combined() {
        let filter = MovieFilter {
            title: Some("Spider".to_string()),
            in_theaters: true,
            upcoming: true,
            genre_id: Some(3),
        };
        let sql = sql(&filter);
        assert!(sql.contains(r#""movies"."title" LIKE '%Spider%'"#));
        assert!(sql.contains(r#""movies"."in_theaters" = "#));
        assert!(sql.contains(r#""movies"."release_date" > '2024-05-01'"#));
        assert!(sql.contains(r#""movie_genres"."genre_id" = 3"#));
        assert_eq!(sql.matches(" AND ").count(), 3);
    }
}
