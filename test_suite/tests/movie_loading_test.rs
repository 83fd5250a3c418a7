// Movie read endpoints: eager, projected, selective, explicit and lazy loading

use axum::http::StatusCode;

mod common;
use common::{get_json, ids, names, seeded_app};

#[tokio::test]
async fn test_detail_orders_genres_by_name_descending() {
    let app = seeded_app().await;

    let (status, movie) = get_json(&app, &format!("/api/movies/{}", ids::ENDGAME)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movie["title"], "Avengers: Endgame");
    assert_eq!(movie["in_theaters"], true);
    assert_eq!(movie["release_date"], "2019-04-26");
    assert_eq!(names(&movie["genres"], "name"), ["Science fiction", "Action"]);
    assert!(movie.get("genre_count").is_none());
}

#[tokio::test]
async fn test_detail_lists_each_cinema_once() {
    let app = seeded_app().await;

    // Endgame plays in both halls of Agora Mall and one hall of Sambil
    let (_, movie) = get_json(&app, &format!("/api/movies/{}", ids::ENDGAME)).await;
    let mut cinemas = names(&movie["cinemas"], "name");
    cinemas.sort();
    assert_eq!(cinemas, ["Agora Mall", "Sambil"]);

    let (_, movie) = get_json(&app, &format!("/api/movies/{}", ids::MOANA)).await;
    assert_eq!(movie["cinemas"], serde_json::json!([]));
}

#[tokio::test]
async fn test_detail_only_includes_actors_born_from_1980() {
    let app = seeded_app().await;

    let (_, movie) = get_json(&app, &format!("/api/movies/{}", ids::ENDGAME)).await;
    assert_eq!(
        names(&movie["actors"], "character"),
        ["Steve Rogers", "Natasha Romanoff"]
    );
    assert_eq!(movie["actors"][1]["id"], ids::SCARLETT_JOHANSSON);
    assert_eq!(movie["actors"][1]["name"], "Scarlett Johansson");

    // Keanu Reeves is born in 1964 and Jessica Henwick has no birth date
    let (_, movie) = get_json(&app, &format!("/api/movies/{}", ids::MATRIX_RESURRECTIONS)).await;
    assert_eq!(movie["actors"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_movie_is_not_found_on_every_read_endpoint() {
    let app = seeded_app().await;

    for uri in [
        "/api/movies/999",
        "/api/movies/projected/999",
        "/api/movies/selective/999",
        "/api/movies/explicit/999",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "Movie with ID '999' not found");
    }
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
    let app = seeded_app().await;
    let (status, _, _) = common::send(&app, "GET", "/api/movies/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_projected_keeps_every_actor() {
    let app = seeded_app().await;

    let (status, movie) = get_json(&app, &format!("/api/movies/projected/{}", ids::ENDGAME)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&movie["genres"], "name"), ["Science fiction", "Action"]);
    assert_eq!(
        names(&movie["actors"], "character"),
        ["Tony Stark", "Steve Rogers", "Natasha Romanoff"]
    );
    assert_eq!(movie["actors"][0]["id"], ids::ROBERT_DOWNEY_JR);

    let mut cinemas = names(&movie["cinemas"], "name");
    cinemas.sort();
    assert_eq!(cinemas, ["Agora Mall", "Sambil"]);
}

#[tokio::test]
async fn test_selective_counts_distinct_cinemas() {
    let app = seeded_app().await;

    let (status, movie) = get_json(&app, &format!("/api/movies/selective/{}", ids::ENDGAME)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movie["id"], ids::ENDGAME);
    assert_eq!(movie["title"], "Avengers: Endgame");
    assert_eq!(movie["genres"], serde_json::json!(["Science fiction", "Action"]));
    assert_eq!(movie["actor_count"], 3);
    assert_eq!(movie["cinema_count"], 2);
    assert!(movie.get("actors").is_none());

    let (_, movie) = get_json(&app, &format!("/api/movies/selective/{}", ids::FAR_FROM_HOME)).await;
    assert_eq!(movie["actor_count"], 2);
    assert_eq!(movie["cinema_count"], 0);
}

#[tokio::test]
async fn test_explicit_loads_genres_and_their_count() {
    let app = seeded_app().await;

    let (status, movie) =
        get_json(&app, &format!("/api/movies/explicit/{}", ids::FAR_FROM_HOME)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movie["genre_count"], 3);
    assert_eq!(
        names(&movie["genres"], "name"),
        ["Action", "Comedy", "Science fiction"]
    );
    assert_eq!(movie["cinemas"], serde_json::json!([]));
    assert_eq!(movie["actors"], serde_json::json!([]));
}

#[tokio::test]
async fn test_lazy_returns_every_movie_with_genres() {
    let app = seeded_app().await;

    let (status, movies) = get_json(&app, "/api/movies/lazy").await;
    assert_eq!(status, StatusCode::OK);

    let movies = movies.as_array().unwrap();
    assert_eq!(movies.len(), 5);
    assert_eq!(movies[0]["id"], ids::ENDGAME);
    assert_eq!(movies[3]["title"], "Moana");
    assert_eq!(names(&movies[3]["genres"], "name"), ["Animation", "Comedy"]);
    for movie in movies {
        assert!(!movie["genres"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_lazy_on_empty_catalogue() {
    let db = common::setup_test_db().await.unwrap();
    let app = common::setup_test_app(db);

    let (status, movies) = get_json(&app, "/api/movies/lazy").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movies, serde_json::json!([]));
}
