// Application wiring: health, API reference, CORS and demo data

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use movie_models::{actor, cinema, cinema_offer, genre, hall, movie};
use moviedb::seed;
use sea_orm::{EntityTrait, PaginatorTrait};
use tower::ServiceExt;

mod common;
use common::{get_json, setup_seeded_db, setup_test_app, setup_test_db};

#[tokio::test]
async fn test_health() {
    let app = setup_test_app(setup_test_db().await.unwrap());

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_docs_describe_movie_endpoints() {
    let app = setup_test_app(setup_test_db().await.unwrap());

    let (status, body) = get_json(&app, "/docs").await;
    assert_eq!(status, StatusCode::OK);
    let html = body.as_str().unwrap();
    assert!(html.contains("/api/movies/grouped-by-genre-count"));
    assert!(html.contains("/api/movies/filter"));
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() {
    let app = setup_test_app(setup_test_db().await.unwrap());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/movies/lazy")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app(setup_test_db().await.unwrap());
    let (status, _) = get_json(&app, "/api/directors").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_demo_data_is_seeded_once() {
    let db = setup_seeded_db().await.unwrap();
    seed::seed_demo_data(&db).await.unwrap();

    assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 5);
    assert_eq!(genre::Entity::find().count(&db).await.unwrap(), 5);
    assert_eq!(actor::Entity::find().count(&db).await.unwrap(), 9);
    assert_eq!(cinema::Entity::find().count(&db).await.unwrap(), 4);
    assert_eq!(hall::Entity::find().count(&db).await.unwrap(), 6);
    assert_eq!(cinema_offer::Entity::find().count(&db).await.unwrap(), 1);
}
