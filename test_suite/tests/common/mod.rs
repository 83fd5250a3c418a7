use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use moviedb::{Config, seed};
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::Value;
use tower::ServiceExt;

// Ids assigned by the demo catalogue, in insertion order.
#[allow(dead_code)]
pub mod ids {
    pub const ACTION: i32 = 1;
    pub const ANIMATION: i32 = 2;
    pub const COMEDY: i32 = 3;
    pub const SCIENCE_FICTION: i32 = 4;
    pub const DRAMA: i32 = 5;

    pub const TOM_HOLLAND: i32 = 1;
    pub const SAMUEL_L_JACKSON: i32 = 2;
    pub const ROBERT_DOWNEY_JR: i32 = 3;
    pub const SCARLETT_JOHANSSON: i32 = 7;

    pub const AGORA_MALL: i32 = 1;
    pub const SAMBIL: i32 = 2;
    pub const MEGACENTRO: i32 = 3;

    pub const AGORA_2D_HALL: i32 = 1;
    pub const AGORA_3D_HALL: i32 = 2;
    pub const SAMBIL_2D_HALL: i32 = 3;
    pub const MEGACENTRO_2D_HALL: i32 = 5;

    pub const ENDGAME: i32 = 1;
    pub const FAR_FROM_HOME: i32 = 2;
    pub const NO_WAY_HOME: i32 = 3;
    pub const MOANA: i32 = 4;
    pub const MATRIX_RESURRECTIONS: i32 = 5;
}

fn get_test_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

/// Fresh migrated database with no rows.
#[allow(dead_code)]
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let config = Config {
        database_url: get_test_database_url(),
        ..Config::default()
    };
    moviedb::connect(&config).await
}

/// Fresh database holding the demo catalogue.
#[allow(dead_code)]
pub async fn setup_seeded_db() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    seed::seed_demo_data(&db).await?;
    Ok(db)
}

#[allow(dead_code)]
pub fn setup_test_app(db: DatabaseConnection) -> Router {
    moviedb::router(db)
}

#[allow(dead_code)]
pub async fn seeded_app() -> Router {
    let db = setup_seeded_db()
        .await
        .expect("Failed to setup test database");
    setup_test_app(db)
}

/// Send a request and return the status, headers and body. The body is `Null`
/// when empty and a JSON string when it is not JSON.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, headers, json)
}

#[allow(dead_code)]
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, json) = send(app, "GET", uri, None).await;
    (status, json)
}

/// Names of the objects in a JSON array, in order.
#[allow(dead_code)]
pub fn names(items: &Value, key: &str) -> Vec<String> {
    items
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|item| item[key].as_str().unwrap().to_string())
        .collect()
}
