use moviedb::{Config, seed};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "moviedb=debug,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let db = moviedb::connect(&config).await?;

    if config.seed_demo_data {
        seed::seed_demo_data(&db).await?;
    }

    let app = moviedb::router(db);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening, API reference at /docs");
    axum::serve(listener, app).await?;
    Ok(())
}
