use sea_orm::Database;
use tracing::info;

use asirex_core::tracing::init_tracing;
use asirex_storefront::config::StorefrontConfig;
use asirex_storefront::router::build_router;
use asirex_storefront::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = StorefrontConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(20))
        .build()
        .expect("failed to build HTTP client");

    let port = config.port;
    let state = AppState::new(db, redis, http, config);

    let router = build_router(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("storefront service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
