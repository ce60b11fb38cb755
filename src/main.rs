use std::sync::Arc;

use rollcall::app::App;
use rollcall::config::AppConfig;
use rollcall::services::analytics::TracingAnalytics;
use rollcall::services::directory::PgDirectory;
use rollcall::services::google::GoogleIdentity;
use rollcall::{db, routes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    let app = App::new(
        Arc::new(GoogleIdentity::new(config.google.clone())),
        Arc::new(PgDirectory::new(pool)),
        Arc::new(TracingAnalytics),
        config.policy.clone(),
    );

    // Resolves the initial (signed-out) state and follows every sign-in/out.
    let _auth_listener = app.spawn_auth_listener();

    let listener = tokio::net::TcpListener::bind((config.bind_addr, config.port))
        .await
        .expect("failed to bind");

    tracing::info!(addr = %config.bind_addr, port = config.port, domain = %config.policy.domain, "rollcall listening");
    axum::serve(listener, routes::app(app)).await.expect("server failed");
}
