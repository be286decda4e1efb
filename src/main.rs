use admin_panel_rust::{config, server, state::AppState, store::AdminStore};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, ADMIN_API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting admin panel API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store = match &config.api.seed_file {
        Some(path) => {
            tracing::info!("Loading seed data from {}", path);
            AdminStore::load(path)?
        }
        None => AdminStore::default(),
    };

    let state = AppState::new(store, config.security.clone(), config.navigation.clone());
    let mut app = server::app(state);
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    println!("🚀 Admin panel API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
