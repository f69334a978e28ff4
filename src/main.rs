mod app;
mod config;
mod error;
mod meals;
mod session;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "dietlog=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;
    app_state.migrate().await?;
    tracing::info!(env = ?app_state.config.env, db = %app_state.config.database_url, "database ready");

    let bind = app_state.config.bind_addr();
    let app = app::build_app(app_state);
    app::serve(app, &bind).await?;

    Ok(())
}
