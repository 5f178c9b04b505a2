use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use retail_sync::modules::sync::use_cases::watch_resources::watcher::Watcher;
use retail_sync::shell::config::SyncSettings;
use retail_sync::shell::http::router;
use retail_sync::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let settings = SyncSettings::from_env()?;
    let state = AppState::from_settings(&settings);

    let handle = Watcher::start(
        settings.resources.clone(),
        Arc::new(|| tracing::info!("retail data changed, open screens should refresh")),
        settings.watcher,
        &state.context,
    );
    state.watchers.register(handle).await;

    let app = router(state.clone()).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&settings.http_addr).await?;
    tracing::info!("manual sync endpoint: http://{}/sync", settings.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.watchers.stop_all().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
