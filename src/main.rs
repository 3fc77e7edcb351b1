use chart_relay::{app_state_from_config, build_app, run_server, AppConfig};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    if config.upstream.api_key.is_empty() {
        warn!("API_KEY is not set; every generation request will fail");
    }

    let app = build_app(app_state_from_config(&config));
    run_server(app, config.port).await;
}
