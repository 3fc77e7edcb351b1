pub mod api;
pub mod chart;
pub mod client;
pub mod config;
pub mod diagram;
pub mod prompt;
pub mod session;
pub mod upstream;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::post,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub use chart::ChartType;
pub use config::AppConfig;
pub use upstream::UpstreamConfig;

/// Largest request body the relay accepts.
pub const BODY_LIMIT_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamConfig,
    pub cors_origin: Option<String>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(upstream: UpstreamConfig, cors_origin: Option<String>) -> Self {
        Self {
            upstream,
            cors_origin,
            http: reqwest::Client::new(),
        }
    }
}

pub fn app_state_from_config(config: &AppConfig) -> Arc<AppState> {
    Arc::new(AppState::new(
        config.upstream.clone(),
        config.cors_origin.clone(),
    ))
}

pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = state.cors_origin.as_deref().and_then(cors_layer);

    let mut app = Router::new()
        .route("/generate-chart", post(api::generate_chart))
        .fallback(api::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors {
        app = app.layer(cors);
    }
    app
}

fn cors_layer(origin: &str) -> Option<CorsLayer> {
    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::POST])
                .allow_headers([CONTENT_TYPE])
                .allow_credentials(true),
        ),
        Err(err) => {
            warn!(%origin, error = %err, "ignoring unusable CORS_ORIGIN");
            None
        }
    }
}

pub async fn run_server(app: Router, port: u16) {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("bind failed");

    info!("Server is running on http://localhost:{port}");
    axum::serve(listener, app).await.expect("server failed");
}
