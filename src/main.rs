mod api_client;
mod config;
mod models;
mod orchestrator;
mod routes;
mod selectors;
mod store;
mod transform;

use std::sync::Arc;

use api_client::ApiClient;
use config::AppConfig;
use orchestrator::Orchestrator;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<tokio::sync::Mutex<Orchestrator>>,
    config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "team_contribution_report=info".into()),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");
    let client = ApiClient::new(&config.api_base_url);

    let mut orchestrator = Orchestrator::new(client);
    orchestrator.bootstrap().await;

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        orchestrator: Arc::new(tokio::sync::Mutex::new(orchestrator)),
        config: Arc::new(config),
    };

    let app = axum::Router::new()
        .route("/", axum::routing::get(routes::report_page))
        .route(
            "/developer/{month}/{developer}",
            axum::routing::get(routes::detail_page),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Could not bind listener");
    info!(%bind_addr, "serving contribution report");
    axum::serve(listener, app)
        .await
        .expect("Could not start server");
}
