use std::sync::Arc;

use issm_gateway::argo::WorkflowClient;
use issm_gateway::bus::KafkaBus;
use issm_gateway::config::Config;
use issm_gateway::gateway::Gateway;
use issm_gateway::routes;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = Config::from_env()?;
    tracing::info!(
        kafka = %cfg.kafka_bootstrap(),
        argo_server = %cfg.argo_server,
        strict_intent_keys = cfg.strict_intent_keys,
        "configuration loaded"
    );

    let bus = Arc::new(KafkaBus::new(cfg.kafka_bootstrap(), cfg.publish_timeout));
    let workflows = WorkflowClient::new(cfg.argo_server.clone(), cfg.argo_timeout)?;
    let gateway = Gateway::new(bus, workflows, cfg.strict_intent_keys);

    let app = routes::router(gateway)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "intent gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
