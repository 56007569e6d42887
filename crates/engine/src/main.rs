//! NPC Forge engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use npcforge_engine::api;
use npcforge_engine::infrastructure::{
    clock::SystemClock,
    config::AppConfig,
    openai::OpenAiClient,
    ports::{ClockPort, LlmPort},
    resilient_llm::{ResilientLlmClient, RetryConfig},
    sqlite::{self, SqliteCampaignRepo, SqliteNpcRepo},
};
use npcforge_engine::use_cases::npc::run_cleanup_scheduler;
use npcforge_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "npcforge_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NPC Forge engine");

    let config = AppConfig::from_env()?;
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    tracing::info!(path = %config.database_path, "Opening SQLite database");
    let pool = sqlite::connect(&config.database_path).await?;
    let npc_repo = Arc::new(SqliteNpcRepo::new(pool.clone()));
    let campaign_repo = Arc::new(SqliteCampaignRepo::new(pool));

    if config.llm.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; NPC generation will fail until it is configured");
    }
    let openai = Arc::new(OpenAiClient::new(&config.llm));
    let retry_config = RetryConfig::default().with_max_retries(config.llm.max_retries);
    tracing::info!(
        model = %config.llm.model,
        structured_output = config.llm.structured_output,
        max_retries = retry_config.max_retries,
        base_delay_ms = retry_config.base_delay_ms,
        "LLM client configured"
    );
    let llm: Arc<dyn LlmPort> = Arc::new(ResilientLlmClient::new(openai, retry_config));

    let app = Arc::new(App::new(npc_repo, campaign_repo, llm, clock, &config.trash));

    // Purge expired trash at start-up and then periodically
    tokio::spawn(run_cleanup_scheduler(
        app.use_cases.npc.lifecycle.clone(),
        config.trash.cleanup_interval,
    ));

    let mut router = api::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(&config.cors_allowed_origins) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    if allowed_origins.is_empty() {
        return None;
    }

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // Gateway identity headers and JSON bodies trigger CORS preflights.
        .allow_headers([
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-user-role"),
            axum::http::header::CONTENT_TYPE,
        ]);

    if allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
