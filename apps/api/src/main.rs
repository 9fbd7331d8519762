mod config;
mod db;
mod errors;
mod extraction;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod scoring;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scoring::hard_match::KeywordMatcher;
use crate::scoring::prompts::SEMANTIC_PROMPT_TEMPLATE;
use crate::scoring::semantic::LlmSemanticAnalyzer;
use crate::state::AppState;
use crate::store::JobStore;

#[derive(Parser)]
#[command(name = "resume-check-api", version, about = "Resume relevance scoring service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Create the database schema and exit
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::InitDb => {
            info!("Initialized the database.");
            Ok(())
        }
        Command::Serve => serve(config, JobStore::new(pool)).await,
    }
}

async fn serve(config: Config, store: JobStore) -> Result<()> {
    info!("Starting resume check API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(&config.llm)?;
    info!(
        "LLM client initialized (provider: {}, model: {})",
        llm.provider(),
        llm.model()
    );

    let prompt_template = match &config.semantic_prompt_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SEMANTIC_PROMPT_PATH '{path}'"))?,
        None => SEMANTIC_PROMPT_TEMPLATE.to_string(),
    };

    let matcher = match &config.skills_vocabulary {
        Some(vocabulary) => KeywordMatcher::new(vocabulary.clone()),
        None => KeywordMatcher::default(),
    };
    info!("Skills vocabulary: {} terms", matcher.vocabulary().len());

    let state = AppState {
        store,
        matcher: Arc::new(matcher),
        analyzer: Arc::new(LlmSemanticAnalyzer::new(llm, prompt_template)),
    };

    let app = build_router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
