//! Server binary for pdf2quiz.
//!
//! A thin shim over the library crate: loads configuration from the
//! environment (with CLI overrides), binds the router, and serves.

use anyhow::{Context, Result};
use clap::Parser;
use pdf2quiz::serve::{router, AppState};
use pdf2quiz::QuizConfig;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pdf2quiz",
    version,
    about = "Generate interactive quizzes from uploaded PDFs using an LLM"
)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1", env = "PDF2QUIZ_HOST")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080, env = "PDF2QUIZ_PORT")]
    port: u16,

    /// Completion model override (otherwise LLM_MODEL or the default).
    #[arg(long)]
    model: Option<String>,

    /// Scratch directory override for uploads.
    #[arg(long)]
    scratch_dir: Option<String>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Collaborator credentials normally live in a .env file next to the
    // binary; absence is fine, the environment itself may carry them.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    // ── Configuration ────────────────────────────────────────────────────
    let mut config = QuizConfig::from_env().context("Incomplete configuration")?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(dir) = cli.scratch_dir {
        config.scratch_dir = dir.into();
    }

    tokio::fs::create_dir_all(&config.scratch_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create scratch directory '{}'",
                config.scratch_dir.display()
            )
        })?;

    // ── Serve ────────────────────────────────────────────────────────────
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cli.host, cli.port))?;
    let app = router(AppState::new(config));

    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
