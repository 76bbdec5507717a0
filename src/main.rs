use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doudizhu_llm_agent::domain::value_objects::{Infoset, Seat};
use doudizhu_llm_agent::infrastructure::bot::{AuditLog, LlmAgent};
use doudizhu_llm_agent::infrastructure::services::{
    ChatCompletionsOracle, DecisionOracle, MockOracle,
};

/// Single-turn probe for the Dou Dizhu LLM seat agent.
#[derive(Debug, Parser)]
#[command(
    name = "doudizhu-llm-agent",
    author,
    version,
    about = "Run one agent turn against an engine infoset"
)]
struct Cli {
    /// Path to the infoset JSON produced by the engine.
    #[arg(short, long, value_name = "FILE")]
    infoset: PathBuf,

    /// Acting seat: landlord, landlord_down or landlord_up.
    #[arg(short, long, value_name = "SEAT", default_value = "landlord")]
    seat: String,

    /// Canned oracle reply; skips the live endpoint.
    #[arg(long, value_name = "JSON")]
    mock_reply: Option<String>,

    /// Directory for per-game audit files.
    #[arg(long, value_name = "DIR")]
    audit_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doudizhu_llm_agent=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let seat =
        Seat::from_str(&cli.seat).ok_or_else(|| anyhow::anyhow!("unknown seat: {}", cli.seat))?;

    let raw = tokio::fs::read_to_string(&cli.infoset).await?;
    let infoset: Infoset = serde_json::from_str(&raw)?;

    let oracle: Arc<dyn DecisionOracle> = match &cli.mock_reply {
        Some(reply) => Arc::new(MockOracle::new(reply)),
        None => Arc::new(ChatCompletionsOracle::with_defaults()),
    };

    let mut agent = LlmAgent::new(seat, oracle);
    if let Some(dir) = cli.audit_dir {
        agent = agent.with_audit(AuditLog::new(dir));
    }

    let chosen = agent.act(&infoset).await?;

    let output = serde_json::json!({
        "cards": chosen,
        "display": chosen.to_string(),
    });
    println!("{output}");

    Ok(())
}
