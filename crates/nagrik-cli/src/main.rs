//! nagrik: complaint classification service and tools.

mod display;
mod serve;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nagrik_ai::Classifier;
use nagrik_client::AnalysisClient;
use nagrik_core::{Clock, SystemClock};

#[derive(Parser)]
#[command(name = "nagrik", version)]
#[command(about = "Keyword-based complaint classification and deadline tracking")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API and the complaint change listener
    Serve(ServeArgs),
    /// Run only the change listener against the complaint store
    Listen(StoreArgs),
    /// Classify complaint text locally
    Analyze {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show keyword table sizes
    Stats,
    /// Call a running analysis API
    Remote {
        /// Base URL of the API
        #[arg(long, env = "NAGRIK_API_URL", default_value = "http://localhost:5000")]
        url: String,

        #[command(subcommand)]
        command: RemoteCommand,
    },
}

#[derive(Subcommand)]
enum RemoteCommand {
    /// Service health
    Health,
    /// Classify complaint text
    Analyze {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Classify several complaint texts, one per argument
    Batch {
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Re-classify a stored complaint
    Classify { id: String },
    /// Service statistics
    Stats,
}

#[derive(Args, Clone)]
struct StoreArgs {
    /// JSON file backing the complaint store (in-memory when unset)
    #[arg(long, env = "NAGRIK_STORE_PATH")]
    store_path: Option<PathBuf>,

    /// Run without a complaint store
    #[arg(long, env = "NAGRIK_NO_STORE")]
    no_store: bool,
}

#[derive(Args, Clone)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "NAGRIK_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to bind
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    #[command(flatten)]
    store: StoreArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("nagrik=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve::run_serve(args).await,
        Command::Listen(args) => serve::run_listen(args).await,
        Command::Analyze { text } => cmd_analyze(&text.join(" ")),
        Command::Stats => {
            print!("{}", display::keyword_summary(&Classifier::standard()));
            Ok(())
        }
        Command::Remote { url, command } => cmd_remote(AnalysisClient::new(url), command).await,
    }
}

fn cmd_analyze(text: &str) -> anyhow::Result<()> {
    let result = Classifier::standard().classify(text, SystemClock.now())?;
    print!("{}", display::classification_card(text, &result));
    Ok(())
}

async fn cmd_remote(client: AnalysisClient, command: RemoteCommand) -> anyhow::Result<()> {
    tracing::info!(url = client.base_url(), "calling analysis API");
    match command {
        RemoteCommand::Health => {
            print!("{}", display::health_lines(&client.health().await?));
        }
        RemoteCommand::Analyze { text } => {
            let text = text.join(" ");
            let resp = client.analyze(&text).await?;
            print!("{}", display::analysis_card(&text, &resp.analysis));
        }
        RemoteCommand::Batch { texts } => {
            print!("{}", display::batch_table(&client.batch_analyze(&texts).await?));
        }
        RemoteCommand::Classify { id } => {
            let resp = client.classify_complaint(&id).await?;
            println!("{}", resp.message);
            println!(
                "  {} / {} priority, due {}",
                resp.analysis.department, resp.analysis.priority, resp.analysis.deadline
            );
        }
        RemoteCommand::Stats => {
            print!("{}", display::stats_lines(&client.stats().await?));
        }
    }
    Ok(())
}
