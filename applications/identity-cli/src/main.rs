/// Diary identity - resolve logins through the local identity cache
use clap::{Parser, Subcommand};
use identity_cli::config::CliConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "diary-identity")]
#[command(about = "Resolve Diary logins through the local identity cache", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend access token
    #[arg(long, env = "DIARY_ACCESS_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more logins and print them as JSON
    Resolve {
        /// Logins to resolve
        #[arg(required = true)]
        logins: Vec<String>,
    },
    /// Forget every cached user, in memory and on disk
    Clear,
    /// Print cache entry counts
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diary_identity=info,identity_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(token) = cli.token {
        config.backend.access_token = Some(token);
    }
    config.validate()?;

    let cache = identity_cli::open_cache(&config).await?;

    match cli.command {
        Commands::Resolve { logins } => {
            let output = if let [login] = logins.as_slice() {
                serde_json::to_string_pretty(&cache.resolve_one(login).await)?
            } else {
                serde_json::to_string_pretty(&cache.resolve_many(logins).await)?
            };
            println!("{output}");
        }
        Commands::Clear => {
            cache.clear().await;
            tracing::info!("Identity cache cleared");
        }
        Commands::Stats => {
            println!("{}", serde_json::to_string_pretty(&cache.stats().await)?);
        }
    }

    cache.close().await;
    Ok(())
}
