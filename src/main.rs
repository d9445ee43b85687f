// src/main.rs
use aladdin_demo::{commands, config};
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "aladdin-demo",
    about = "Demo service with redis, elasticsearch and kubernetes integrations",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve,
    /// Report on the status of the application
    Status,
    /// Get all aladdin-demo pods
    GetPods,
    /// Index the demo document into elasticsearch
    PopulateSearch,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("aladdin_demo=info"))
                .add_directive("hyper=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings()?;

    match cli.command {
        Commands::Serve => commands::serve::run(&settings).await,
        Commands::Status => commands::status::run(&settings).await,
        Commands::GetPods => commands::get_pods::run(&settings).await,
        Commands::PopulateSearch => commands::populate::run(&settings).await,
    }
}
