//! Candidacy CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use candidacy::cli::{Cli, Commands};
use candidacy::ConfigLoader;

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => candidacy::cli::commands::init::execute(args, cli.json).await,
        Commands::Job(args) => candidacy::cli::commands::job::execute(args, cli.json).await,
        Commands::Apply(args) => candidacy::cli::commands::apply::execute(args, cli.json).await,
        Commands::Application(args) => {
            candidacy::cli::commands::application::execute(args, cli.json).await
        }
    };

    if let Err(err) = result {
        candidacy::cli::handle_error(err, cli.json);
    }
}

/// Configure tracing from project config; RUST_LOG overrides the
/// configured level.
fn init_tracing() {
    let logging = ConfigLoader::load().map(|c| c.logging).unwrap_or_default();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
