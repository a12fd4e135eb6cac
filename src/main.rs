use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feeder::app::AppContext;
use feeder::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.config, cli.articles)?;

    match cli.command {
        Commands::List { favorites, json } => {
            commands::list_articles(&ctx, favorites, json)?;
        }
        Commands::Check => {
            commands::check_articles(&ctx)?;
        }
        Commands::Read => {
            feeder::session::run(&ctx)?;
        }
    }

    Ok(())
}
