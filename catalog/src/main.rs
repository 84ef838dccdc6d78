use catalog::launcher;
use clap::{Parser, Subcommand};
use docstore::{error, info};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Game item inventory catalog")]
struct Cli {
    /// Settings file, extension optional
    #[arg(long, env = "CATALOG_CONFIG", default_value = "config/settings", global = true)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the catalog over HTTP
    Serve,
    /// Populate the store with sample sellers, slots, items and listings
    Seed,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve => launcher::launch(&cli.config).await,
        Command::Seed => launcher::seed(&cli.config).await.map(|summary| info!("Seeding finished: {:?}", summary)),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
