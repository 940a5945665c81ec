use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pantry::{server, Config, GroceryApp, Result};

#[derive(Parser)]
#[command(name = "pantry", about = "Grocery list manager", version)]
struct Cli {
    /// Path to a config file, bypassing the discovery chain.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive console.
    Console,
    /// Run the HTTP server (default).
    Serve,
    /// Print the list and exit.
    List,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pantry=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load(),
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Console => {
            let app = GroceryApp::new(&config)?;
            pantry::console::run(&app)
        }
        Command::Serve => {
            let app = Arc::new(GroceryApp::new(&config)?);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(app, &config.server.bind_addr()))
        }
        Command::List => {
            let app = GroceryApp::new(&config)?;
            println!("{}", app.list()?);
            Ok(())
        }
    }
}
