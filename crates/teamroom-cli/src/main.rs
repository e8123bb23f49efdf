use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "teamroom", version, about = "Teamroom CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Planning poker
    Poker {
        #[command(subcommand)]
        action: commands::poker::PokerAction,
    },
    /// Retrospective method recommender
    Retro {
        #[command(subcommand)]
        action: commands::retro::RetroAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

/// Log to stderr, filtered by TEAMROOM_LOG (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("TEAMROOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Poker { action } => commands::poker::run(action),
        Commands::Retro { action } => commands::retro::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
