use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "valentine-cli", version, about = "Valentine Week CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the eight days
    Days {
        #[command(subcommand)]
        action: commands::days::DaysAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Replay input against a day and print the events
    Play(commands::play::PlayArgs),
    /// Play the whole week and report the journey's mood
    Week,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("VALENTINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Days { action } => commands::days::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Play(args) => commands::play::run(args),
        Commands::Week => commands::week::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
