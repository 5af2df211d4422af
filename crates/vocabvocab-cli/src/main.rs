use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "vocabvocab-cli", version, about = "VocabVocab CLI")]
struct Cli {
    /// Vocabulary file or http(s) URL, overriding `vocabulary.source`
    #[arg(long, global = true)]
    vocab: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mark the word on screen as viewed and show the next one
    Next {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the word on screen again without recording a view
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Learning progress and streak
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Daily word target
    Target {
        #[command(subcommand)]
        action: commands::target::TargetAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let filter =
        EnvFilter::try_from_env("VOCABVOCAB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let vocab = cli.vocab.as_deref();
    let result = match cli.command {
        Commands::Next { json } => commands::study::next(vocab, json),
        Commands::Show { json } => commands::study::show(vocab, json),
        Commands::Stats { json } => commands::stats::run(vocab, json),
        Commands::Target { action } => commands::target::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
