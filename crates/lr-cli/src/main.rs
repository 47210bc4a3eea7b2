//! CLI frontend for the Lenormand reader.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use lr_reading::TemplateStyle;
use tracing_subscriber::EnvFilter;

use crate::commands::Options;

#[derive(Parser)]
#[command(
    name = "lr",
    about = "Lenormand reader: draw spreads, compose prompts, produce readings",
    version,
    propagate_version = true
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding cards.json, spreads.json and lenormand_notes.txt
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Prompt template style: basic or structured
    #[arg(long, global = true, value_parser = parse_template)]
    template: Option<TemplateStyle>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available spreads
    Spreads,

    /// List the cards of the deck
    Cards,

    /// Draw cards for a spread
    Draw {
        /// Spread id (e.g. past_present_future)
        spread: String,

        /// RNG seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Draw cards and print the prompt that would be sent to the reader
    Prompt {
        /// Spread id
        spread: String,

        /// The question to ask
        #[arg(short, long)]
        question: String,

        /// Topic of the question (e.g. love, career)
        #[arg(short, long)]
        category: Option<String>,

        /// RNG seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Produce a full reading
    Read {
        /// Spread id
        spread: String,

        /// The question to ask
        #[arg(short, long)]
        question: String,

        /// Topic of the question (e.g. love, career)
        #[arg(short, long)]
        category: Option<String>,

        /// RNG seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_template(s: &str) -> Result<TemplateStyle, String> {
    TemplateStyle::parse(s).ok_or_else(|| format!("unknown template style \"{s}\""))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = Options {
        config: cli.config,
        data_dir: cli.data_dir,
        template: cli.template,
    };

    let result = match cli.command {
        Commands::Spreads => commands::spreads::run(&options),
        Commands::Cards => commands::cards::run(&options),
        Commands::Draw { spread, seed } => commands::draw::run(&options, &spread, seed),
        Commands::Prompt {
            spread,
            question,
            category,
            seed,
        } => commands::prompt::run(&options, &spread, &question, category, seed),
        Commands::Read {
            spread,
            question,
            category,
            seed,
            json,
        } => commands::read::run(&options, &spread, &question, category, seed, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
