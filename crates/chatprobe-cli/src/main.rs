use anyhow::Result;
use chatprobe_cli::commands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Target the probes were authored against.
const DEFAULT_TARGET: &str = "https://finance.maiyuri.com";

#[derive(Parser)]
#[command(name = "chatprobe")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Probe a live site for a working chat widget",
    long_about = "Chatprobe drives a headless Chromium against a target site and checks, \
                  feature by feature, whether the embedded chat widget renders, opens, \
                  accepts text input, and produces a reply. Each run writes step-numbered \
                  screenshots and a JSON results file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the probe sequence against a target site
    Probe {
        /// Target URL
        #[arg(value_name = "URL", default_value = DEFAULT_TARGET)]
        url: String,

        /// Directory for screenshots and the results file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Path for the JSON results file
        #[arg(long)]
        results: Option<PathBuf>,

        /// Run with a visible browser window for debugging
        #[arg(long)]
        headful: bool,

        /// Override the Chromium binary
        #[arg(long)]
        chrome_path: Option<PathBuf>,
    },

    /// Print the pass/fail tally from a previously written results file
    Summary {
        /// Path to the results JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Probe {
            url,
            output_dir,
            results,
            headful,
            chrome_path,
        } => commands::probe::execute(&url, output_dir, results, headful, chrome_path),
        Commands::Summary { file } => commands::summary::execute(&file),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("chatprobe=debug,chatprobe_core=debug,chatprobe_browser=debug")
    } else {
        EnvFilter::new("chatprobe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
