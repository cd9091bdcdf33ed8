use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use parsebench::config::{self, Config};
use parsebench::scoring::{ProgressReporter, ScoreRecord, Scorer, ScoringEvent};
use parsebench::{parse_file, DocumentLoader};

/// Document text extraction with tiered fallbacks, scored against labeled
/// ground truth
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score extraction of every sample in a DocBank-style directory
    Score {
        /// Path to the JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding ground truth, PDFs and images
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory receiving artifacts and the scores file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract one file and save its text and metadata
    Parse {
        /// File to extract
        file: PathBuf,

        /// Base name for `<NAME>.txt` and `<NAME>_meta.jsonl`
        #[arg(short, long)]
        save_name: String,

        /// Path to the JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Score {
            config,
            input,
            output,
        } => score(config.as_deref(), input, output),
        Command::Parse {
            file,
            save_name,
            config,
        } => parse(&file, &save_name, config.as_deref()),
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;

    let default_filter = if verbose {
        "parsebench=debug"
    } else {
        "parsebench=info"
    };

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn load_config(path: Option<&Path>) -> parsebench::Result<Config> {
    Ok(config::load_config_or_default(path)?)
}

fn score(
    config_path: Option<&Path>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    run_scoring(config_path, input, output).context("Scoring failed")?;
    Ok(())
}

fn run_scoring(
    config_path: Option<&Path>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> parsebench::Result<Vec<ScoreRecord>> {
    let mut config = load_config(config_path)?;
    if let Some(input) = input {
        config.scoring.input_directory = input.to_string_lossy().into_owned();
    }
    if let Some(output) = output {
        config.scoring.output_directory = output.to_string_lossy().into_owned();
    }

    Ok(Scorer::from_config(&config).run(&ConsoleProgress)?)
}

fn parse(file: &Path, save_name: &str, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;

    let header = read_header(file).with_context(|| format!("Failed to open {}", file.display()))?;
    tracing::info!("Header bytes: {:?}", String::from_utf8_lossy(&header));

    let loader = DocumentLoader::from_config(&config);
    let output = parse_file(&loader, file, save_name)
        .with_context(|| format!("Failed to save parse of {}", file.display()))?;

    println!(
        "Saved: {}, {} ({} document(s))",
        output.text_path.display(),
        output.meta_path.display(),
        output.documents
    );
    Ok(())
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(5);
    File::open(path)?.take(5).read_to_end(&mut header)?;
    Ok(header)
}

/// Prints one line per scored member, like the batch summary of a run.
struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ScoringEvent) {
        match event {
            ScoringEvent::GroupSkipped { prefix } => {
                println!("Skipping {}: no ground truth .txt file", prefix);
            }
            ScoringEvent::MemberScored {
                prefix,
                member,
                scores,
            } => {
                println!(
                    "{} {} F1 (bag-of-words): {:.3} (similarity: {:.3})",
                    prefix,
                    member.label(),
                    scores.f1,
                    scores.similarity
                );
            }
            ScoringEvent::MemberFailed {
                prefix,
                member,
                error,
            } => {
                println!("Error parsing {} for {}: {}", member.label(), prefix, error);
            }
            ScoringEvent::Finished {
                scores_path,
                groups,
            } => {
                println!(
                    "\nResults for {} group(s) saved to {}",
                    groups,
                    scores_path.display()
                );
            }
        }
    }
}
