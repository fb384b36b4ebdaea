use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use timeline_extract::config::{ContextStrategy, DuplicatePolicy, ExtractConfig};
use timeline_extract::pipeline::Extractor;
use timeline_extract::report::build_reports;
use timeline_extract::sources::{CorpusDir, Summarizer};
use timeline_extract::summary::ExcerptSummarizer;

const OUTPUT_DIR: &str = "output";

#[derive(Parser)]
#[command(
    name = "timeline_extract",
    about = "Pull dated events out of historical text"
)]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Context strategy, overriding the settings file
    #[arg(long, global = true, value_enum)]
    strategy: Option<ContextStrategy>,

    /// Duplicate-date policy, overriding the settings file
    #[arg(long, global = true, value_enum)]
    policy: Option<DuplicatePolicy>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the date → context mapping of a text file as JSON
    Extract {
        /// Text file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Print one "date: context" line per date, oldest first
    Timeline {
        /// Text file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Context characters shown per line
        #[arg(long, default_value_t = 120)]
        width: usize,
    },
    /// Build topic reports from a corpus directory → output/<topic>.json
    Topics {
        /// Directory of .txt pages
        #[arg(long)]
        corpus: PathBuf,
        /// Attach excerpt summaries to each report
        #[arg(long)]
        summarize: bool,
        #[arg(required = true)]
        topics: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let extractor = Extractor::new(load_config(&cli)?).context("invalid settings")?;

    match &cli.command {
        Command::Extract { input } => run_extract(&extractor, input),
        Command::Timeline { input, width } => run_timeline(&extractor, input, *width),
        Command::Topics {
            corpus,
            summarize,
            topics,
        } => run_topics(&extractor, corpus, *summarize, topics),
    }
}

/// Logs go to stderr so stdout stays clean for JSON.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "timeline_extract=debug"
    } else {
        "timeline_extract=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ExtractConfig> {
    let mut config = match &cli.config {
        Some(path) => ExtractConfig::from_toml_file(path)
            .with_context(|| format!("cannot load settings from {}", path.display()))?,
        None => ExtractConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.context.strategy = strategy;
    }
    if let Some(policy) = cli.policy {
        config.duplicate_policy = policy;
    }
    Ok(config)
}

// ═══════════════════════════════════════════════════════════════════════
//  INPUT / OUTPUT HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("cannot read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("cannot read {input}"))
}

fn output_path(name: &str) -> PathBuf {
    Path::new(OUTPUT_DIR).join(name)
}

fn write_json<T: serde::Serialize>(name: &str, data: &T) -> anyhow::Result<()> {
    let path = output_path(name);
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(&path, &json).with_context(|| format!("cannot write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = json.len(), "wrote report");
    Ok(())
}

/// "Roman Empire" → "Roman_Empire.json"
fn report_file_name(topic: &str) -> String {
    let stem: String = topic
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}.json")
}

// ═══════════════════════════════════════════════════════════════════════
//  COMMANDS
// ═══════════════════════════════════════════════════════════════════════

fn run_extract(extractor: &Extractor, input: &str) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let extraction = extractor.extract(&text);
    println!("{}", serde_json::to_string_pretty(&extraction)?);
    Ok(())
}

fn run_timeline(extractor: &Extractor, input: &str, width: usize) -> anyhow::Result<()> {
    let text = read_input(input)?;
    let extraction = extractor.extract(&text);
    for entry in extraction.dates.to_date_entries() {
        println!("{}: {}", entry.date, entry.excerpt(width).replace('\n', " / "));
    }
    tracing::info!(
        dates_found = extraction.dates_found,
        raw_matches = extraction.raw_matches,
        "timeline done"
    );
    Ok(())
}

fn run_topics(
    extractor: &Extractor,
    corpus: &Path,
    summarize: bool,
    topics: &[String],
) -> anyhow::Result<()> {
    let corpus = CorpusDir::open(corpus)?;
    let summarizer = ExcerptSummarizer::default();
    let summarizer: Option<&dyn Summarizer> = summarize.then_some(&summarizer as &dyn Summarizer);

    std::fs::create_dir_all(OUTPUT_DIR)
        .with_context(|| format!("cannot create {OUTPUT_DIR}/"))?;

    let reports = build_reports(topics, &corpus, &corpus, summarizer, extractor);
    let mut failed = 0;
    for report in &reports {
        if report.is_failed() {
            failed += 1;
        }
        write_json(&report_file_name(&report.topic), report)?;
    }

    tracing::info!(
        topics = reports.len(),
        failed,
        corpus = %corpus.root().display(),
        "topics done"
    );
    Ok(())
}
