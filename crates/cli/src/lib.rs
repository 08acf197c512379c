use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use spymaster_game::{GameConfig, Stats};
use std::io;
use std::path::{Path, PathBuf};

mod build_corpus;
mod hint;
mod play;
mod report;

#[derive(Parser)]
#[command(name = "spymaster")]
#[command(about = "Word association game where the computer gives the clues", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Corpus directory (vecs.gz, words.gz, stopwords, wordlist)
    #[arg(long, global = true, default_value = "model")]
    corpus: PathBuf,

    /// Game settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Statistics file (default: ~/.spymaster/stats.json)
    #[arg(long, global = true)]
    stats_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play(play::PlayArgs),

    /// Pick a clue for a given board
    Hint(hint::HintArgs),

    /// Build a quantized corpus from a GloVe text file
    #[command(name = "build-corpus")]
    BuildCorpus(build_corpus::BuildCorpusArgs),

    /// Show win statistics
    Stats(StatsArgs),
}

#[derive(Args)]
struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub(crate) fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

async fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .await
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

async fn run_stats(args: StatsArgs, stats_path: Option<PathBuf>, config: &GameConfig) -> Result<()> {
    let path = stats_path.context("No home directory found; pass --stats-file")?;
    let mut stats = Stats::load(&path)
        .await
        .with_context(|| format!("Failed to read stats from {}", path.display()))?;
    if stats.guess_distribution.len() < config.max_rounds {
        stats.guess_distribution.resize(config.max_rounds, 0);
    }

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&stats)?)
    } else {
        print_stdout(&report::stats(&stats))
    }
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    // keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Hint(args) => args.json,
        Commands::Stats(args) => args.json,
        _ => false,
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || json_output {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(cli.config.as_deref()).await?;
    let stats_path = cli.stats_file.clone().or_else(Stats::default_path);

    match cli.command {
        Commands::Play(args) => play::run(args, &cli.corpus, config, stats_path).await,
        Commands::Hint(args) => hint::run(args, &cli.corpus, &config).await,
        Commands::BuildCorpus(args) => build_corpus::run(args, &cli.corpus).await,
        Commands::Stats(args) => run_stats(args, stats_path, &config).await,
    }
}
