use crate::{print_stdout, report};
use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use spymaster_clue::select_clue;
use spymaster_game::{
    days_since_epoch, BoardSampler, GameConfig, GameError, GameLog, GameState, Stats,
};
use spymaster_vector_store::Corpus;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub(crate) struct PlayArgs {
    /// Deal from this seed instead of today's board
    #[arg(long, conflicts_with = "day")]
    seed: Option<u64>,

    /// Daily board number (days since 1970-01-01, UTC)
    #[arg(long)]
    day: Option<u64>,

    /// Don't record the result in the statistics file
    #[arg(long)]
    no_stats: bool,
}

pub(crate) async fn run(
    args: PlayArgs,
    corpus_dir: &Path,
    config: GameConfig,
    stats_path: Option<PathBuf>,
) -> Result<()> {
    let corpus = Corpus::load(corpus_dir)
        .await
        .with_context(|| format!("Failed to load corpus from {}", corpus_dir.display()))?;

    let mut sampler = match (args.seed, args.day) {
        (Some(seed), _) => BoardSampler::new(seed),
        (None, Some(day)) => BoardSampler::daily(day),
        (None, None) => BoardSampler::daily(days_since_epoch()),
    };
    let deal = sampler
        .deal(&corpus.wordlist, &config)
        .context("Failed to deal a board")?;
    let mut game = GameState::new(config, deal)?;

    print_stdout("Type a word to reveal it, or 'quit' to give up.")?;
    let mut lines = io::stdin().lock().lines();
    while !game.is_over() {
        if game.round() == 0 || game.is_round_over() {
            let request = game.next_round_request(&corpus.stopwords)?;
            let hint = select_clue(&corpus.store, &request.clue_request())
                .context("Failed to pick a clue")?;
            game.start_round(hint)?;
            print_stdout(&report::board(&game))?;
        }

        let Some(line) = lines.next() else {
            log::info!("Input closed, abandoning game");
            return Ok(());
        };
        let line = line?;
        let word = line.trim();
        match word {
            "" => print_stdout(&report::board(&game))?,
            "quit" | "q" => return Ok(()),
            word => match game.reveal(word) {
                Ok(outcome) => {
                    print_stdout(&report::outcome(word, outcome, game.is_round_over()))?;
                    if !game.is_round_over() {
                        print_stdout(&report::board(&game))?;
                    }
                }
                Err(GameError::NotOnBoard(word)) => {
                    print_stdout(&format!("{word} is not on the board"))?;
                }
                Err(err) => return Err(err.into()),
            },
        }
    }

    print_stdout(&report::board(&game))?;
    print_stdout(&report::game_over(&game))?;
    let history = GameLog::compile(game.hints(), game.revealed(), game.secret());
    print_stdout(&history.to_string())?;

    if args.no_stats {
        return Ok(());
    }
    let Some(path) = stats_path else {
        log::warn!("No home directory found, not saving statistics");
        return Ok(());
    };
    let mut stats = Stats::load(&path)
        .await
        .with_context(|| format!("Failed to read stats from {}", path.display()))?;
    stats.record(&game)?;
    stats
        .save(&path)
        .await
        .with_context(|| format!("Failed to save stats to {}", path.display()))?;
    print_stdout(&report::stats(&stats))
}
