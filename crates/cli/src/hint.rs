use crate::{print_stdout, report};
use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use serde_json::json;
use spymaster_clue::{rank_guesses, score_candidates, ClueRequest, SelectionParams};
use spymaster_game::GameConfig;
use spymaster_vector_store::Corpus;
use std::path::Path;

#[derive(Args)]
pub(crate) struct HintArgs {
    /// Unrevealed board words, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    board: Vec<String>,

    /// Board words the guesser should find
    #[arg(long, value_delimiter = ',', required = true)]
    secret: Vec<String>,

    /// Clues already given this game; never repeated
    #[arg(long, value_delimiter = ',')]
    used: Vec<String>,

    /// Override the configured aggressiveness
    #[arg(long)]
    aggressiveness: Option<f64>,

    /// Override the configured shift
    #[arg(long)]
    shift: Option<f64>,

    /// Show the best clue for every cluster size and how the board ranks
    #[arg(long)]
    explain: bool,

    /// Output as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn normalize(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_uppercase())
        .filter(|w| !w.is_empty())
        .collect()
}

pub(crate) async fn run(args: HintArgs, corpus_dir: &Path, config: &GameConfig) -> Result<()> {
    let corpus = Corpus::load(corpus_dir)
        .await
        .with_context(|| format!("Failed to load corpus from {}", corpus_dir.display()))?;

    let board = normalize(&args.board);
    let secret = normalize(&args.secret);
    let mut stopwords = corpus.stopwords.clone();
    stopwords.extend(args.used.iter().map(|w| w.trim().to_lowercase()));
    let params = SelectionParams::new(args.aggressiveness.unwrap_or(config.aggressiveness))
        .with_shift(args.shift.unwrap_or(config.shift));

    let request = ClueRequest::new(&board, &secret)
        .stopwords(&stopwords)
        .params(params);
    params.validate()?;
    let table = score_candidates(&corpus.store, &request)?;
    let hint = table.choose(&params)?;

    let guesses = if args.explain {
        rank_guesses(&corpus.store, &hint.clue, &board)?
    } else {
        Vec::new()
    };

    if args.json {
        let body = if args.explain {
            json!({
                "hint": hint,
                "clusters": table.clusters(),
                "guesses": guesses
                    .iter()
                    .map(|(word, score)| json!({ "word": word, "score": score }))
                    .collect::<Vec<_>>(),
            })
        } else {
            serde_json::to_value(&hint)?
        };
        return print_stdout(&serde_json::to_string_pretty(&body)?);
    }

    print_stdout(&hint.announcement())?;
    print_stdout(&format!("Intended: {}", hint.intended_clues.join(", ")))?;
    if args.explain {
        print_stdout(&report::explain(&table, &params, &hint, &guesses))?;
    }
    Ok(())
}
