use spymaster_clue::{ClusterBest, Hint, ScoreTable, SelectionParams};
use spymaster_game::{GameState, RevealOutcome, Stats};
use std::fmt::Write as _;

const BAR_WIDTH: u32 = 20;

/// Board grid plus the current clue.
///
/// Revealed secrets are marked `+`, revealed mistakes `x`.
pub(crate) fn board(game: &GameState) -> String {
    let config = game.config();
    let width = game.board().iter().map(String::len).max().unwrap_or(0) + 3;

    let mut out = String::new();
    let _ = writeln!(out, "Round {} / {}", game.round(), config.max_rounds);
    for row in game.board().chunks(config.cols.max(1)) {
        let mut line = String::new();
        for word in row {
            let cell = if !game.is_revealed(word) {
                format!(" {word}")
            } else if game.is_secret(word) {
                format!("+{word}")
            } else {
                format!("x{word}")
            };
            let _ = write!(line, "{cell:<width$}");
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    if let Some(hint) = game.current_hint() {
        let _ = write!(
            out,
            "Clue: {}  (remaining: {})",
            hint.announcement(),
            game.remaining_in_round()
        );
    }
    out
}

pub(crate) fn outcome(word: &str, outcome: RevealOutcome, round_over: bool) -> String {
    let mut text = match outcome {
        RevealOutcome::Correct => format!("{} is correct", word.to_uppercase()),
        RevealOutcome::Wrong => format!("{} is not one of the words", word.to_uppercase()),
        RevealOutcome::AlreadyRevealed => format!("{} is already revealed", word.to_uppercase()),
    };
    if round_over {
        text.push_str(". Round over.");
    }
    text
}

pub(crate) fn game_over(game: &GameState) -> String {
    if game.is_won() {
        "Congratulations, You Won!".to_string()
    } else {
        format!(
            "Sorry, You Lost. The words were: {}",
            game.secret().join(", ")
        )
    }
}

pub(crate) fn stats(stats: &Stats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Played:         {}", stats.played);
    let _ = writeln!(out, "Win %:          {}", stats.win_percentage());
    let _ = writeln!(out, "Current streak: {}", stats.current_streak);
    let _ = writeln!(out, "Max streak:     {}", stats.max_streak);
    let _ = write!(out, "Guess distribution:");

    let max = stats.guess_distribution.iter().copied().max().unwrap_or(0).max(1);
    for (i, &count) in stats.guess_distribution.iter().enumerate() {
        let bar = "#".repeat((count * BAR_WIDTH / max).max(1) as usize);
        let _ = write!(out, "\n{:>2} {bar} {count}", i + 1);
    }
    out
}

/// Per-`n` winners with their combined scores, then how a literal guesser
/// would rank the board for the chosen clue.
pub(crate) fn explain(
    table: &ScoreTable,
    params: &SelectionParams,
    hint: &Hint,
    guesses: &[(String, f32)],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "aggressiveness {}, shift {}",
        params.aggressiveness, params.shift
    );
    let _ = writeln!(
        out,
        "{:>3}  {:<16} {:>8} {:>8} {:>9}",
        "n", "clue", "gap", "lb", "combined"
    );
    for ClusterBest {
        n,
        clue,
        gap,
        lower_bound,
        ..
    } in table.clusters()
    {
        let combined = f64::from(*gap) * params.cluster_weight(*n);
        let marker = if *n == hint.n { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{n:>3}{marker} {clue:<16} {gap:>8.4} {lower_bound:>8.4} {combined:>9.4}"
        );
    }
    let _ = write!(out, "Guesses for {}:", hint.clue.to_uppercase());
    for (word, score) in guesses {
        let tag = if hint.intended_clues.contains(word) {
            "  (intended)"
        } else if table.secret().contains(word) {
            "  (secret)"
        } else {
            ""
        };
        let _ = write!(out, "\n  {word:<16} {score:>8.4}{tag}");
    }
    out
}
