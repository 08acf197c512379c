use serde::{Deserialize, Serialize};
use spymaster_clue::Hint;
use std::fmt;

/// A correctly guessed word and whether the clue was aimed at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessedWord {
    pub word: String,
    pub intended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLog {
    pub round: usize,
    pub clue: String,
    pub n: usize,
    /// Words the clue pointed at that the guesser did not find.
    pub missed: Vec<String>,
    pub guessed: Vec<GuessedWord>,
    pub mistake: Option<String>,
}

/// Post-game breakdown of what each clue was going for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    pub rounds: Vec<RoundLog>,
}

impl GameLog {
    /// Splits the reveal order back into rounds: a round consumes correct
    /// reveals until it has `n` of them, and a wrong reveal closes it.
    #[must_use]
    pub fn compile(hints: &[Hint], revealed: &[String], secret: &[String]) -> Self {
        let mut reveals = revealed.iter().peekable();
        let rounds = hints
            .iter()
            .enumerate()
            .map(|(i, hint)| {
                let mut guessed: Vec<String> = Vec::new();
                while guessed.len() != hint.n {
                    match reveals.next_if(|w| secret.contains(w)) {
                        Some(word) => guessed.push(word.clone()),
                        None => break,
                    }
                }
                let mistake = if guessed.len() == hint.n {
                    None
                } else {
                    reveals.next().cloned()
                };

                RoundLog {
                    round: i + 1,
                    clue: hint.clue.clone(),
                    n: hint.n,
                    missed: hint
                        .intended_clues
                        .iter()
                        .filter(|w| !guessed.contains(w))
                        .cloned()
                        .collect(),
                    guessed: guessed
                        .into_iter()
                        .map(|word| GuessedWord {
                            intended: hint.intended_clues.contains(&word),
                            word,
                        })
                        .collect(),
                    mistake,
                }
            })
            .collect();
        Self { rounds }
    }
}

impl fmt::Display for GameLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for round in &self.rounds {
            writeln!(
                f,
                "Round {} Clue: {} {}",
                round.round,
                round.clue.to_uppercase(),
                round.n
            )?;
            for word in &round.missed {
                writeln!(f, "  {word} (Intended clue)")?;
            }
            for guess in &round.guessed {
                let tag = if guess.intended {
                    "Guessed and Intended"
                } else {
                    "Guessed by chance"
                };
                writeln!(f, "  {} ({tag})", guess.word)?;
            }
            if let Some(mistake) = &round.mistake {
                writeln!(f, "  {mistake} (Incorrect)")?;
            }
        }
        Ok(())
    }
}
