use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::sampler::Deal;
use spymaster_clue::{ClueRequest, Hint, SelectionParams};

/// What the clue selector needs to produce the next round's hint.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRequest {
    /// Board words not yet revealed.
    pub board: Vec<String>,
    /// Secret words not yet revealed.
    pub secret: Vec<String>,
    /// Corpus stopwords plus every clue already given.
    pub stopwords: Vec<String>,
    pub params: SelectionParams,
}

impl RoundRequest {
    #[must_use]
    pub fn clue_request(&self) -> ClueRequest<'_> {
        ClueRequest::new(&self.board, &self.secret)
            .stopwords(&self.stopwords)
            .params(self.params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Correct,
    Wrong,
    AlreadyRevealed,
}

/// One game: the board, the secret and everything revealed so far.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Vec<String>,
    secret: Vec<String>,
    revealed: Vec<String>,
    hints: Vec<Hint>,
    revealed_this_round: usize,
    round_over: bool,
}

impl GameState {
    pub fn new(config: GameConfig, deal: Deal) -> Result<Self> {
        config.validate()?;
        if let Some(missing) = deal.secret.iter().find(|w| !deal.board.contains(w)) {
            return Err(GameError::SecretNotOnBoard(missing.clone()));
        }
        Ok(Self {
            config,
            board: deal.board,
            secret: deal.secret,
            revealed: Vec::new(),
            hints: Vec::new(),
            revealed_this_round: 0,
            round_over: false,
        })
    }

    /// Inputs for the next clue. Fails while a round is still being played.
    pub fn next_round_request(&self, stopwords: &[String]) -> Result<RoundRequest> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if !self.hints.is_empty() && !self.round_over {
            return Err(GameError::RoundInProgress);
        }

        let board = self.unrevealed(&self.board);
        let secret = self.unrevealed(&self.secret);
        let mut stopwords = stopwords.to_vec();
        stopwords.extend(self.hints.iter().map(|h| h.clue.clone()));

        Ok(RoundRequest {
            board,
            secret,
            stopwords,
            params: self.config.params_for_round(self.hints.len()),
        })
    }

    pub fn start_round(&mut self, hint: Hint) -> Result<()> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if !self.hints.is_empty() && !self.round_over {
            return Err(GameError::RoundInProgress);
        }
        log::debug!("Round {}: {}", self.hints.len() + 1, hint.announcement());
        self.hints.push(hint);
        self.revealed_this_round = 0;
        self.round_over = false;
        Ok(())
    }

    /// Flips a card. Matching is case-insensitive.
    ///
    /// The round ends after `n` reveals or on the first wrong word.
    pub fn reveal(&mut self, word: &str) -> Result<RevealOutcome> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.round_over {
            return Err(GameError::RoundOver);
        }
        let n = self.current_hint().ok_or(GameError::NoHint)?.n;
        let word = self
            .board
            .iter()
            .find(|w| w.eq_ignore_ascii_case(word))
            .cloned()
            .ok_or_else(|| GameError::NotOnBoard(word.to_string()))?;
        if self.revealed.contains(&word) {
            return Ok(RevealOutcome::AlreadyRevealed);
        }

        let correct = self.secret.contains(&word);
        self.revealed.push(word);
        self.revealed_this_round += 1;
        if self.revealed_this_round == n || !correct {
            self.round_over = true;
        }

        Ok(if correct {
            RevealOutcome::Correct
        } else {
            RevealOutcome::Wrong
        })
    }

    #[must_use]
    pub fn is_won(&self) -> bool {
        self.secret.iter().all(|w| self.revealed.contains(w))
    }

    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.round_over && self.hints.len() >= self.config.max_rounds
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.is_won() || self.is_lost()
    }

    #[must_use]
    pub fn is_round_over(&self) -> bool {
        self.round_over
    }

    /// Reveals left before the current round ends.
    #[must_use]
    pub fn remaining_in_round(&self) -> usize {
        self.current_hint()
            .map_or(0, |h| h.n.saturating_sub(self.revealed_this_round))
    }

    #[must_use]
    pub fn current_hint(&self) -> Option<&Hint> {
        self.hints.last()
    }

    /// 1-based number of the current round, 0 before the first clue.
    #[must_use]
    pub fn round(&self) -> usize {
        self.hints.len()
    }

    #[must_use]
    pub fn is_revealed(&self, word: &str) -> bool {
        self.revealed.iter().any(|w| w == word)
    }

    #[must_use]
    pub fn is_secret(&self, word: &str) -> bool {
        self.secret.iter().any(|w| w == word)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &[String] {
        &self.board
    }

    pub fn secret(&self) -> &[String] {
        &self.secret
    }

    pub fn revealed(&self) -> &[String] {
        &self.revealed
    }

    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    fn unrevealed(&self, words: &[String]) -> Vec<String> {
        words
            .iter()
            .filter(|w| !self.revealed.contains(w))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| (*w).to_string()).collect()
    }

    fn hint(clue: &str, n: usize) -> Hint {
        Hint {
            clue: clue.to_string(),
            n,
            intended_clues: Vec::new(),
            gap: 0.5,
            combined_score: 0.1,
        }
    }

    fn small_game(max_rounds: usize) -> GameState {
        let config = GameConfig {
            rows: 2,
            cols: 2,
            secrets: 2,
            max_rounds,
            ..GameConfig::default()
        };
        let deal = Deal {
            board: words(&["ICE", "FIRE", "SNOW", "SUN"]),
            secret: words(&["ICE", "SNOW"]),
        };
        GameState::new(config, deal).unwrap()
    }

    #[test]
    fn request_excludes_revealed_words_and_used_clues() {
        let mut game = small_game(3);
        let stopwords = words(&["the"]);

        let first = game.next_round_request(&stopwords).unwrap();
        assert_eq!(first.board.len(), 4);
        assert_eq!(first.stopwords, words(&["the"]));

        game.start_round(hint("cold", 1)).unwrap();
        assert_eq!(game.reveal("ice").unwrap(), RevealOutcome::Correct);
        assert!(game.is_round_over());

        let second = game.next_round_request(&stopwords).unwrap();
        assert_eq!(second.board, words(&["FIRE", "SNOW", "SUN"]));
        assert_eq!(second.secret, words(&["SNOW"]));
        assert_eq!(second.stopwords, words(&["the", "cold"]));
        assert_eq!(second.params.aggressiveness, 0.6);
    }

    #[test]
    fn final_round_request_goes_all_in() {
        let mut game = small_game(2);
        game.start_round(hint("cold", 1)).unwrap();
        game.reveal("ICE").unwrap();
        let request = game.next_round_request(&[]).unwrap();
        assert_eq!(request.params.aggressiveness, 100.0);
    }

    #[test]
    fn wrong_guess_ends_round() {
        let mut game = small_game(3);
        game.start_round(hint("winter", 2)).unwrap();
        assert_eq!(game.remaining_in_round(), 2);
        assert_eq!(game.reveal("SUN").unwrap(), RevealOutcome::Wrong);
        assert!(game.is_round_over());
        assert!(!game.is_over());
        assert!(matches!(game.reveal("ICE"), Err(GameError::RoundOver)));
    }

    #[test]
    fn repeated_reveal_is_ignored() {
        let mut game = small_game(3);
        game.start_round(hint("winter", 2)).unwrap();
        assert_eq!(game.reveal("ICE").unwrap(), RevealOutcome::Correct);
        assert_eq!(game.reveal("ice").unwrap(), RevealOutcome::AlreadyRevealed);
        assert_eq!(game.remaining_in_round(), 1);
        assert!(!game.is_round_over());
    }

    #[test]
    fn round_in_progress_blocks_next_clue() {
        let mut game = small_game(3);
        game.start_round(hint("winter", 2)).unwrap();
        assert!(matches!(
            game.next_round_request(&[]),
            Err(GameError::RoundInProgress)
        ));
        assert!(matches!(
            game.start_round(hint("frost", 1)),
            Err(GameError::RoundInProgress)
        ));
    }

    #[test]
    fn reveal_errors() {
        let mut game = small_game(3);
        assert!(matches!(game.reveal("ICE"), Err(GameError::NoHint)));
        game.start_round(hint("winter", 2)).unwrap();
        assert!(matches!(game.reveal("LAVA"), Err(GameError::NotOnBoard(_))));
    }

    #[test]
    fn winning_and_losing() {
        let mut won = small_game(3);
        won.start_round(hint("winter", 2)).unwrap();
        won.reveal("SNOW").unwrap();
        won.reveal("ICE").unwrap();
        assert!(won.is_won());
        assert!(won.is_over());
        assert!(matches!(won.next_round_request(&[]), Err(GameError::GameOver)));

        let mut lost = small_game(1);
        lost.start_round(hint("winter", 2)).unwrap();
        lost.reveal("ICE").unwrap();
        assert!(!lost.is_over());
        lost.reveal("FIRE").unwrap();
        assert!(lost.is_lost());
        assert!(!lost.is_won());
        assert!(matches!(lost.reveal("SNOW"), Err(GameError::GameOver)));
    }

    #[test]
    fn secret_must_be_on_board() {
        let deal = Deal {
            board: words(&["ICE", "FIRE"]),
            secret: words(&["SNOW"]),
        };
        let config = GameConfig {
            rows: 1,
            cols: 2,
            secrets: 1,
            ..GameConfig::default()
        };
        assert!(matches!(
            GameState::new(config, deal),
            Err(GameError::SecretNotOnBoard(_))
        ));
    }
}
