use ndarray::array;
use pretty_assertions::assert_eq;
use spymaster_clue::{rank_guesses, select_clue};
use spymaster_game::{BoardSampler, Deal, GameConfig, GameLog, GameState, RevealOutcome, Stats};
use spymaster_vector_store::{EmbeddingStore, Normalization, Vocabulary};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

fn winter_store() -> EmbeddingStore {
    EmbeddingStore::new(
        Vocabulary::new([
            "frost", "freeze", "winter", "arctic", "desert", "ice", "snow", "penguin", "fire",
            "sun",
        ]),
        array![
            [0.9f32, -0.3, 0.4],
            [0.8, -0.2, 0.0],
            [0.7, -0.3, -0.2],
            [0.3, -0.1, -0.3],
            [-0.3, 0.8, 0.1],
            [1.0, -0.1, 0.3],
            [0.9, 0.0, -0.3],
            [0.0, 0.1, -0.8],
            [-0.4, 0.9, 0.0],
            [-0.2, 0.9, 0.4],
        ],
        Normalization::Raw,
    )
    .unwrap()
}

fn config() -> GameConfig {
    GameConfig {
        rows: 1,
        cols: 5,
        secrets: 3,
        ..GameConfig::default()
    }
}

#[test]
fn guesser_following_intended_words_wins() {
    let store = winter_store();
    let stopwords = words(&["the"]);
    let deal = Deal {
        board: words(&["ICE", "FIRE", "SNOW", "SUN", "PENGUIN"]),
        secret: words(&["ICE", "SNOW", "PENGUIN"]),
    };
    let mut game = GameState::new(config(), deal).unwrap();

    while !game.is_over() {
        let request = game.next_round_request(&stopwords).unwrap();
        let hint = select_clue(&store, &request.clue_request()).unwrap();
        let intended = hint.intended_clues.clone();
        game.start_round(hint).unwrap();
        for word in &intended {
            assert_eq!(game.reveal(word).unwrap(), RevealOutcome::Correct);
        }
        assert!(game.is_round_over());
    }

    assert!(game.is_won());
    assert_eq!(game.round(), 2);
    assert_eq!(game.hints()[0].announcement(), "WINTER 2");
    assert_eq!(game.revealed()[..2].to_vec(), words(&["SNOW", "ICE"]));

    let log = GameLog::compile(game.hints(), game.revealed(), game.secret());
    assert!(log
        .rounds
        .iter()
        .all(|r| r.mistake.is_none() && r.missed.is_empty()));

    let mut stats = Stats::default();
    stats.record(&game).unwrap();
    assert_eq!(stats.guess_distribution, vec![0, 1, 0, 0, 0, 0]);
}

#[test]
fn literal_guesser_always_finishes() {
    let store = winter_store();
    let wordlist = words(&["ICE", "FIRE", "SNOW", "SUN", "PENGUIN", "DESERT", "ARCTIC"]);

    for day in 0..20 {
        let deal = BoardSampler::daily(day).deal(&wordlist, &config()).unwrap();
        let mut game = GameState::new(config(), deal).unwrap();

        while !game.is_over() {
            let request = game.next_round_request(&[]).unwrap();
            let hint = select_clue(&store, &request.clue_request()).unwrap();
            let clue = hint.clue.clone();
            game.start_round(hint).unwrap();

            let ranked = rank_guesses(&store, &clue, &request.board).unwrap();
            for (word, _) in ranked {
                if game.is_over() || game.is_round_over() {
                    break;
                }
                game.reveal(&word).unwrap();
            }
        }

        assert!(game.round() <= game.config().max_rounds);
        let mut stats = Stats::default();
        stats.record(&game).unwrap();
        assert_eq!(stats.played, 1);
    }
}
