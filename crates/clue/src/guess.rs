use crate::error::{ClueError, Result};
use spymaster_vector_store::EmbeddingStore;
use std::cmp::Ordering;

/// Orders `choices` by similarity to `clue`, most similar first.
///
/// This is how a literal-minded guesser reads a clue, so it shows which
/// board words a hint actually points at.
pub fn rank_guesses<S: AsRef<str>>(
    store: &EmbeddingStore,
    clue: &str,
    choices: &[S],
) -> Result<Vec<(String, f32)>> {
    let clue_row = store
        .lookup(clue)
        .ok_or_else(|| ClueError::UnknownWord(clue.to_string()))?;

    let mut ranked: Vec<(String, f32)> = choices
        .iter()
        .map(|choice| {
            let choice = choice.as_ref();
            let score = store
                .inner_product(clue_row, store.resolve(choice))
                .unwrap_or(f32::NEG_INFINITY);
            (choice.to_string(), score)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    Ok(ranked)
}
