use crate::error::{ClueError, Result};
use crate::hint::Hint;
use crate::params::SelectionParams;
use ndarray::ArrayView2;
use serde::Serialize;
use spymaster_vector_store::EmbeddingStore;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Which words may be offered as clues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidates<'a> {
    /// Every vocabulary word, in row order.
    Vocabulary,
    /// Only these words, in this order. Words missing from the vocabulary
    /// are skipped.
    Words(&'a [String]),
}

/// Inputs for one round of clue selection.
#[derive(Debug, Clone)]
pub struct ClueRequest<'a> {
    pub candidates: Candidates<'a>,
    /// Loaded stoplist plus every clue already given this game.
    pub stopwords: &'a [String],
    /// Unrevealed board words.
    pub board: &'a [String],
    /// Unrevealed secret words; must be a subset of `board`.
    pub secret: &'a [String],
    pub params: SelectionParams,
}

impl<'a> ClueRequest<'a> {
    #[must_use]
    pub fn new(board: &'a [String], secret: &'a [String]) -> Self {
        Self {
            candidates: Candidates::Vocabulary,
            stopwords: &[],
            board,
            secret,
            params: SelectionParams::default(),
        }
    }

    #[must_use]
    pub fn stopwords(mut self, stopwords: &'a [String]) -> Self {
        self.stopwords = stopwords;
        self
    }

    #[must_use]
    pub fn candidates(mut self, words: &'a [String]) -> Self {
        self.candidates = Candidates::Words(words);
        self
    }

    #[must_use]
    pub fn params(mut self, params: SelectionParams) -> Self {
        self.params = params;
        self
    }
}

/// Best candidate found for one cluster size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterBest {
    pub n: usize,
    pub clue: String,
    /// `scores_sorted[n - 1] - lower_bound`.
    pub gap: f32,
    /// Highest similarity to any avoid word, floored at -1.
    pub lower_bound: f32,
    /// Similarity to each secret word, in secret order.
    pub scores: Vec<f32>,
}

/// Per-cluster-size winners for one board.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    secret: Vec<String>,
    clusters: Vec<ClusterBest>,
}

#[derive(Clone, Copy)]
struct Best {
    gap: f32,
    step: usize,
    lower_bound: f32,
}

/// Picks the clue for this round.
///
/// Equivalent to [`score_candidates`] followed by [`ScoreTable::choose`].
pub fn select_clue(store: &EmbeddingStore, request: &ClueRequest<'_>) -> Result<Hint> {
    request.params.validate()?;
    score_candidates(store, request)?.choose(&request.params)
}

/// Finds, for every cluster size `n`, the candidate with the widest gap
/// between its nth-best secret word and its closest avoid word.
///
/// A clue must never point at an avoid word, so the closest avoid word sets
/// the similarity floor every intended secret has to clear.
pub fn score_candidates(store: &EmbeddingStore, request: &ClueRequest<'_>) -> Result<ScoreTable> {
    if request.secret.is_empty() {
        return Err(ClueError::EmptySecret);
    }
    if let Some(missing) = request
        .secret
        .iter()
        .find(|word| !contains_ignore_case(request.board, word))
    {
        return Err(ClueError::SecretNotOnBoard(missing.clone()));
    }

    let avoid: Vec<&String> = request
        .board
        .iter()
        .filter(|word| !contains_ignore_case(request.secret, word))
        .collect();
    log::debug!("Avoiding {avoid:?}");

    let avoid_rows = store.rows(&store.resolve_all(&avoid));
    let good_rows = store.rows(&store.resolve_all(request.secret));

    let gathered;
    let (rows, matrix): (Vec<usize>, ArrayView2<'_, f32>) = match request.candidates {
        Candidates::Vocabulary => ((0..store.len()).collect(), store.matrix()),
        Candidates::Words(words) => {
            let rows: Vec<usize> = words
                .iter()
                .filter_map(|word| {
                    let row = store.lookup(word);
                    if row.is_none() {
                        log::debug!("Skipping candidate '{word}' outside the vocabulary");
                    }
                    row
                })
                .collect();
            gathered = store.rows(&rows);
            (rows, gathered.view())
        }
    };

    // candidates × secret and candidates × avoid inner products
    let good_scores = matrix.dot(&good_rows.t());
    let avoid_scores = (!avoid.is_empty()).then(|| matrix.dot(&avoid_rows.t()));

    let stopwords: HashSet<String> = request.stopwords.iter().map(|w| w.to_lowercase()).collect();
    let on_board: HashSet<String> = request.board.iter().map(|w| w.to_lowercase()).collect();

    let mut best: Vec<Option<Best>> = vec![None; request.secret.len()];
    let mut sorted: Vec<f32> = Vec::with_capacity(request.secret.len());
    for (step, &row) in rows.iter().enumerate() {
        let Some(clue) = store.word(row) else {
            continue;
        };
        let lower = clue.to_lowercase();
        if lower.is_empty() || stopwords.contains(&lower) || on_board.contains(&lower) {
            continue;
        }

        // Very negative similarities carry no extra meaning.
        let lower_bound = avoid_scores.as_ref().map_or(-1.0, |scores| {
            scores.row(step).fold(-1.0f32, |acc, &v| acc.max(v))
        });

        sorted.clear();
        sorted.extend(good_scores.row(step).iter().copied());
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

        for (j, &score) in sorted.iter().enumerate() {
            let gap = score - lower_bound;
            if best[j].map_or(true, |b| gap > b.gap) {
                best[j] = Some(Best {
                    gap,
                    step,
                    lower_bound,
                });
            }
        }
    }

    let clusters: Vec<ClusterBest> = best
        .into_iter()
        .enumerate()
        .filter_map(|(j, best)| {
            let best = best?;
            Some(ClusterBest {
                n: j + 1,
                clue: store.word(rows[best.step]).unwrap_or_default().to_string(),
                gap: best.gap,
                lower_bound: best.lower_bound,
                scores: good_scores.row(best.step).to_vec(),
            })
        })
        .collect();

    if clusters.is_empty() {
        return Err(ClueError::ExhaustedCandidates);
    }

    Ok(ScoreTable {
        secret: request.secret.to_vec(),
        clusters,
    })
}

fn contains_ignore_case(words: &[String], word: &str) -> bool {
    words.iter().any(|w| w.eq_ignore_ascii_case(word))
}

impl ScoreTable {
    /// Winners ordered by cluster size, `n = 1` first.
    #[must_use]
    pub fn clusters(&self) -> &[ClusterBest] {
        &self.clusters
    }

    /// Secret words in the order of [`ClusterBest::scores`].
    #[must_use]
    pub fn secret(&self) -> &[String] {
        &self.secret
    }

    #[must_use]
    pub fn cluster(&self, n: usize) -> Option<&ClusterBest> {
        self.clusters.iter().find(|c| c.n == n)
    }

    /// Scores every cluster size with `gap * (n^aggressiveness - shift)` and
    /// returns the best. Ties go to the smaller `n`.
    pub fn choose(&self, params: &SelectionParams) -> Result<Hint> {
        params.validate()?;

        let mut chosen: Option<(&ClusterBest, f64)> = None;
        for cluster in &self.clusters {
            let combined = f64::from(cluster.gap) * params.cluster_weight(cluster.n);
            log::debug!(
                "N: {}, Gap: {:.4}, Clue: {}, Lb: {:.4}, Combined Score: {:.4}",
                cluster.n,
                cluster.gap,
                cluster.clue,
                cluster.lower_bound,
                combined
            );
            if combined.is_nan() {
                continue;
            }
            if chosen.map_or(true, |(_, best)| combined > best) {
                chosen = Some((cluster, combined));
            }
        }

        let (cluster, combined_score) = chosen.ok_or(ClueError::ExhaustedCandidates)?;
        Ok(Hint {
            clue: cluster.clue.clone(),
            n: cluster.n,
            intended_clues: self.intended(cluster),
            gap: cluster.gap,
            combined_score,
        })
    }

    fn intended(&self, cluster: &ClusterBest) -> Vec<String> {
        let mut order: Vec<usize> = (0..cluster.scores.len()).collect();
        order.sort_by(|&a, &b| {
            cluster.scores[b]
                .partial_cmp(&cluster.scores[a])
                .unwrap_or(Ordering::Equal)
        });
        order
            .into_iter()
            .take(cluster.n)
            .map(|i| self.secret[i].clone())
            .collect()
    }
}
