use crate::error::{Result, VectorStoreError};
use crate::vocabulary::Vocabulary;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// How rows are stored. Inner products are only comparable between corpora
/// built with the same setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Rows as dequantized; inner product is the raw dot product.
    #[default]
    Raw,
    /// Rows rescaled to unit length after dequantization; inner product is
    /// cosine similarity.
    UnitLength,
}

/// Read-only word → vector table.
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    vocabulary: Vocabulary,
    matrix: Array2<f32>,
    normalization: Normalization,
}

impl EmbeddingStore {
    pub fn new(
        vocabulary: Vocabulary,
        mut matrix: Array2<f32>,
        normalization: Normalization,
    ) -> Result<Self> {
        if vocabulary.is_empty() {
            return Err(VectorStoreError::EmptyVocabulary);
        }
        if matrix.nrows() != vocabulary.len() {
            return Err(VectorStoreError::ShapeMismatch {
                rows: matrix.nrows(),
                words: vocabulary.len(),
            });
        }
        if normalization == Normalization::UnitLength {
            for mut row in matrix.axis_iter_mut(Axis(0)) {
                let norm = row.dot(&row).sqrt();
                if norm > 0.0 {
                    row.mapv_inplace(|v| v / norm);
                }
            }
        }
        Ok(Self {
            vocabulary,
            matrix,
            normalization,
        })
    }

    /// Row index of `word`, falling back to row 0 when the word is unknown.
    ///
    /// Board words are not guaranteed to be in the vocabulary. The fallback
    /// keeps clue selection running with a meaningless vector instead of
    /// failing the round; use [`Self::lookup`] to detect misses.
    #[must_use]
    pub fn resolve(&self, word: &str) -> usize {
        self.lookup(word).unwrap_or_else(|| {
            log::warn!("Can't find '{word}' in vocabulary, using row 0");
            0
        })
    }

    #[must_use]
    pub fn lookup(&self, word: &str) -> Option<usize> {
        self.vocabulary.lookup(word)
    }

    #[must_use]
    pub fn resolve_all<S: AsRef<str>>(&self, words: &[S]) -> Vec<usize> {
        words.iter().map(|w| self.resolve(w.as_ref())).collect()
    }

    #[must_use]
    pub fn vector(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.matrix.nrows()).then(|| self.matrix.row(index))
    }

    #[must_use]
    pub fn inner_product(&self, i: usize, j: usize) -> Option<f32> {
        Some(self.vector(i)?.dot(&self.vector(j)?))
    }

    /// Gathers the given rows into a new `indices.len() × dimension` matrix.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds; indices from [`Self::resolve`]
    /// are always valid.
    #[must_use]
    pub fn rows(&self, indices: &[usize]) -> Array2<f32> {
        self.matrix.select(Axis(0), indices)
    }

    #[must_use]
    pub fn matrix(&self) -> ArrayView2<'_, f32> {
        self.matrix.view()
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn word(&self, index: usize) -> Option<&str> {
        self.vocabulary.word(index)
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.matrix.ncols()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrix.nrows() == 0
    }

    #[must_use]
    pub const fn normalization(&self) -> Normalization {
        self.normalization
    }
}
