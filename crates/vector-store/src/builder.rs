use crate::corpus::{write_corpus, CorpusManifest, CORPUS_SCHEMA_VERSION};
use crate::error::{Result, VectorStoreError};
use crate::quantize::{fit_range, quantize_matrix, FittedRange};
use crate::store::Normalization;
use ndarray::{Array2, Axis};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Options for [`CorpusBuilder`].
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub dimension: usize,
    /// Stop after this many accepted words.
    pub limit: usize,
    /// When non-empty, only these (lowercase) words are kept.
    pub allow: HashSet<String>,
    pub normalization: Normalization,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            dimension: crate::corpus::DEFAULT_DIMENSION,
            limit: 50_000,
            allow: HashSet::new(),
            normalization: Normalization::Raw,
        }
    }
}

/// Filters raw embeddings down to a game vocabulary and quantizes them.
pub struct CorpusBuilder {
    config: BuilderConfig,
    cleaner: Regex,
    seen: HashSet<String>,
    words: Vec<String>,
    values: Vec<f32>,
}

/// Quantized output of [`CorpusBuilder::finish`].
#[derive(Debug, Clone)]
pub struct BuiltCorpus {
    pub words: Vec<String>,
    pub quantized: Vec<u8>,
    pub manifest: CorpusManifest,
    pub fitted: FittedRange,
}

impl CorpusBuilder {
    pub fn new(config: BuilderConfig) -> Result<Self> {
        let cleaner = Regex::new("[^a-z0-9]")
            .map_err(|e| VectorStoreError::Schema(format!("word filter: {e}")))?;
        Ok(Self {
            config,
            cleaner,
            seen: HashSet::new(),
            words: Vec::new(),
            values: Vec::new(),
        })
    }

    /// Offers one raw embedding. Returns `true` while more words are wanted.
    pub fn push(&mut self, raw_word: &str, vector: &[f32]) -> bool {
        if self.is_full() {
            return false;
        }
        if vector.len() != self.config.dimension {
            log::warn!("Bad vector length for {raw_word:?}. Skipping");
            return true;
        }
        let Some(word) = self.clean(raw_word) else {
            return true;
        };
        if self.seen.contains(&word) {
            return true;
        }
        if !self.config.allow.is_empty() && !self.config.allow.contains(&word) {
            return true;
        }
        self.seen.insert(word.clone());
        self.words.push(word);
        self.values.extend_from_slice(vector);
        !self.is_full()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.words.len() >= self.config.limit
    }

    fn clean(&self, raw_word: &str) -> Option<String> {
        let lower = raw_word.to_lowercase();
        let word = self.cleaner.replace_all(&lower, "");
        if word.is_empty() || word.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(word.into_owned())
    }

    pub fn finish(self) -> Result<BuiltCorpus> {
        if self.words.is_empty() {
            return Err(VectorStoreError::EmptyVocabulary);
        }
        let rows = self.words.len();
        let dimension = self.config.dimension;
        let mut matrix = Array2::from_shape_vec((rows, dimension), self.values).map_err(|_| {
            VectorStoreError::InvalidDimension {
                expected: rows * dimension,
                actual: 0,
            }
        })?;
        if self.config.normalization == Normalization::UnitLength {
            for mut row in matrix.axis_iter_mut(Axis(0)) {
                let norm = row.dot(&row).sqrt();
                if norm > 0.0 {
                    row.mapv_inplace(|v| v / norm);
                }
            }
        }

        let fitted = fit_range(matrix.view())?;
        log::info!(
            "Quantizing {rows} words with alpha={:.4} (min={}, max={}, mean error {:.4})",
            fitted.alpha,
            fitted.range.min,
            fitted.range.max,
            fitted.mean_error
        );
        let quantized = quantize_matrix(matrix.view(), &fitted.range);
        let manifest = CorpusManifest {
            schema_version: CORPUS_SCHEMA_VERSION,
            dimension,
            min: fitted.range.min,
            max: fitted.range.max,
            normalization: self.config.normalization,
        };
        Ok(BuiltCorpus {
            words: self.words,
            quantized,
            manifest,
            fitted,
        })
    }
}

impl BuiltCorpus {
    pub async fn write(&self, dir: impl AsRef<Path>) -> Result<()> {
        write_corpus(dir, &self.words, &self.quantized, &self.manifest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config(limit: usize) -> BuilderConfig {
        BuilderConfig {
            dimension: 2,
            limit,
            ..BuilderConfig::default()
        }
    }

    #[test]
    fn cleans_and_deduplicates_words() {
        let mut builder = CorpusBuilder::new(config(10)).unwrap();
        builder.push("The", &[0.1, 0.2]);
        builder.push("the", &[0.3, 0.4]);
        builder.push("1999", &[0.3, 0.4]);
        builder.push("...", &[0.3, 0.4]);
        builder.push("Ice-Cream", &[0.5, 0.1]);
        builder.push("short", &[0.5]);

        let built = builder.finish().unwrap();
        assert_eq!(built.words, vec!["the".to_string(), "icecream".to_string()]);
        assert_eq!(built.quantized.len(), 4);
    }

    #[test]
    fn stops_at_limit() {
        let mut builder = CorpusBuilder::new(config(2)).unwrap();
        assert!(builder.push("a", &[0.1, 0.2]));
        assert!(!builder.push("b", &[0.3, -0.4]));
        assert!(!builder.push("c", &[0.5, 0.6]));
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn allow_list_filters_words() {
        let mut cfg = config(10);
        cfg.allow = ["ice".to_string()].into_iter().collect();
        let mut builder = CorpusBuilder::new(cfg).unwrap();
        builder.push("fire", &[0.1, 0.2]);
        builder.push("ICE", &[0.3, -0.4]);
        assert_eq!(builder.finish().unwrap().words, vec!["ice".to_string()]);
    }

    #[test]
    fn empty_builder_fails() {
        let builder = CorpusBuilder::new(config(10)).unwrap();
        assert!(matches!(
            builder.finish(),
            Err(VectorStoreError::EmptyVocabulary)
        ));
    }

    #[tokio::test]
    async fn built_corpus_loads_back() {
        let tmp = TempDir::new().unwrap();
        let mut builder = CorpusBuilder::new(config(10)).unwrap();
        builder.push("cold", &[1.0, 0.0]);
        builder.push("ice", &[0.9, 0.1]);
        builder.push("fire", &[-0.9, 0.1]);
        let built = builder.finish().unwrap();
        built.write(tmp.path()).await.unwrap();

        let corpus = Corpus::load(tmp.path()).await.unwrap();
        assert_eq!(corpus.manifest.dimension, 2);
        assert!((corpus.manifest.min - built.manifest.min).abs() < 1e-12);
        assert!((corpus.manifest.max - built.manifest.max).abs() < 1e-12);
        let store = &corpus.store;
        let cold_ice = store.inner_product(0, 1).unwrap();
        let cold_fire = store.inner_product(0, 2).unwrap();
        assert!(cold_ice > 0.7, "got {cold_ice}");
        assert!(cold_fire < -0.7, "got {cold_fire}");
    }
}
