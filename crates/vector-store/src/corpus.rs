use crate::error::{Result, VectorStoreError};
use crate::quantize::{dequantize_matrix, QuantizationRange};
use crate::store::{EmbeddingStore, Normalization};
use crate::vocabulary::{parse_word_list, Vocabulary};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const CORPUS_SCHEMA_VERSION: u32 = 1;

pub const VECTORS_FILE: &str = "vecs.gz";
pub const WORDS_FILE: &str = "words.gz";
pub const STOPWORDS_FILE: &str = "stopwords";
pub const WORDLIST_FILE: &str = "wordlist";
pub const MANIFEST_FILE: &str = "corpus.json";

/// Dimension of the published corpus.
pub const DEFAULT_DIMENSION: usize = 300;

/// Describes how `vecs.gz` was quantized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorpusManifest {
    pub schema_version: u32,
    pub dimension: usize,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub normalization: Normalization,
}

impl Default for CorpusManifest {
    fn default() -> Self {
        Self {
            schema_version: CORPUS_SCHEMA_VERSION,
            dimension: DEFAULT_DIMENSION,
            min: QuantizationRange::PUBLISHED.min,
            max: QuantizationRange::PUBLISHED.max,
            normalization: Normalization::Raw,
        }
    }
}

impl CorpusManifest {
    pub fn range(&self) -> Result<QuantizationRange> {
        QuantizationRange::new(self.min, self.max)
    }

    fn validate(&self) -> Result<()> {
        if self.schema_version != CORPUS_SCHEMA_VERSION {
            return Err(VectorStoreError::Schema(format!(
                "Unsupported corpus schema_version {} (expected {CORPUS_SCHEMA_VERSION})",
                self.schema_version
            )));
        }
        if self.dimension == 0 {
            return Err(VectorStoreError::Schema(
                "corpus dimension must be > 0".to_string(),
            ));
        }
        self.range().map(|_| ())
    }
}

/// File locations inside a corpus directory.
#[derive(Debug, Clone)]
pub struct CorpusPaths {
    root: PathBuf,
}

impl CorpusPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn vectors(&self) -> PathBuf {
        self.root.join(VECTORS_FILE)
    }

    #[must_use]
    pub fn words(&self) -> PathBuf {
        self.root.join(WORDS_FILE)
    }

    #[must_use]
    pub fn stopwords(&self) -> PathBuf {
        self.root.join(STOPWORDS_FILE)
    }

    #[must_use]
    pub fn wordlist(&self) -> PathBuf {
        self.root.join(WORDLIST_FILE)
    }

    #[must_use]
    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }
}

/// Everything the game needs from a corpus directory.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub store: EmbeddingStore,
    pub stopwords: Vec<String>,
    pub wordlist: Vec<String>,
    pub manifest: CorpusManifest,
}

impl Corpus {
    /// Loads a corpus directory.
    ///
    /// `vecs.gz` and `words.gz` are required. `stopwords` and `wordlist` may
    /// be absent, in which case they are empty. A missing `corpus.json` means
    /// the published quantization constants.
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let paths = CorpusPaths::new(dir);
        log::info!("Loading corpus from {:?}", paths.root());

        let manifest = read_manifest(&paths.manifest()).await?;
        manifest.validate()?;

        let vectors_gz = tokio::fs::read(paths.vectors()).await?;
        let words_gz = tokio::fs::read(paths.words()).await?;
        let store =
            tokio::task::spawn_blocking(move || decode_store(&vectors_gz, &words_gz, &manifest))
                .await
                .map_err(|e| VectorStoreError::Join(e.to_string()))??;

        let stopwords = read_word_list(&paths.stopwords()).await?;
        let wordlist = read_word_list(&paths.wordlist()).await?;

        log::info!(
            "Loaded {} vectors (dim {}), {} stopwords, {} board words",
            store.len(),
            store.dimension(),
            stopwords.len(),
            wordlist.len()
        );

        Ok(Self {
            store,
            stopwords,
            wordlist,
            manifest,
        })
    }
}

/// Decompresses and dequantizes the vector and word blobs into a store.
pub fn decode_store(
    vectors_gz: &[u8],
    words_gz: &[u8],
    manifest: &CorpusManifest,
) -> Result<EmbeddingStore> {
    let range = manifest.range()?;
    let bytes = gunzip(vectors_gz, VECTORS_FILE)?;
    let words = gunzip(words_gz, WORDS_FILE)?;
    let words = String::from_utf8(words).map_err(|e| VectorStoreError::Decompress {
        what: WORDS_FILE.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    let vocabulary = Vocabulary::from_lines(&words);
    let matrix = dequantize_matrix(&bytes, vocabulary.len(), manifest.dimension, &range)?;
    EmbeddingStore::new(vocabulary, matrix, manifest.normalization)
}

/// Writes quantized vectors, words and the manifest into `dir`.
pub async fn write_corpus(
    dir: impl AsRef<Path>,
    words: &[String],
    quantized: &[u8],
    manifest: &CorpusManifest,
) -> Result<()> {
    let paths = CorpusPaths::new(dir);
    tokio::fs::create_dir_all(paths.root()).await?;

    let vectors_gz = gzip(quantized)?;
    let words_gz = gzip(words.join("\n").as_bytes())?;
    let manifest_json = serde_json::to_vec_pretty(manifest)?;

    write_atomic(&paths.vectors(), &vectors_gz).await?;
    write_atomic(&paths.words(), &words_gz).await?;
    write_atomic(&paths.manifest(), &manifest_json).await?;
    Ok(())
}

async fn read_manifest(path: &Path) -> Result<CorpusManifest> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No corpus manifest at {path:?}, using published constants");
            Ok(CorpusManifest::default())
        }
        Err(err) => Err(err.into()),
    }
}

async fn read_word_list(path: &Path) -> Result<Vec<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(parse_word_list(&text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Missing word list {path:?}");
            Ok(Vec::new())
        }
        Err(err) => Err(err.into()),
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn gunzip(bytes: &[u8], what: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|source| VectorStoreError::Decompress {
            what: what.to_string(),
            source,
        })?;
    Ok(out)
}

fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn manifest(dimension: usize) -> CorpusManifest {
        CorpusManifest {
            dimension,
            min: -1.0,
            max: 1.0,
            ..CorpusManifest::default()
        }
    }

    #[tokio::test]
    async fn corpus_roundtrip_and_lookup() {
        let tmp = TempDir::new().unwrap();
        let words = vec!["cold".to_string(), "ice".to_string(), "fire".to_string()];
        let range = QuantizationRange::new(-1.0, 1.0).unwrap();
        let quantized = range.quantize(&[1.0, 0.0, 0.9, 0.1, -0.9, 0.1]);
        write_corpus(tmp.path(), &words, &quantized, &manifest(2))
            .await
            .unwrap();
        tokio::fs::write(tmp.path().join(STOPWORDS_FILE), "the\n\nof\n")
            .await
            .unwrap();

        let corpus = Corpus::load(tmp.path()).await.unwrap();
        assert_eq!(corpus.store.len(), 3);
        assert_eq!(corpus.store.dimension(), 2);
        assert_eq!(corpus.stopwords, vec!["the".to_string(), "of".to_string()]);
        assert!(corpus.wordlist.is_empty());
        assert_eq!(corpus.store.lookup("fire"), Some(2));

        let cold_fire = corpus.store.inner_product(0, 2).unwrap();
        assert!((cold_fire + 0.9).abs() < 0.02, "got {cold_fire}");
    }

    #[tokio::test]
    async fn missing_manifest_uses_published_constants() {
        let tmp = TempDir::new().unwrap();
        let paths = CorpusPaths::new(tmp.path());
        tokio::fs::write(paths.vectors(), gzip(&[0u8; 2 * DEFAULT_DIMENSION]).unwrap())
            .await
            .unwrap();
        tokio::fs::write(paths.words(), gzip(b"alpha\nbeta").unwrap())
            .await
            .unwrap();

        let corpus = Corpus::load(tmp.path()).await.unwrap();
        assert_eq!(corpus.manifest, CorpusManifest::default());
        let first = corpus.store.vector(0).unwrap()[0];
        assert!((f64::from(first) - QuantizationRange::PUBLISHED.min).abs() < 1e-6);
    }

    #[tokio::test]
    async fn shape_mismatch_is_reported() {
        let tmp = TempDir::new().unwrap();
        let words = vec!["a".to_string(), "b".to_string()];
        write_corpus(tmp.path(), &words, &[0, 1, 2], &manifest(2))
            .await
            .unwrap();

        let err = Corpus::load(tmp.path()).await.unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::InvalidDimension {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[tokio::test]
    async fn corrupt_gzip_is_reported() {
        let tmp = TempDir::new().unwrap();
        let paths = CorpusPaths::new(tmp.path());
        tokio::fs::write(paths.vectors(), b"not gzip").await.unwrap();
        tokio::fs::write(paths.words(), gzip(b"a").unwrap())
            .await
            .unwrap();

        let err = Corpus::load(tmp.path()).await.unwrap_err();
        assert!(matches!(err, VectorStoreError::Decompress { .. }));
    }

    #[tokio::test]
    async fn unknown_schema_version_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let bad = CorpusManifest {
            schema_version: 9,
            ..manifest(2)
        };
        write_corpus(tmp.path(), &["a".to_string()], &[0, 0], &bad)
            .await
            .unwrap();
        let err = Corpus::load(tmp.path()).await.unwrap_err();
        assert!(matches!(err, VectorStoreError::Schema(_)));
    }
}
