//! # Spymaster Vector Store
//!
//! Word-embedding storage for the spymaster clue engine.
//!
//! ## Features
//!
//! - **Vocabulary lookup** with a documented row-0 fallback for unknown words
//! - **8-bit quantized corpora** dequantized with a fixed affine range
//! - **Dense inner products** over an `ndarray` matrix
//! - **Corpus building** from GloVe text files
//!
//! ## Architecture
//!
//! ```text
//! corpus dir
//!     │
//!     ├──> words.gz ──> Vocabulary (word → row)
//!     │
//!     ├──> vecs.gz ───> gunzip ──> dequantize ──> Array2<f32>
//!     │                               └─> corpus.json (min/max/dim)
//!     │
//!     └──> stopwords, wordlist
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use spymaster_vector_store::Corpus;
//!
//! #[tokio::main]
//! async fn main() -> spymaster_vector_store::Result<()> {
//!     let corpus = Corpus::load("model").await?;
//!     let store = &corpus.store;
//!
//!     let ice = store.resolve("ICE");
//!     let cold = store.resolve("cold");
//!     println!("ice·cold = {:?}", store.inner_product(ice, cold));
//!     Ok(())
//! }
//! ```

mod builder;
mod corpus;
mod error;
mod glove;
mod quantize;
mod store;
mod vocabulary;

pub use builder::{BuilderConfig, BuiltCorpus, CorpusBuilder};
pub use corpus::{
    decode_store, write_corpus, Corpus, CorpusManifest, CorpusPaths, CORPUS_SCHEMA_VERSION,
    DEFAULT_DIMENSION, MANIFEST_FILE, STOPWORDS_FILE, VECTORS_FILE, WORDLIST_FILE, WORDS_FILE,
};
pub use error::{Result, VectorStoreError};
pub use glove::{read_glove, GloveStats};
pub use quantize::{
    dequantize_matrix, fit_range, mean_relative_error, quantize_matrix, FittedRange,
    QuantizationRange, ALPHA_STEPS,
};
pub use store::{EmbeddingStore, Normalization};
pub use vocabulary::{parse_word_list, Vocabulary};
