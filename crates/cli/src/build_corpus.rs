use crate::print_stdout;
use anyhow::{Context as AnyhowContext, Result};
use clap::Args;
use flate2::read::MultiGzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use spymaster_vector_store::{
    parse_word_list, read_glove, BuilderConfig, BuiltCorpus, CorpusBuilder, CorpusPaths,
    GloveStats, Normalization, DEFAULT_DIMENSION,
};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub(crate) struct BuildCorpusArgs {
    /// GloVe text file, optionally gzipped
    input: PathBuf,

    /// Output directory (defaults to --corpus)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Vector dimension of the input
    #[arg(long, default_value_t = DEFAULT_DIMENSION)]
    dim: usize,

    /// Keep at most this many words
    #[arg(short = 'n', long, default_value_t = 50_000)]
    limit: usize,

    /// Only keep words listed in these files
    #[arg(long)]
    filter: Vec<PathBuf>,

    /// Scale every vector to unit length before quantizing
    #[arg(long)]
    normalize: bool,

    /// Stopword list to install into the corpus
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Board word list to install into the corpus
    #[arg(long)]
    wordlist: Option<PathBuf>,
}

pub(crate) async fn run(args: BuildCorpusArgs, corpus_dir: &Path) -> Result<()> {
    let out = args.out.clone().unwrap_or_else(|| corpus_dir.to_path_buf());

    let mut allow = HashSet::new();
    for path in &args.filter {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read filter {}", path.display()))?;
        allow.extend(parse_word_list(&text).into_iter().map(|w| w.to_lowercase()));
    }
    if !args.filter.is_empty() {
        log::info!("Keeping only {} filtered words", allow.len());
    }

    let config = BuilderConfig {
        dimension: args.dim,
        limit: args.limit,
        allow,
        normalization: if args.normalize {
            Normalization::UnitLength
        } else {
            Normalization::Raw
        },
    };
    let input = args.input.clone();
    let (built, glove) = tokio::task::spawn_blocking(move || read_embeddings(&input, config))
        .await
        .context("Corpus build task failed")??;
    log::info!(
        "Read {} lines: {} vectors parsed, {} skipped",
        glove.lines,
        glove.accepted,
        glove.skipped
    );

    built
        .write(&out)
        .await
        .with_context(|| format!("Failed to write corpus to {}", out.display()))?;

    let paths = CorpusPaths::new(&out);
    if let Some(path) = &args.stopwords {
        install_word_list(path, &paths.stopwords()).await?;
    }
    if let Some(path) = &args.wordlist {
        let installed = install_word_list(path, &paths.wordlist()).await?;
        let known: HashSet<&str> = built.words.iter().map(String::as_str).collect();
        let missing: Vec<&String> = installed
            .iter()
            .filter(|w| !known.contains(w.to_lowercase().as_str()))
            .collect();
        if !missing.is_empty() {
            log::warn!(
                "{} board words have no vector and will use row 0: {missing:?}",
                missing.len()
            );
        }
    }

    print_stdout(&format!(
        "Wrote {} words to {} (min {:.6}, max {:.6}, alpha {:.4})",
        built.words.len(),
        out.display(),
        built.manifest.min,
        built.manifest.max,
        built.fitted.alpha
    ))
}

fn read_embeddings(input: &Path, config: BuilderConfig) -> Result<(BuiltCorpus, GloveStats)> {
    let file =
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let len = file.metadata()?.len();

    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40}] {bytes}/{total_bytes} {msg}",
        )?
        .progress_chars("=> "),
    );
    let source = bar.wrap_read(file);
    let gzipped = input.extension().is_some_and(|ext| ext == "gz");
    let reader: Box<dyn BufRead> = if gzipped {
        Box::new(BufReader::new(MultiGzDecoder::new(source)))
    } else {
        Box::new(BufReader::new(source))
    };

    let dimension = config.dimension;
    let mut builder = CorpusBuilder::new(config)?;
    let glove = read_glove(reader, dimension, |word, vector| builder.push(&word, &vector))?;
    bar.finish_with_message(format!("{} words", builder.len()));

    Ok((builder.finish()?, glove))
}

/// Copies a word list into the corpus, dropping blank lines.
async fn install_word_list(from: &Path, to: &Path) -> Result<Vec<String>> {
    let text = tokio::fs::read_to_string(from)
        .await
        .with_context(|| format!("Failed to read {}", from.display()))?;
    let words = parse_word_list(&text);
    let mut body = words.join("\n");
    body.push('\n');
    tokio::fs::write(to, body)
        .await
        .with_context(|| format!("Failed to write {}", to.display()))?;
    Ok(words)
}
