use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engine::{Bm25Params, Index, RankingMethod, SearchOptions, Tokenizer};
use searcher::{
    corpus_records, read_query_lines, read_topic_file, run_queries, CorpusFormat, RunConfig,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Cosine,
    Bm25,
}

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Rank a query batch against a corpus of short documents", long_about = None)]
struct Cli {
    /// Corpus file
    #[arg(long)]
    corpus: PathBuf,
    /// Corpus file layout
    #[arg(long, value_enum, default_value = "tsv")]
    format: CorpusFormat,
    /// Query file, one query per line
    #[arg(long)]
    queries: PathBuf,
    /// Treat the query file as a TREC topic file
    #[arg(long, default_value_t = false)]
    topics: bool,
    /// Result file
    #[arg(long)]
    output: PathBuf,
    /// Results kept per query
    #[arg(long, default_value_t = 1000)]
    k: usize,
    /// Scoring model
    #[arg(long, value_enum, default_value = "bm25")]
    method: Method,
    /// BM25 term-frequency saturation
    #[arg(long, default_value_t = 0.3)]
    k1: f64,
    /// BM25 length-normalization strength
    #[arg(long, default_value_t = 0.5)]
    b: f64,
    /// Expand each query with its first-pass results before the final run
    #[arg(long, default_value_t = false)]
    expand: bool,
    /// First-pass result count used for expansion
    #[arg(long, default_value_t = 10)]
    feedback_depth: usize,
    /// Custom stopword list, one word per line
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// Run tag written on every result line
    #[arg(long, default_value = "muRun")]
    run_tag: String,
    /// Write bare query numbers instead of MB-style ids
    #[arg(long, default_value_t = false)]
    eval: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let tokenizer = match &cli.stopwords {
        Some(path) => Tokenizer::from_stopword_file(path)?,
        None => Tokenizer::new(),
    };
    let index = Index::build(corpus_records(&cli.corpus, cli.format)?, Box::new(tokenizer))?;

    let queries = if cli.topics {
        read_topic_file(&cli.queries)?
    } else {
        read_query_lines(&cli.queries)?
    };

    let config = RunConfig {
        k: cli.k,
        options: SearchOptions {
            method: match cli.method {
                Method::Cosine => RankingMethod::Cosine,
                Method::Bm25 => RankingMethod::Bm25,
            },
            bm25: Bm25Params {
                k1: cli.k1,
                b: cli.b,
            },
            expand: cli.expand,
            feedback_depth: cli.feedback_depth,
        },
        run_tag: cli.run_tag,
        eval: cli.eval,
    };

    let out = File::create(&cli.output)
        .with_context(|| format!("creating result file {}", cli.output.display()))?;
    let mut out = BufWriter::new(out);
    run_queries(&index, &queries, &config, &mut out)?;

    tracing::info!(
        queries = queries.len(),
        output = %cli.output.display(),
        "run complete"
    );
    Ok(())
}
