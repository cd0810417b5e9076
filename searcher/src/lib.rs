use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use engine::{Index, RawDoc, SearchHit, SearchOptions};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Corpus file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CorpusFormat {
    /// `id<TAB>text`, one document per line.
    Tsv,
    /// One JSON object per line: `{"id": ..., "text": ...}`.
    Jsonl,
}

#[derive(Debug, Deserialize)]
struct JsonRecord {
    id: String,
    text: String,
}

/// Streams corpus records from a file. Malformed records surface as `Err`
/// items carrying the file name and line number, which aborts the index
/// build.
pub fn corpus_records(
    path: &Path,
    format: CorpusFormat,
) -> Result<impl Iterator<Item = Result<RawDoc>>> {
    let file = File::open(path)
        .with_context(|| format!("opening corpus file {}", path.display()))?;
    let name = path.display().to_string();
    let records = BufReader::new(file)
        .lines()
        .enumerate()
        .filter_map(move |(lineno, line)| {
            let lineno = lineno + 1;
            let line = match line.with_context(|| format!("reading {name}:{lineno}")) {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            if line.trim().is_empty() {
                return None;
            }
            let record = match format {
                CorpusFormat::Tsv => parse_tsv_record(&line),
                CorpusFormat::Jsonl => parse_jsonl_record(&line),
            };
            Some(record.with_context(|| format!("{name}:{lineno}")))
        });
    Ok(records)
}

fn parse_tsv_record(line: &str) -> Result<RawDoc> {
    let Some((id, text)) = line.split_once('\t') else {
        bail!("malformed corpus line: expected id<TAB>text");
    };
    Ok(RawDoc {
        id: id.to_string(),
        text: text.to_string(),
    })
}

fn parse_jsonl_record(line: &str) -> Result<RawDoc> {
    let record: JsonRecord =
        serde_json::from_str(line).context("malformed corpus record")?;
    Ok(RawDoc {
        id: record.id,
        text: record.text,
    })
}

/// Reads queries, one per line; blank lines are skipped.
pub fn read_query_lines(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading query file {}", path.display()))?;
    Ok(contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect())
}

/// Reads queries from a TREC topic file: each `<top>` block contributes
/// the contents of its `<title>` line.
pub fn read_topic_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading topic file {}", path.display()))?;
    let mut queries = Vec::new();
    for line in contents.lines() {
        if let Some(rest) = line.trim_start().strip_prefix("<title>") {
            let title = rest.trim_end().trim_end_matches("</title>").trim();
            if !title.is_empty() {
                queries.push(title.to_string());
            }
        }
    }
    if queries.is_empty() {
        bail!("no <title> entries in topic file {}", path.display());
    }
    Ok(queries)
}

/// Settings for one batch run.
pub struct RunConfig {
    pub k: usize,
    pub options: SearchOptions,
    pub run_tag: String,
    /// Write bare query numbers instead of `MB001`-style ids.
    pub eval: bool,
}

/// Runs every query against the index, writing ranked results as they
/// come. Queries are numbered from 1 in file order.
pub fn run_queries<W: Write>(
    index: &Index,
    queries: &[String],
    config: &RunConfig,
    out: &mut W,
) -> Result<()> {
    for (i, query) in queries.iter().enumerate() {
        let started = std::time::Instant::now();
        let hits = index.rank(query, config.k, &config.options);
        tracing::debug!(
            query = %query,
            hits = hits.len(),
            took = ?started.elapsed(),
            "query done"
        );
        write_results(out, i + 1, &hits, config)?;
    }
    Ok(())
}

/// One result line per hit: `<qid> Q0 <docid> <rank> <score> <tag>`.
fn write_results<W: Write>(
    out: &mut W,
    query_number: usize,
    hits: &[SearchHit],
    config: &RunConfig,
) -> Result<()> {
    for (rank, hit) in hits.iter().enumerate() {
        if config.eval {
            writeln!(
                out,
                "{} Q0 {} {} {:.3} {}",
                query_number,
                hit.doc_id,
                rank + 1,
                hit.score,
                config.run_tag
            )?;
        } else {
            writeln!(
                out,
                "MB{:03} Q0 {} {} {:.3} {}",
                query_number,
                hit.doc_id,
                rank + 1,
                hit.score,
                config.run_tag
            )?;
        }
    }
    Ok(())
}
