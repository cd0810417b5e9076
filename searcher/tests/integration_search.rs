use engine::{Index, SearchOptions, Tokenizer};
use searcher::{
    corpus_records, read_query_lines, read_topic_file, run_queries, CorpusFormat, RunConfig,
};
use std::fs;
use tempfile::tempdir;

fn build_index(corpus: &std::path::Path, format: CorpusFormat) -> Index {
    Index::build(
        corpus_records(corpus, format).unwrap(),
        Box::new(Tokenizer::new()),
    )
    .unwrap()
}

fn default_config() -> RunConfig {
    RunConfig {
        k: 10,
        options: SearchOptions::default(),
        run_tag: "testRun".into(),
        eval: false,
    }
}

#[test]
fn end_to_end_tsv_run_writes_ranked_result_lines() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus.tsv");
    fs::write(&corpus, "d1\tcat dog\nd2\tdog dog fish\nd3\tparrot cage\n").unwrap();
    let queries_path = dir.path().join("queries.txt");
    fs::write(&queries_path, "dog\nparrot\n").unwrap();

    let index = build_index(&corpus, CorpusFormat::Tsv);
    let queries = read_query_lines(&queries_path).unwrap();
    let mut out = Vec::new();
    run_queries(&index, &queries, &default_config(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // two documents match "dog", one matches "parrot"
    assert_eq!(lines.len(), 3);

    let fields: Vec<&str> = lines[0].split_whitespace().collect();
    assert_eq!(fields.len(), 6);
    assert_eq!(fields[0], "MB001");
    assert_eq!(fields[1], "Q0");
    // d2 has the higher raw frequency of "dog"
    assert_eq!(fields[2], "d2");
    assert_eq!(fields[3], "1");
    assert_eq!(fields[5], "testRun");

    assert!(lines[1].starts_with("MB001 Q0 d1 2 "));
    assert!(lines[2].starts_with("MB002 Q0 d3 1 "));
}

#[test]
fn eval_mode_writes_bare_query_numbers() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus.tsv");
    fs::write(&corpus, "d1\tcat dog\n").unwrap();
    let queries_path = dir.path().join("queries.txt");
    fs::write(&queries_path, "dog\n").unwrap();

    let index = build_index(&corpus, CorpusFormat::Tsv);
    let queries = read_query_lines(&queries_path).unwrap();
    let config = RunConfig {
        eval: true,
        ..default_config()
    };
    let mut out = Vec::new();
    run_queries(&index, &queries, &config, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("1 Q0 d1 1 "));
}

#[test]
fn jsonl_corpus_indexes_like_tsv() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus.jsonl");
    fs::write(
        &corpus,
        "{\"id\": \"d1\", \"text\": \"cat dog\"}\n{\"id\": \"d2\", \"text\": \"dog dog fish\"}\n",
    )
    .unwrap();

    let index = build_index(&corpus, CorpusFormat::Jsonl);
    assert_eq!(index.num_docs(), 2);
    assert_eq!(index.get("d2").unwrap().len(), 3);
}

#[test]
fn malformed_corpus_line_aborts_the_build() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus.tsv");
    fs::write(&corpus, "d1\tcat dog\nthis line has no tab\n").unwrap();

    let result = Index::build(
        corpus_records(&corpus, CorpusFormat::Tsv).unwrap(),
        Box::new(Tokenizer::new()),
    );
    let err = result.err().expect("malformed line must fail the build");
    // the error names the offending line
    assert!(format!("{err:#}").contains(":2"));
}

#[test]
fn topic_file_titles_become_queries() {
    let dir = tempdir().unwrap();
    let topics = dir.path().join("topics.txt");
    fs::write(
        &topics,
        "<top>\n\
         <num> Number: MB001 </num>\n\
         <title> BBC World Service staff cuts </title>\n\
         <querytime> Tue Feb 08 12:30:27 +0000 2011 </querytime>\n\
         <querytweettime> 34952194402811904 </querytweettime>\n\
         </top>\n\
         \n\
         <top>\n\
         <num> Number: MB002 </num>\n\
         <title> TSA airport screening </title>\n\
         <querytime> Wed Feb 09 18:29:08 +0000 2011 </querytime>\n\
         <querytweettime> 35376158515275776 </querytweettime>\n\
         </top>\n",
    )
    .unwrap();

    let queries = read_topic_file(&topics).unwrap();
    assert_eq!(
        queries,
        vec!["BBC World Service staff cuts", "TSA airport screening"]
    );
}

#[test]
fn topic_file_without_titles_is_an_error() {
    let dir = tempdir().unwrap();
    let topics = dir.path().join("topics.txt");
    fs::write(&topics, "nothing useful here\n").unwrap();
    assert!(read_topic_file(&topics).is_err());
}
