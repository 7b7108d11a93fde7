use anyhow::{bail, Context, Result};
use clap::Parser;
use index::ingest::index_file;
use index::{query, DocId, Index, SearchResponse};
use std::io::BufRead;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "phrasedex")]
#[command(about = "Index text files in memory and run word/phrase queries", long_about = None)]
struct Args {
    /// File to index, as ID=PATH or a bare PATH (ids then start at 1, in
    /// argument order). Repeatable.
    #[arg(long = "file", short = 'f')]
    files: Vec<String>,
    /// Query to evaluate after indexing. Repeatable. With no queries given,
    /// one query per stdin line is read instead.
    #[arg(long = "query", short = 'q')]
    queries: Vec<String>,
    /// Hash table width (fixed; the table never grows)
    #[arg(long)]
    buckets: Option<usize>,
}

fn parse_file_arg(arg: &str, fallback_id: DocId) -> Result<(DocId, &str)> {
    match arg.split_once('=') {
        Some((id, path)) => {
            let id: DocId = id
                .parse()
                .with_context(|| format!("invalid doc id in {arg:?}"))?;
            Ok((id, path))
        }
        None => Ok((fallback_id, arg)),
    }
}

fn run_query(index: &Index, text: &str) -> Result<()> {
    let response = SearchResponse::from_matches(query(index, text));
    println!("{}", response.to_json()?);
    Ok(())
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut idx = match args.buckets {
        Some(n) => Index::with_buckets(n),
        None => Index::new(),
    };

    let mut indexed = 0usize;
    for (i, arg) in args.files.iter().enumerate() {
        let (doc_id, path) = parse_file_arg(arg, (i + 1) as DocId)?;
        match index_file(&mut idx, path, doc_id) {
            Ok(()) => indexed += 1,
            // A failing source is local to that document; keep going.
            Err(err) => tracing::warn!(doc_id, %path, error = %err, "skipping document"),
        }
    }
    if !args.files.is_empty() && indexed == 0 {
        bail!("no documents could be indexed");
    }
    tracing::info!(docs = indexed, terms = idx.term_count(), "index built");

    if args.queries.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("could not read query from stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            run_query(&idx, &line)?;
        }
    } else {
        for q in &args.queries {
            run_query(&idx, q)?;
        }
    }
    Ok(())
}
