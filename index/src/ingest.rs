use crate::index::Index;
use crate::tokenizer::normalize;
use crate::DocId;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Index one document's text under `doc_id`. Tokens are whitespace-delimited;
/// each is normalized and, if anything survives, inserted with a dense
/// position counter starting at 0. Tokens that normalize to empty (pure
/// punctuation, digits) consume no position slot, so positions count kept
/// terms, not raw tokens. Phrase matching relies on that.
///
/// The counter restarts at 0 on every call; indexing the same `doc_id` again
/// accumulates into its existing postings.
pub fn index_text(index: &mut Index, text: &str, doc_id: DocId) -> Result<()> {
    let mut pos: u32 = 0;
    for token in text.split_whitespace() {
        let term = normalize(token);
        if term.is_empty() {
            continue;
        }
        index.insert(&term, doc_id, pos)?;
        pos += 1;
    }
    tracing::debug!(doc_id, tokens = pos, "indexed document");
    Ok(())
}

/// Index a document from a reader. The source is read in full before any
/// insertion, so a read failure leaves the index exactly as it was; state
/// from earlier calls is never affected by a failing one.
pub fn index_reader<R: Read>(index: &mut Index, mut reader: R, doc_id: DocId) -> Result<()> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .with_context(|| format!("could not read source for doc {doc_id}"))?;
    index_text(index, &text, doc_id)
}

/// Index a document from a file path. An unopenable file is reported without
/// touching the index.
pub fn index_file<P: AsRef<Path>>(index: &mut Index, path: P, doc_id: DocId) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("could not open {}", path.display()))?;
    index_reader(index, file, doc_id)
}
