use crate::{DocId, DEFAULT_BUCKETS};
use anyhow::{Context, Result};

/// End-of-chain sentinel for arena links.
const NIL: u32 = u32::MAX;

struct TermEntry {
    name: String,
    /// Head of this term's posting chain.
    postings: u32,
    /// Next term in the same bucket's collision chain.
    next: u32,
}

struct PostingEntry {
    doc_id: DocId,
    /// Head of this posting's position chain.
    positions: u32,
    next: u32,
}

struct PositionEntry {
    pos: u32,
    next: u32,
}

/// In-memory positional inverted index: term -> documents -> positions.
///
/// Buckets are fixed at construction; the table never grows or rehashes, so
/// worst-case chain length is capped only by sizing the table for the
/// expected vocabulary. Collision chains and posting/position lists are
/// singly linked through `u32` indices into contiguous arenas.
///
/// New entries are prepended to their chain, so postings within a term and
/// positions within a posting enumerate in reverse insertion order. Query
/// output ordering depends on this.
///
/// Not thread-safe. Callers must serialize access.
pub struct Index {
    buckets: Vec<u32>,
    terms: Vec<TermEntry>,
    postings: Vec<PostingEntry>,
    positions: Vec<PositionEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Build an index with an explicit table width. Small widths are useful
    /// in tests to force collision chains.
    pub fn with_buckets(buckets: usize) -> Self {
        Self {
            buckets: vec![NIL; buckets.max(1)],
            terms: Vec::new(),
            postings: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Polynomial string hash over the term's bytes, reduced modulo the
    /// bucket count. Wrapping u32 arithmetic is part of the contract: the
    /// accumulator is expected to overflow on longer terms.
    fn bucket(&self, term: &str) -> usize {
        let mut h: u32 = 0;
        for &b in term.as_bytes() {
            h = h.wrapping_mul(31).wrapping_add(b as u32);
        }
        (h % self.buckets.len() as u32) as usize
    }

    fn find_term(&self, mut slot: u32, term: &str) -> Option<u32> {
        while slot != NIL {
            let entry = &self.terms[slot as usize];
            if entry.name == term {
                return Some(slot);
            }
            slot = entry.next;
        }
        None
    }

    fn find_posting(&self, mut slot: u32, doc_id: DocId) -> Option<u32> {
        while slot != NIL {
            let entry = &self.postings[slot as usize];
            if entry.doc_id == doc_id {
                return Some(slot);
            }
            slot = entry.next;
        }
        None
    }

    /// Record that `term` occurs in `doc_id` at `pos`. Creates the term and
    /// posting on first sight; appends the position unconditionally, so
    /// inserting the same (term, doc, pos) twice stores two entries.
    ///
    /// The only failure mode is allocation exhaustion, surfaced as an error
    /// rather than an abort.
    pub fn insert(&mut self, term: &str, doc_id: DocId, pos: u32) -> Result<()> {
        let bucket = self.bucket(term);

        let term_slot = match self.find_term(self.buckets[bucket], term) {
            Some(slot) => slot,
            None => {
                self.terms
                    .try_reserve(1)
                    .context("out of memory growing term table")?;
                let slot = self.terms.len() as u32;
                self.terms.push(TermEntry {
                    name: term.to_string(),
                    postings: NIL,
                    next: self.buckets[bucket],
                });
                self.buckets[bucket] = slot;
                slot
            }
        };

        let posting_slot = match self.find_posting(self.terms[term_slot as usize].postings, doc_id)
        {
            Some(slot) => slot,
            None => {
                self.postings
                    .try_reserve(1)
                    .context("out of memory growing postings")?;
                let slot = self.postings.len() as u32;
                self.postings.push(PostingEntry {
                    doc_id,
                    positions: NIL,
                    next: self.terms[term_slot as usize].postings,
                });
                self.terms[term_slot as usize].postings = slot;
                slot
            }
        };

        self.positions
            .try_reserve(1)
            .context("out of memory growing positions")?;
        let slot = self.positions.len() as u32;
        self.positions.push(PositionEntry {
            pos,
            next: self.postings[posting_slot as usize].positions,
        });
        self.postings[posting_slot as usize].positions = slot;
        Ok(())
    }

    /// Find a term's postings. `None` means the term was never indexed; this
    /// is an expected branch in query evaluation, not an error.
    pub fn lookup(&self, term: &str) -> Option<TermRef<'_>> {
        let slot = self.find_term(self.buckets[self.bucket(term)], term)?;
        Some(TermRef { index: self, slot })
    }

    /// Drop every term, posting, and position. The index is empty and
    /// reusable afterwards; a no-op on an already empty index.
    pub fn clear(&mut self) {
        self.buckets.fill(NIL);
        self.terms.clear();
        self.postings.clear();
        self.positions.clear();
        tracing::debug!("index cleared");
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed view of one indexed term.
#[derive(Clone, Copy)]
pub struct TermRef<'a> {
    index: &'a Index,
    slot: u32,
}

impl<'a> TermRef<'a> {
    pub fn name(&self) -> &'a str {
        &self.index.terms[self.slot as usize].name
    }

    /// Postings in reverse insertion order (most recently added document
    /// first).
    pub fn postings(&self) -> impl Iterator<Item = PostingRef<'a>> {
        let index = self.index;
        let mut cur = index.terms[self.slot as usize].postings;
        std::iter::from_fn(move || {
            if cur == NIL {
                return None;
            }
            let slot = cur;
            cur = index.postings[slot as usize].next;
            Some(PostingRef { index, slot })
        })
    }

    /// The posting for `doc_id` under this term, if the document contains it.
    pub fn posting_for(&self, doc_id: DocId) -> Option<PostingRef<'a>> {
        let slot = self
            .index
            .find_posting(self.index.terms[self.slot as usize].postings, doc_id)?;
        Some(PostingRef {
            index: self.index,
            slot,
        })
    }
}

/// Borrowed view of one (term, document) posting.
#[derive(Clone, Copy)]
pub struct PostingRef<'a> {
    index: &'a Index,
    slot: u32,
}

impl<'a> PostingRef<'a> {
    pub fn doc_id(&self) -> DocId {
        self.index.postings[self.slot as usize].doc_id
    }

    /// Positions in reverse insertion order.
    pub fn positions(&self) -> impl Iterator<Item = u32> + 'a {
        let index = self.index;
        let mut cur = index.postings[self.slot as usize].positions;
        std::iter::from_fn(move || {
            if cur == NIL {
                return None;
            }
            let entry = &index.positions[cur as usize];
            cur = entry.next;
            Some(entry.pos)
        })
    }

    pub fn contains_position(&self, pos: u32) -> bool {
        self.positions().any(|p| p == pos)
    }
}
