pub mod index;
pub mod ingest;
pub mod query;
pub mod response;
pub mod tokenizer;

pub type DocId = u32;

/// Hash table width, fixed at construction. Prime.
pub const DEFAULT_BUCKETS: usize = 262_139;
/// Normalized terms are silently truncated to this many letters.
pub const MAX_TERM_LEN: usize = 63;
/// Query terms beyond this count are silently ignored.
pub const MAX_QUERY_TERMS: usize = 20;
/// Phrase-start positions collected per document; overflow is dropped
/// and does not count toward the reported frequency.
pub const MAX_PHRASE_POSITIONS: usize = 128;

pub use crate::index::Index;
pub use crate::query::{query, DocMatch};
pub use crate::response::{DocHit, SearchResponse};
