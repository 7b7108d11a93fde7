use crate::query::DocMatch;
use anyhow::Result;
use serde::Serialize;

/// External result shape: `{ "results": [...] }` and nothing else at the top
/// level.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<DocHit>,
}

#[derive(Debug, Serialize)]
pub struct DocHit {
    pub doc_id: u32,
    pub positions: Vec<u32>,
    /// Count of positions as actually returned. Reflects the phrase-start
    /// cap, so it can undercount true occurrences.
    pub frequency: usize,
}

impl SearchResponse {
    /// Build an owned response from query matches. Each call produces an
    /// independent value; nothing is shared or reused across queries.
    pub fn from_matches(matches: Vec<DocMatch>) -> Self {
        let results = matches
            .into_iter()
            .map(|m| DocHit {
                doc_id: m.doc_id,
                frequency: m.positions.len(),
                positions: m.positions,
            })
            .collect();
        Self { results }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
