use crate::index::{Index, PostingRef, TermRef};
use crate::tokenizer::normalize;
use crate::{DocId, MAX_PHRASE_POSITIONS, MAX_QUERY_TERMS};

/// One document matched by a query: its id and the matched positions
/// (occurrence positions for a single term, phrase-start positions for a
/// phrase), in the posting's native scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocMatch {
    pub doc_id: DocId,
    pub positions: Vec<u32>,
}

/// Split the query on whitespace, normalize each piece, and drop pieces that
/// normalize to empty. At most [`MAX_QUERY_TERMS`] terms are kept; the rest
/// are silently ignored.
fn parse_terms(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize)
        .filter(|t| !t.is_empty())
        .take(MAX_QUERY_TERMS)
        .collect()
}

/// Evaluate a query against the index. One surviving term enumerates that
/// term's documents; two or more run an exact-adjacency phrase match. A query
/// with no surviving terms matches nothing; that is a normal outcome, not an
/// error.
pub fn query(index: &Index, text: &str) -> Vec<DocMatch> {
    let terms = parse_terms(text);
    tracing::debug!(terms = terms.len(), "evaluating query");
    match terms.as_slice() {
        [] => Vec::new(),
        [term] => single_term(index, term),
        _ => phrase(index, &terms),
    }
}

fn single_term(index: &Index, term: &str) -> Vec<DocMatch> {
    let Some(term) = index.lookup(term) else {
        return Vec::new();
    };
    term.postings()
        .map(|posting| DocMatch {
            doc_id: posting.doc_id(),
            positions: posting.positions().collect(),
        })
        .collect()
}

fn phrase(index: &Index, terms: &[String]) -> Vec<DocMatch> {
    // One absent term empties the whole phrase, regardless of the others.
    let mut refs: Vec<TermRef<'_>> = Vec::with_capacity(terms.len());
    for term in terms {
        match index.lookup(term) {
            Some(r) => refs.push(r),
            None => return Vec::new(),
        }
    }

    let mut matches = Vec::new();
    for first in refs[0].postings() {
        let doc_id = first.doc_id();
        // Candidate only if every remaining term also occurs in this doc.
        let Some(rest) = postings_in_doc(&refs[1..], doc_id) else {
            continue;
        };
        let starts = collect_phrase_starts(first, &rest);
        if !starts.is_empty() {
            matches.push(DocMatch {
                doc_id,
                positions: starts,
            });
        }
    }
    matches
}

fn postings_in_doc<'a>(refs: &[TermRef<'a>], doc_id: DocId) -> Option<Vec<PostingRef<'a>>> {
    refs.iter().map(|r| r.posting_for(doc_id)).collect()
}

/// Phrase starts within one document: a position `p0` of the first term is
/// accepted when term `i` has a recorded position `p0 + i` for every later
/// term. Scan order follows the first term's posting; collection stops
/// counting at [`MAX_PHRASE_POSITIONS`], so the reported frequency can
/// undercount once the cap is hit.
fn collect_phrase_starts(first: PostingRef<'_>, rest: &[PostingRef<'_>]) -> Vec<u32> {
    let mut starts = Vec::new();
    for p0 in first.positions() {
        if starts.len() == MAX_PHRASE_POSITIONS {
            break;
        }
        let adjacent = rest
            .iter()
            .enumerate()
            .all(|(i, posting)| posting.contains_position(p0 + i as u32 + 1));
        if adjacent {
            starts.push(p0);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::index_text;

    fn sample() -> Index {
        let mut idx = Index::with_buckets(64);
        index_text(&mut idx, "the quick brown fox", 1).unwrap();
        index_text(&mut idx, "the lazy fox", 2).unwrap();
        idx
    }

    #[test]
    fn empty_query_is_empty_success() {
        let idx = sample();
        assert!(query(&idx, "").is_empty());
        assert!(query(&idx, "   ").is_empty());
        // Tokens that normalize to nothing leave no terms either.
        assert!(query(&idx, "123 --").is_empty());
    }

    #[test]
    fn single_term_enumerates_documents() {
        let idx = sample();
        let matches = query(&idx, "fox");
        assert_eq!(matches.len(), 2);
        // Doc 2 was indexed last, so its posting enumerates first.
        assert_eq!(matches[0], DocMatch { doc_id: 2, positions: vec![2] });
        assert_eq!(matches[1], DocMatch { doc_id: 1, positions: vec![3] });
    }

    #[test]
    fn single_term_unknown_is_empty() {
        let idx = sample();
        assert!(query(&idx, "wolf").is_empty());
    }

    #[test]
    fn query_terms_are_normalized() {
        let idx = sample();
        let matches = query(&idx, "FOX!");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn phrase_requires_adjacency_in_order() {
        let idx = sample();
        let matches = query(&idx, "quick brown");
        assert_eq!(matches, vec![DocMatch { doc_id: 1, positions: vec![1] }]);
        // Reversed order: "quick" is not immediately after "brown".
        assert!(query(&idx, "brown quick").is_empty());
    }

    #[test]
    fn phrase_gap_is_no_hit() {
        let mut idx = Index::with_buckets(64);
        index_text(&mut idx, "quick red brown", 1).unwrap();
        assert!(query(&idx, "quick brown").is_empty());
    }

    #[test]
    fn phrase_with_unknown_term_short_circuits() {
        let idx = sample();
        assert!(query(&idx, "quick wolf").is_empty());
        assert!(query(&idx, "wolf quick").is_empty());
    }

    #[test]
    fn phrase_skips_docs_missing_a_term() {
        let idx = sample();
        // Both docs have "the" and "fox", but only doc 2 adjacently.
        let matches = query(&idx, "lazy fox");
        assert_eq!(matches, vec![DocMatch { doc_id: 2, positions: vec![1] }]);
    }

    #[test]
    fn phrase_of_three_terms() {
        let idx = sample();
        let matches = query(&idx, "quick brown fox");
        assert_eq!(matches, vec![DocMatch { doc_id: 1, positions: vec![1] }]);
    }

    #[test]
    fn repeated_phrase_reports_every_start() {
        let mut idx = Index::with_buckets(64);
        index_text(&mut idx, "ba da ba da", 5).unwrap();
        let matches = query(&idx, "ba da");
        assert_eq!(matches.len(), 1);
        // Starts follow the first term's reverse-insertion scan order.
        assert_eq!(matches[0].positions, vec![2, 0]);
    }

    #[test]
    fn term_cap_silently_drops_extras() {
        let mut idx = Index::with_buckets(256);
        // 20 terms "ta tb ... tt" at positions 0..20, then one more word.
        let words: Vec<String> = (0..21)
            .map(|i| format!("t{}", (b'a' + i as u8) as char))
            .collect();
        index_text(&mut idx, &words.join(" "), 1).unwrap();
        // A 21-term phrase query keeps only the first 20; it still matches
        // even though the 21st word is "wrong".
        let mut q = words[..20].join(" ");
        q.push_str(" zzz");
        let matches = query(&idx, &q);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].positions, vec![0]);
    }

    #[test]
    fn phrase_start_cap_bounds_frequency() {
        let mut idx = Index::with_buckets(64);
        let text = "ab cd ".repeat(MAX_PHRASE_POSITIONS + 40);
        index_text(&mut idx, &text, 1).unwrap();
        let matches = query(&idx, "ab cd");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].positions.len(), MAX_PHRASE_POSITIONS);
    }
}
