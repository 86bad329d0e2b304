use crate::index::InvertedIndex;
use crate::DocId;
use std::collections::HashMap;

/// Additive term-frequency ranking.
///
/// Every query term occurrence that exists in the index adds its per-document
/// counts to that document's score, so a repeated query term counts twice.
/// Documents with a zero score are never returned.
pub fn rank<S: AsRef<str>>(index: &InvertedIndex, query_terms: &[S]) -> Vec<(DocId, u64)> {
    let mut scores: HashMap<DocId, u64> = HashMap::new();
    for term in query_terms {
        if let Some(postings) = index.postings(term.as_ref()) {
            for (&doc_id, &count) in postings {
                *scores.entry(doc_id).or_insert(0) += count as u64;
            }
        }
    }

    let mut scored: Vec<(DocId, u64)> = scores.into_iter().filter(|&(_, s)| s > 0).collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_index() -> InvertedIndex {
        let mut idx = InvertedIndex::new();
        idx.ingest(1, &["rust", "system"]);
        idx.ingest(2, &["rust", "rust", "rust"]);
        idx.ingest(3, &["python", "system"]);
        idx
    }

    #[test]
    fn sums_counts_across_terms() {
        let ranked = rank(&tiny_index(), &["rust", "system"]);
        assert_eq!(ranked, vec![(2, 3), (1, 2), (3, 1)]);
    }

    #[test]
    fn ties_go_to_the_earlier_document() {
        let ranked = rank(&tiny_index(), &["system"]);
        assert_eq!(ranked, vec![(1, 1), (3, 1)]);
    }

    #[test]
    fn unknown_and_empty_queries_yield_nothing() {
        assert!(rank(&tiny_index(), &["haskell"]).is_empty());
        assert!(rank::<&str>(&tiny_index(), &[]).is_empty());
    }

    #[test]
    fn repeated_query_terms_accumulate() {
        let ranked = rank(&tiny_index(), &["python", "python"]);
        assert_eq!(ranked, vec![(3, 2)]);
    }
}
