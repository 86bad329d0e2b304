use crate::DocId;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// term -> (doc_id -> occurrence count). Counts are always positive.
#[derive(Debug, Default, Clone, Serialize)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeMap<DocId, u32>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Merge one document's normalized terms. Each distinct term's counter for
    /// `doc_id` grows by the number of times it occurs in `terms`.
    pub fn ingest<S: AsRef<str>>(&mut self, doc_id: DocId, terms: &[S]) {
        let mut tf_counts: HashMap<&str, u32> = HashMap::new();
        for term in terms {
            *tf_counts.entry(term.as_ref()).or_insert(0) += 1;
        }
        for (term, count) in tf_counts {
            *self
                .postings
                .entry(term.to_string())
                .or_default()
                .entry(doc_id)
                .or_insert(0) += count;
        }
    }

    pub fn postings(&self, term: &str) -> Option<&BTreeMap<DocId, u32>> { self.postings.get(term) }

    pub fn count(&self, term: &str, doc_id: DocId) -> u32 {
        self.postings
            .get(term)
            .and_then(|p| p.get(&doc_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }
}
