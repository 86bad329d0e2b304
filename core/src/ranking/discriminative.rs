use super::by_score_then_id;
use crate::error::RankError;
use crate::snippet;
use crate::svm::{self, SvmConfig};
use crate::vector_space::VectorSpace;
use crate::{DocId, Document};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscriminativeHit {
    pub doc_id: DocId,
    pub name: String,
    pub score: f64,
    pub snippet: String,
}

/// Weak relevance labels: a document is positive when any normalized query
/// term occurs as a substring of its lower-cased raw content.
///
/// Terms are stemmed while the content is not, so a stem such as `studi`
/// will not label a document that only says `study`. That mismatch is part of
/// the ranking behaviour and is kept.
pub fn labels<S: AsRef<str>>(documents: &[Arc<Document>], query_terms: &[S]) -> Vec<bool> {
    documents
        .iter()
        .map(|doc| {
            let lowered = doc.content.to_lowercase();
            query_terms.iter().any(|t| lowered.contains(t.as_ref()))
        })
        .collect()
}

/// Train a classifier on the query's labels and rank documents on the
/// positive side of the hyperplane by decision value.
///
/// `space` must have been built from `documents`, row for row.
pub fn rank<S: AsRef<str>>(
    space: &VectorSpace,
    documents: &[Arc<Document>],
    query_terms: &[S],
    svm_config: &SvmConfig,
    window: usize,
) -> Result<Vec<DiscriminativeHit>, RankError> {
    if documents.is_empty() {
        return Err(RankError::EmptyCorpus);
    }
    let aligned = space.rows.len() == documents.len()
        && space.doc_ids.len() == documents.len()
        && space.doc_ids.iter().zip(documents).all(|(id, doc)| *id == doc.id);
    if !aligned {
        return Err(RankError::MisalignedSpace { rows: space.rows.len(), documents: documents.len() });
    }

    let labels = labels(documents, query_terms);
    let model = svm::train(&space.rows, &labels, space.num_features(), svm_config)?;

    let mut hits: Vec<DiscriminativeHit> = space
        .rows
        .iter()
        .zip(documents)
        .filter_map(|(row, doc)| {
            let score = model.decision_value(row);
            (score > 0.0).then(|| DiscriminativeHit {
                doc_id: doc.id,
                name: doc.name.clone(),
                score,
                snippet: snippet::extract(&doc.content, query_terms, window),
            })
        })
        .collect();

    hits.sort_by(|a, b| by_score_then_id((a.score, a.doc_id), (b.score, b.doc_id)));
    Ok(hits)
}
