//! TF-IDF document vectors for the discriminative strategy.
//!
//! A [`VectorSpace`] is built from a corpus snapshot for one query and then
//! dropped. Construction goes through [`VectorSpaceBuilder`] so a cached
//! implementation, invalidated on store mutation, can replace [`TfIdfBuilder`]
//! without touching the ranker.

use crate::error::RankError;
use crate::tokenizer::Normalizer;
use crate::{DocId, Document};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Sparse row: (column, weight) pairs sorted by column.
pub type SparseRow = Vec<(usize, f64)>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfIdfConfig {
    /// idf = ln((1 + n) / (1 + df)) + 1 instead of ln(n / df) + 1
    pub smooth_idf: bool,
    /// tf = 1 + ln(tf) instead of the raw count
    pub sublinear_tf: bool,
    /// L2-normalize every row
    pub normalize_rows: bool,
}

impl Default for TfIdfConfig {
    fn default() -> Self { Self { smooth_idf: true, sublinear_tf: false, normalize_rows: true } }
}

#[derive(Debug, Clone)]
pub struct VectorSpace {
    /// One row per document, in the same order as `doc_ids`.
    pub rows: Vec<SparseRow>,
    pub doc_ids: Vec<DocId>,
    /// Column index for every distinct corpus term, assigned in sorted term order.
    pub vocabulary: HashMap<String, usize>,
}

impl VectorSpace {
    pub fn num_features(&self) -> usize { self.vocabulary.len() }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

pub trait VectorSpaceBuilder: Send + Sync {
    fn build(&self, documents: &[Arc<Document>], normalizer: &dyn Normalizer) -> Result<VectorSpace, RankError>;
}

#[derive(Debug, Default, Clone)]
pub struct TfIdfBuilder {
    config: TfIdfConfig,
}

impl TfIdfBuilder {
    pub fn new(config: TfIdfConfig) -> Self { Self { config } }

    fn idf(&self, n: f64, df: f64) -> f64 {
        if self.config.smooth_idf { ((1.0 + n) / (1.0 + df)).ln() + 1.0 } else { (n / df).ln() + 1.0 }
    }

    fn tf(&self, raw: u32) -> f64 {
        if self.config.sublinear_tf { 1.0 + (raw as f64).ln() } else { raw as f64 }
    }
}

impl VectorSpaceBuilder for TfIdfBuilder {
    fn build(&self, documents: &[Arc<Document>], normalizer: &dyn Normalizer) -> Result<VectorSpace, RankError> {
        if documents.is_empty() {
            return Err(RankError::EmptyCorpus);
        }

        let tf_per_doc: Vec<BTreeMap<String, u32>> = documents
            .par_iter()
            .map(|doc| {
                let mut counts = BTreeMap::new();
                for term in normalizer.normalize(&doc.content) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut df: BTreeMap<&str, u32> = BTreeMap::new();
        for counts in &tf_per_doc {
            for term in counts.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(df.len());
        let mut idf = Vec::with_capacity(df.len());
        for (col, (term, df_t)) in df.iter().enumerate() {
            vocabulary.insert(term.to_string(), col);
            idf.push(self.idf(n, *df_t as f64));
        }

        let rows = tf_per_doc
            .iter()
            .map(|counts| {
                // BTreeMap iteration keeps columns sorted because columns follow term order.
                let mut row: SparseRow = counts
                    .iter()
                    .map(|(term, &raw)| {
                        let col = vocabulary[term.as_str()];
                        (col, self.tf(raw) * idf[col])
                    })
                    .collect();
                if self.config.normalize_rows {
                    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                    if norm > 0.0 {
                        for (_, w) in row.iter_mut() { *w /= norm; }
                    }
                }
                row
            })
            .collect();

        Ok(VectorSpace { rows, doc_ids: documents.iter().map(|d| d.id).collect(), vocabulary })
    }
}
