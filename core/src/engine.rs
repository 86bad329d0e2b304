//! The search engine: document store and inverted index behind one lock,
//! plus the collaborators that feed and query them.
//!
//! Mutation happens in two phases. Extraction and normalization need no
//! shared state and run in parallel. The merge (store append followed by
//! index update) then runs under the write lock, so ids stay sequential and
//! a reader never sees a document without its index entries.

use crate::config::EngineConfig;
use crate::error::{ConfigError, IndexError, RankError, StoreError};
use crate::extract::{Extractor, FileExtractor};
use crate::index::InvertedIndex;
use crate::ranking::{discriminative, frequency, Strategy};
use crate::store::DocumentStore;
use crate::tokenizer::{EnglishNormalizer, Normalizer};
use crate::vector_space::{TfIdfBuilder, VectorSpaceBuilder};
use crate::{DocId, Document};
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Frequency hits carry a whole occurrence count; discriminative hits a decision value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Score {
    Count(u64),
    Decision(f64),
}

impl Score {
    pub fn value(&self) -> f64 {
        match *self {
            Score::Count(c) => c as f64,
            Score::Decision(d) => d,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Count(c) => write!(f, "{c}"),
            Score::Decision(d) => write!(f, "{d:.4}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub name: String,
    pub score: Score,
    /// Only the discriminative strategy produces snippets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchReport {
    pub indexed: Vec<DocId>,
    pub failures: Vec<IndexFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub documents: usize,
    pub terms: usize,
}

/// A document that has been extracted and normalized but not yet merged.
struct Prepared {
    name: String,
    content: String,
    terms: Vec<String>,
}

#[derive(Default)]
struct Corpus {
    store: DocumentStore,
    index: InvertedIndex,
}

impl Corpus {
    fn merge(&mut self, doc: Prepared) -> Result<DocId, IndexError> {
        let Prepared { name, content, terms } = doc;
        let id = self.store.add(name.clone(), content).map_err(|e| match e {
            StoreError::NoContent => IndexError::NoContent { name },
            other => IndexError::Store(other),
        })?;
        self.index.ingest(id, &terms);
        Ok(id)
    }
}

pub struct Engine {
    corpus: RwLock<Corpus>,
    normalizer: Arc<dyn Normalizer>,
    extractor: Arc<dyn Extractor>,
    space_builder: Arc<dyn VectorSpaceBuilder>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self::assemble(config, Arc::new(EnglishNormalizer), Arc::new(FileExtractor), Arc::new(TfIdfBuilder::new(config.tfidf)))
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_components(
            config,
            Arc::new(EnglishNormalizer),
            Arc::new(FileExtractor),
            Arc::new(TfIdfBuilder::new(config.tfidf)),
        )
    }

    pub fn with_components(
        config: EngineConfig,
        normalizer: Arc<dyn Normalizer>,
        extractor: Arc<dyn Extractor>,
        space_builder: Arc<dyn VectorSpaceBuilder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, normalizer, extractor, space_builder))
    }

    fn assemble(
        config: EngineConfig,
        normalizer: Arc<dyn Normalizer>,
        extractor: Arc<dyn Extractor>,
        space_builder: Arc<dyn VectorSpaceBuilder>,
    ) -> Self {
        Self { corpus: RwLock::new(Corpus::default()), normalizer, extractor, space_builder, config }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Add already-extracted text under `name`.
    pub fn add_document(&self, name: impl Into<String>, content: impl Into<String>) -> Result<DocId, IndexError> {
        let prepared = self.prepare(name.into(), content.into())?;
        let id = self.corpus.write().merge(prepared)?;
        Ok(id)
    }

    /// Extract, normalize and merge a single file.
    pub fn index(&self, path: &Path) -> Result<DocId, IndexError> {
        let prepared = self.prepare_file(path)?;
        let id = self.corpus.write().merge(prepared)?;
        tracing::info!(path = %path.display(), doc_id = id, "indexed document");
        Ok(id)
    }

    /// Index many files. Extraction runs in parallel; merging happens in input
    /// order under one write lock. Failures are logged and reported, never fatal.
    pub fn index_batch<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> BatchReport {
        let prepared: Vec<Result<Prepared, IndexError>> = paths
            .par_iter()
            .map(|p| self.prepare_file(p.as_ref()))
            .collect();

        let mut report = BatchReport::default();
        let mut corpus = self.corpus.write();
        for (path, result) in paths.iter().zip(prepared) {
            let path = path.as_ref();
            match result.and_then(|doc| corpus.merge(doc)) {
                Ok(id) => {
                    tracing::info!(path = %path.display(), doc_id = id, "indexed document");
                    report.indexed.push(id);
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping document");
                    report.failures.push(IndexFailure { path: path.to_path_buf(), reason: err.to_string() });
                }
            }
        }
        tracing::info!(
            indexed = report.indexed.len(),
            skipped = report.failures.len(),
            num_docs = corpus.store.len(),
            num_terms = corpus.index.num_terms(),
            "batch indexed"
        );
        report
    }

    fn prepare_file(&self, path: &Path) -> Result<Prepared, IndexError> {
        let content = self
            .extractor
            .extract(path)
            .map_err(|source| IndexError::ExtractionFailed { path: path.to_path_buf(), source })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.prepare(name, content)
    }

    fn prepare(&self, name: String, content: String) -> Result<Prepared, IndexError> {
        if content.trim().is_empty() {
            return Err(IndexError::NoContent { name });
        }
        let terms = self.normalizer.normalize(&content);
        Ok(Prepared { name, content, terms })
    }

    pub fn document(&self, id: DocId) -> Result<Arc<Document>, StoreError> { self.corpus.read().store.get(id) }

    /// Current count of `term` (already normalized) in document `id`.
    pub fn term_count(&self, term: &str, id: DocId) -> u32 { self.corpus.read().index.count(term, id) }

    pub fn stats(&self) -> EngineStats {
        let corpus = self.corpus.read();
        EngineStats { documents: corpus.store.len(), terms: corpus.index.num_terms() }
    }

    pub fn len(&self) -> usize { self.corpus.read().store.len() }

    pub fn is_empty(&self) -> bool { self.corpus.read().store.is_empty() }

    pub fn search(&self, query: &str, strategy: Strategy) -> Vec<SearchHit> {
        match strategy {
            Strategy::Frequency => self.search_frequency(query),
            Strategy::Discriminative => self.search_discriminative(query),
        }
    }

    pub fn search_frequency(&self, query: &str) -> Vec<SearchHit> {
        let start = Instant::now();
        let terms = self.normalizer.normalize(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let corpus = self.corpus.read();
        let hits: Vec<SearchHit> = frequency::rank(&corpus.index, &terms)
            .into_iter()
            .filter_map(|(doc_id, score)| {
                corpus.store.get(doc_id).ok().map(|doc| SearchHit {
                    doc_id,
                    name: doc.name.clone(),
                    score: Score::Count(score),
                    snippet: None,
                })
            })
            .collect();
        tracing::debug!(query, hits = hits.len(), took_s = start.elapsed().as_secs_f64(), "frequency search");
        hits
    }

    /// Discriminative search with the empty outcomes collapsed to an empty list.
    pub fn search_discriminative(&self, query: &str) -> Vec<SearchHit> {
        match self.try_search_discriminative(query) {
            Ok(hits) => hits,
            Err(reason @ RankError::MisalignedSpace { .. }) => {
                tracing::warn!(query, %reason, "vector space builder produced misaligned rows");
                Vec::new()
            }
            Err(reason) => {
                tracing::debug!(query, %reason, "discriminative search returned no results");
                Vec::new()
            }
        }
    }

    /// Rebuilds the vector space and retrains the classifier from a snapshot
    /// of the corpus on every call. The lock is only held for the snapshot.
    pub fn try_search_discriminative(&self, query: &str) -> Result<Vec<SearchHit>, RankError> {
        let start = Instant::now();
        let documents = self.corpus.read().store.snapshot();
        if documents.is_empty() {
            return Err(RankError::EmptyCorpus);
        }

        let terms = self.normalizer.normalize(query);
        let space = self.space_builder.build(&documents, self.normalizer.as_ref())?;
        let hits: Vec<SearchHit> = discriminative::rank(&space, &documents, &terms, &self.config.svm, self.config.snippet_window)?
            .into_iter()
            .map(|h| SearchHit { doc_id: h.doc_id, name: h.name, score: Score::Decision(h.score), snippet: Some(h.snippet) })
            .collect();
        tracing::debug!(query, hits = hits.len(), took_s = start.elapsed().as_secs_f64(), "discriminative search");
        Ok(hits)
    }
}
