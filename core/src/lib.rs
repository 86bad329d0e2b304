pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod index;
pub mod ranking;
pub mod snippet;
pub mod store;
pub mod svm;
pub mod tokenizer;
pub mod vector_space;

use serde::{Deserialize, Serialize};

pub use config::EngineConfig;
pub use engine::{BatchReport, Engine, EngineStats, Score, SearchHit};
pub use error::{ConfigError, ExtractError, IndexError, RankError, StoreError};
pub use index::InvertedIndex;
pub use ranking::Strategy;
pub use store::DocumentStore;

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    /// File name the content was extracted from.
    pub name: String,
    pub content: String,
}
