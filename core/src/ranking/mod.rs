//! The two ranking strategies.
//!
//! [`frequency`] sums inverted-index counts. [`discriminative`] trains a linear
//! classifier per query over a TF-IDF [`VectorSpace`](crate::vector_space::VectorSpace)
//! and ranks by signed distance from the separating hyperplane.

pub mod discriminative;
pub mod frequency;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::DocId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    #[serde(alias = "basic")]
    Frequency,
    #[serde(alias = "svm")]
    Discriminative,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Frequency => "frequency",
            Strategy::Discriminative => "discriminative",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frequency" | "basic" | "tf" => Ok(Strategy::Frequency),
            "discriminative" | "svm" => Ok(Strategy::Discriminative),
            other => Err(format!("unknown strategy '{other}', expected 'frequency' or 'discriminative'")),
        }
    }
}

/// Score descending, then doc id ascending.
pub(crate) fn by_score_then_id(a: (f64, DocId), b: (f64, DocId)) -> Ordering {
    b.0.total_cmp(&a.0).then(a.1.cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_aliases() {
        assert_eq!("SVM".parse::<Strategy>().unwrap(), Strategy::Discriminative);
        assert_eq!(" frequency ".parse::<Strategy>().unwrap(), Strategy::Frequency);
        assert!("bm25".parse::<Strategy>().is_err());
    }

    #[test]
    fn ordering_breaks_ties_by_id() {
        let mut v = vec![(1.0, 3), (2.0, 5), (1.0, 1)];
        v.sort_by(|a, b| by_score_then_id(*a, *b));
        assert_eq!(v, vec![(2.0, 5), (1.0, 1), (1.0, 3)]);
    }
}
