use quarry_core::tokenizer::normalize;
use quarry_core::{Engine, IndexError, RankError, Score, Strategy};
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn engine_with(docs: &[(&str, &str)]) -> Engine {
    let engine = Engine::default();
    for (name, content) in docs {
        engine.add_document(*name, *content).unwrap();
    }
    engine
}

#[test]
fn index_counts_match_normalized_terms() {
    let content = "Parsers parse tokens; the parser builds trees from parsed tokens.";
    let engine = engine_with(&[("parsing.txt", content)]);

    let mut expected: HashMap<String, u32> = HashMap::new();
    for t in normalize(content) {
        *expected.entry(t).or_insert(0) += 1;
    }
    for (term, count) in expected {
        assert_eq!(engine.term_count(&term, 1), count, "term {term}");
    }
}

#[test]
fn stemmed_query_scores_repeated_term() {
    let engine = engine_with(&[("sport.txt", "run run jump")]);
    let hits = engine.search_frequency("running");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "sport.txt");
    assert_eq!(hits[0].score, Score::Count(2));
}

#[test]
fn empty_query_returns_nothing_for_both_strategies() {
    let engine = engine_with(&[("a.txt", "alpha beta"), ("b.txt", "gamma delta")]);
    for strategy in [Strategy::Frequency, Strategy::Discriminative] {
        assert!(engine.search("", strategy).is_empty());
        assert!(engine.search("   the and of ", strategy).is_empty());
    }
}

#[test]
fn frequency_scores_never_increase() {
    let engine = engine_with(&[
        ("a.txt", "search engines index documents"),
        ("b.txt", "index index index"),
        ("c.txt", "documents about search and documents about index"),
        ("d.txt", "nothing relevant"),
    ]);
    let hits = engine.search_frequency("index search documents");
    assert_eq!(hits.len(), 3);
    assert!(hits.windows(2).all(|w| w[0].score.value() >= w[1].score.value()));
    assert_eq!(hits[0].name, "c.txt");
}

#[test]
fn single_document_without_term_is_degenerate() {
    let engine = engine_with(&[("only.txt", "a lonely document about weather")]);
    assert_eq!(engine.try_search_discriminative("volcano").unwrap_err(), RankError::DegenerateLabeling);
    assert!(engine.search("volcano", Strategy::Discriminative).is_empty());
}

#[test]
fn discriminative_hits_carry_snippets() {
    let engine = engine_with(&[
        ("rust.txt", "Rust guarantees memory safety through ownership."),
        ("go.txt", "Go uses a garbage collector for memory management."),
        ("poem.txt", "Roses are red, violets are blue."),
    ]);
    let hits = engine.search("ownership", Strategy::Discriminative);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "rust.txt");
    assert!(matches!(hits[0].score, Score::Decision(d) if d > 0.0));
    assert_eq!(hits[0].snippet.as_deref(), Some("Rust guarantees memory safety through OWNERSHIP."));
}

#[test]
fn ids_skip_nothing_after_failed_extraction() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("a.pdf");
    let good = dir.path().join("b.txt");
    fs::write(&bad, b"%PDF").unwrap();
    fs::write(&good, "useful words").unwrap();

    let engine = Engine::default();
    assert!(matches!(engine.index(&bad), Err(IndexError::ExtractionFailed { .. })));
    assert_eq!(engine.index(&good).unwrap(), 1);
}

#[test]
fn same_content_twice_is_two_documents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dup.txt");
    fs::write(&path, "duplicate duplicate text").unwrap();

    let engine = Engine::default();
    let report = engine.index_batch(&[&path, &path]);
    assert_eq!(report.indexed, vec![1, 2]);
    let term = &normalize("duplicate")[0];
    assert_eq!(engine.term_count(term, 1), 2);
    assert_eq!(engine.term_count(term, 2), 2);

    let hits = engine.search_frequency("duplicate");
    assert_eq!(hits.iter().map(|h| h.doc_id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn concurrent_searches_and_inserts_stay_consistent() {
    let engine = engine_with(&[("seed.txt", "concurrency seed")]);
    let term = normalize("concurrency").remove(0);
    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..20 {
                engine.add_document(format!("doc{i}.txt"), "concurrency writer text").unwrap();
            }
        });
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..10 {
                    let hits = engine.search_frequency("concurrency");
                    for h in &hits {
                        assert_eq!(engine.term_count(&term, h.doc_id), 1);
                    }
                }
            });
        }
    });
    assert_eq!(engine.len(), 21);
}
