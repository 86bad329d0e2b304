use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use quarry_core::{EngineConfig, Strategy};
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_corpus(dir: &std::path::Path) {
    fs::write(dir.join("a_rust.txt"), "Rust is great. rust systems programming with rust.").unwrap();
    fs::write(dir.join("b_learning.txt"), "Learning rust.").unwrap();
    fs::write(dir.join("c_garden.txt"), "Growing tomatoes in the garden.").unwrap();
    fs::write(dir.join("d_empty.txt"), "   ").unwrap();
    fs::write(dir.join("e_paper.pdf"), b"%PDF-1.4").unwrap();
}

fn app(strategy: Strategy) -> (tempfile::TempDir, Router) {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let app = quarry_server::build_app(dir.path(), false, strategy, EngineConfig::default()).unwrap();
    (dir, app)
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let (_dir, app) = app(Strategy::Frequency);
    let (status, body) = get(app, "/search?q=rust").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr[0]["name"], "a_rust.txt");
    assert_eq!(arr[0]["score"], 3);
    assert!(arr[0]["score"].is_u64());
    assert_eq!(arr[1]["name"], "b_learning.txt");
    assert!(arr[0].get("snippet").is_none());
}

#[tokio::test]
async fn k_truncates_but_total_counts_everything() {
    let (_dir, app) = app(Strategy::Frequency);
    let (_, body) = get(app, "/search?q=rust&k=1").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn strategy_can_be_chosen_per_request() {
    let (_dir, app) = app(Strategy::Frequency);
    let (status, body) = get(app, "/search?q=tomatoes&strategy=discriminative").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["strategy"], "discriminative");
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], "c_garden.txt");
    assert!(arr[0]["score"].as_f64().unwrap() > 0.0);
    assert!(arr[0]["snippet"].as_str().unwrap().contains("TOMATO"));
}

#[tokio::test]
async fn empty_query_is_not_an_error() {
    let (_dir, app) = app(Strategy::Discriminative);
    let (status, body) = get(app, "/search?q=").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn skipped_files_do_not_consume_ids() {
    let (_dir, app) = app(Strategy::Frequency);
    let (status, body) = get(app.clone(), "/doc/3").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["name"], "c_garden.txt");

    let (status, _) = get(app, "/doc/4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn html_form_round_trip() {
    let (_dir, app) = app(Strategy::Frequency);
    let (status, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("<form method=\"post\">"));

    let req = Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("query=learning"))
        .unwrap();
    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("Search Results for \"learning\""));
    assert!(page.contains("<li>b_learning.txt (Score: 1)</li>"));
}
