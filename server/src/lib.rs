use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Form, Json, Router,
};
use quarry_core::extract::collect_files;
use quarry_core::{DocId, Document, Engine, EngineConfig, SearchHit, Strategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    /// Overrides the server's default strategy for this request.
    #[serde(default)]
    pub strategy: Option<Strategy>,
    /// Keep only the first k hits; `total_hits` still counts all of them.
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub strategy: Strategy,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub strategy: Strategy,
}

/// Index every file in `docs_dir` and return the router serving it.
pub fn build_app(docs_dir: &std::path::Path, recursive: bool, strategy: Strategy, config: EngineConfig) -> Result<Router> {
    let engine = Engine::new(config)?;
    let files = collect_files(docs_dir, recursive)?;
    let report = engine.index_batch(&files);
    tracing::info!(
        dir = %docs_dir.display(),
        indexed = report.indexed.len(),
        skipped = report.failures.len(),
        %strategy,
        "corpus ready"
    );
    Ok(router(AppState { engine: Arc::new(engine), strategy }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(form_page).post(form_results))
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

// CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
fn cors_layer() -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let origins: Vec<_> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

/// Searches are CPU-bound (the discriminative path retrains per query), so they
/// run on the blocking pool.
async fn run_search(state: &AppState, query: String, strategy: Strategy) -> Result<(Vec<SearchHit>, f64), (StatusCode, String)> {
    let engine = state.engine.clone();
    let start = Instant::now();
    let hits = tokio::task::spawn_blocking(move || engine.search(&query, strategy))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("search task failed: {e}")))?;
    Ok((hits, start.elapsed().as_secs_f64()))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let strategy = params.strategy.unwrap_or(state.strategy);
    let (mut results, took_s) = run_search(&state, params.q.clone(), strategy).await?;
    let total_hits = results.len();
    if let Some(k) = params.k {
        results.truncate(k);
    }
    Ok(Json(SearchResponse { query: params.q, strategy, took_s, total_hits, results }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<Document>, (StatusCode, Json<serde_json::Value>)> {
    match state.engine.document(doc_id) {
        Ok(doc) => Ok(Json(doc.as_ref().clone())),
        Err(e) => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": e.to_string() })))),
    }
}

async fn form_page() -> Html<&'static str> { Html(FORM_PAGE) }

async fn form_results(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    let (hits, _) = run_search(&state, form.query.clone(), state.strategy).await?;
    Ok(Html(render_results(&form.query, &hits)))
}

const FORM_PAGE: &str = r#"<html><body>
    <h1>Search Engine</h1>
    <form method="post">
        <input type="text" name="query" size="50">
        <input type="submit" value="Search">
    </form>
</body></html>"#;

pub fn render_results(query: &str, hits: &[SearchHit]) -> String {
    let mut items = String::new();
    for hit in hits {
        let name = escape_html(&hit.name);
        match &hit.snippet {
            Some(snippet) => items.push_str(&format!(
                "<li><strong>{name}</strong> (Score: {})<br><em>... {} ...</em></li>",
                hit.score,
                escape_html(snippet)
            )),
            None => items.push_str(&format!("<li>{name} (Score: {})</li>", hit.score)),
        }
    }
    format!(
        "<html><body>\n    <h1>Search Results for \"{}\"</h1>\n    <a href=\"/\">New Search</a>\n    <ul>{items}</ul>\n</body></html>",
        escape_html(query)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
