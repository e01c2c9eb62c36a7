// Thin HTTP boundary over the search service.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::model::{SearchReply, HINT_MESSAGE, NONE_MESSAGE};
use crate::service::SearchService;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    q: Option<String>,
}

pub fn router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/search", get(search_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// `GET /search?query=...` (alias `q`). Always answers with a JSON array:
/// price-sorted listings, or a single hint/none object.
async fn search_handler(
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    let raw = params.query.or(params.q).unwrap_or_default();
    let reply = service.search(raw.trim()).await;
    Json(reply_to_json(reply))
}

fn reply_to_json(reply: SearchReply) -> Value {
    match reply {
        SearchReply::Found(items) => json!(items),
        SearchReply::Hint => json!([{ "type": "hint", "message": HINT_MESSAGE }]),
        SearchReply::Empty => json!([{ "type": "none", "message": NONE_MESSAGE }]),
    }
}
