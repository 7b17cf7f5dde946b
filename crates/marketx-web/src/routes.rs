use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::dashboard::build_dashboard;
use crate::error::WebError;
use crate::state::AppState;
use crate::view::{ViewQuery, ViewState};

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Re-runs the full pipeline for the state carried in the query string.
async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<Html<String>, WebError> {
    let view = ViewState::from_query(&query);
    let dashboard = build_dashboard(&state.market, &view).await;
    Ok(Html(state.templates.render_page(&dashboard)?))
}

async fn healthz() -> &'static str {
    "ok"
}
