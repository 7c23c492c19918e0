//! HTTP route handlers: dashboard page, JSON table, health.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use super::state::AppState;
use super::{compute_etag, json_error};
use crate::load::{load_dashboard, LoadError};
use crate::render::{render_error_html, render_html, render_json, rendered_at};

/// Status for a failed load: the upstream is at fault for provider
/// errors, the document is at fault otherwise.
fn status_for(error: &LoadError) -> StatusCode {
    match error {
        LoadError::Provider(_) => StatusCode::BAD_GATEWAY,
        LoadError::Document(_) | LoadError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn matches_if_none_match(headers: &HeaderMap, etag_quoted: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|inm| {
            inm.split(',')
                .any(|candidate| candidate.trim() == etag_quoted || candidate.trim() == "*")
        })
        .unwrap_or(false)
}

fn with_etag(mut response: Response, etag_quoted: &str) -> Response {
    if let Ok(val) = etag_quoted.parse() {
        response.headers_mut().insert(header::ETAG, val);
    }
    response
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /
pub(crate) async fn handle_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let dashboard = match load_dashboard(state.provider.as_ref()).await {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "dashboard unavailable");
            return (status_for(&e), Html(render_error_html(&e.to_string()))).into_response();
        }
    };

    let notice = state.notice.as_deref();
    let etag_quoted = format!("\"{}\"", compute_etag(&dashboard, notice));
    if matches_if_none_match(&headers, &etag_quoted) {
        return with_etag(StatusCode::NOT_MODIFIED.into_response(), &etag_quoted);
    }

    let html = render_html(&dashboard, notice, &rendered_at());
    with_etag(Html(html).into_response(), &etag_quoted)
}

/// GET /table
pub(crate) async fn handle_table(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    let dashboard = match load_dashboard(state.provider.as_ref()).await {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "table unavailable");
            let body = serde_json::json!({
                "error": e.to_string(),
                "kind": e.kind(),
            });
            return (status_for(&e), Json(body)).into_response();
        }
    };

    let notice = state.notice.as_deref();
    let etag_quoted = format!("\"{}\"", compute_etag(&dashboard, notice));
    if matches_if_none_match(&headers, &etag_quoted) {
        return with_etag(StatusCode::NOT_MODIFIED.into_response(), &etag_quoted);
    }

    with_etag(
        (StatusCode::OK, Json(render_json(&dashboard, notice))).into_response(),
        &etag_quoted,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use valruns_provider::{DocumentProvider, FileProvider, StaticProvider};

    fn document() -> serde_json::Value {
        serde_json::json!({
            "GameName": "Celeste",
            "CategoryName": "Any%",
            "AttemptCount": 1,
            "Segments": [{"Name": "A", "SegmentHistory": [{"AttemptID": 1, "GameTime": "00:00:01.2"}]}],
            "Runs": [[{"AttemptID": 1, "RunStart": "2024-03-01"}]],
            "PB_splits": ["00:00:01.2"]
        })
    }

    fn state_with(provider: impl DocumentProvider, notice: Option<&str>) -> Arc<AppState> {
        Arc::new(AppState {
            provider: Arc::new(provider),
            notice: notice.map(str::to_string),
        })
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn dashboard_renders_table() {
        let state = state_with(StaticProvider::new(document()), Some("heads up"));
        let response = handle_dashboard(State(state), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::ETAG));

        let body = body_text(response).await;
        assert!(body.contains("<h1>Celeste Any%</h1>"));
        assert!(body.contains("heads up"));
        assert!(body.contains("<td>2024-03-01</td><td>01.2</td>"));
    }

    #[tokio::test]
    async fn dashboard_honors_if_none_match() {
        let state = state_with(StaticProvider::new(document()), None);
        let first = handle_dashboard(State(state.clone()), HeaderMap::new()).await;
        let etag = first.headers()[header::ETAG].clone();

        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, etag);
        let second = handle_dashboard(State(state), headers).await;
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn missing_data_renders_single_error_page() {
        let mut doc = document();
        doc.as_object_mut().unwrap().remove("Runs");
        let state = state_with(StaticProvider::new(doc), None);

        let response = handle_dashboard(State(state), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_text(response).await;
        assert!(body.contains("document missing required field"));
        assert!(!body.contains("<table>"));
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let state = state_with(FileProvider::new("/nonexistent/splits.json"), None);
        let response = handle_table(State(state), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["kind"], "provider");
    }

    #[tokio::test]
    async fn table_returns_json() {
        let state = state_with(StaticProvider::new(document()), None);
        let response = handle_table(State(state), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["header"], serde_json::json!(["Date", "A"]));
        // ".2" is 2 ms, shown as the last millisecond digit.
        assert_eq!(body["table"]["rows"][0]["cells"][0], "01.2");
    }

    #[tokio::test]
    async fn malformed_time_in_table_is_unprocessable() {
        let mut doc = document();
        doc["PB_splits"][0] = serde_json::json!("1:2");
        let state = state_with(StaticProvider::new(doc), None);
        let response = handle_table(State(state), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["kind"], "malformed_time");
    }
}
