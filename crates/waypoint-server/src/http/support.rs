use crate::AppState;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tracing::{error, info};
use waypoint_api::ApiError;
use waypoint_model::{CitySlug, CountryKey, Document, PathSegment};

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

pub(crate) fn if_none_match(headers: &HeaderMap) -> Option<String> {
    headers
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

pub(crate) fn put_cache_headers(headers: &mut HeaderMap, ttl: Duration, etag: &str) {
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", ttl.as_secs())) {
        headers.insert("cache-control", value);
    }
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert("etag", value);
    }
}

/// Terminal failure path: log with the request id, count the request, wrap
/// the message in the `{"error": …}` envelope.
pub(crate) async fn fail(
    state: &AppState,
    route: &'static str,
    started: Instant,
    request_id: &str,
    err: ApiError,
) -> Response {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(request_id = %request_id, route, code = ?err.code, "request failed: {}", err.message);
    } else {
        info!(request_id = %request_id, route, code = ?err.code, "request rejected: {}", err.message);
    }
    state.metrics.observe_request(route, status, started.elapsed()).await;
    with_request_id((status, Json(err.to_body())).into_response(), request_id)
}

pub(crate) async fn ok_json(
    state: &AppState,
    route: &'static str,
    started: Instant,
    request_id: &str,
    payload: Value,
) -> Response {
    state
        .metrics
        .observe_request(route, StatusCode::OK, started.elapsed())
        .await;
    with_request_id((StatusCode::OK, Json(payload)).into_response(), request_id)
}

/// Path parameters that fail key/slug validation cannot name an existing
/// node, so they surface as the segment's not-found error.
pub(crate) fn path_country_key(raw: &str) -> Result<CountryKey, ApiError> {
    waypoint_model::parse_country_key(raw).map_err(|_| segment_not_found(PathSegment::Country))
}

pub(crate) fn path_city_slug(raw: &str) -> Result<CitySlug, ApiError> {
    waypoint_model::parse_city_slug(raw).map_err(|_| segment_not_found(PathSegment::City))
}

pub(crate) fn path_index(raw: &str, segment: PathSegment) -> Result<usize, ApiError> {
    raw.parse::<usize>().map_err(|_| segment_not_found(segment))
}

pub(crate) fn segment_not_found(segment: PathSegment) -> ApiError {
    ApiError::new(
        waypoint_api::ApiErrorCode::NotFound,
        segment.not_found_message(),
    )
}

/// The document critical section: every mutating request serializes its
/// read-mutate-write sequence behind the per-document lock (cross-process
/// writers remain last-write-wins by design).
pub(crate) async fn mutate_document<F>(state: &AppState, mutate: F) -> Result<(), ApiError>
where
    F: FnOnce(&mut Document) -> Result<(), ApiError>,
{
    let _guard = state.document_lock.lock().await;
    let mut document = state.store.load()?;
    mutate(&mut document)?;
    state.store.save(&document)?;
    Ok(())
}
