use crate::http::support::{
    fail, if_none_match, make_request_id, mutate_document, ok_json, path_city_slug,
    path_country_key, path_index, propagated_request_id, put_cache_headers, sha256_hex,
    with_request_id,
};
use crate::AppState;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::info;
use waypoint_api::{success_message, ApiError};
use waypoint_model::{
    add_city, add_guide, add_itinerary, add_transport_mode, create_country, delete_city,
    delete_country, delete_guide, delete_itinerary, delete_transport_mode, City, Country, Document,
    Guide, Itinerary, PathSegment, TransportMode,
};

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let resp = (StatusCode::OK, "ok").into_response();
    state
        .metrics
        .observe_request("/healthz", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

/// Ready means the document loads: a missing or corrupt data file makes the
/// instance useless for every endpoint that matters.
pub(crate) async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let (status, body) = match state.store.load() {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not-ready"),
    };
    let resp = (status, body).into_response();
    state
        .metrics
        .observe_request("/readyz", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let payload = json!({
        "name": "waypoint",
        "version": env!("CARGO_PKG_VERSION"),
        "crate": crate::CRATE_NAME,
        "config_schema_version": crate::config::CONFIG_SCHEMA_VERSION,
    });
    let mut response = Json(payload).into_response();
    if let Ok(value) = HeaderValue::from_str("public, max-age=30") {
        response.headers_mut().insert("cache-control", value);
    }
    state
        .metrics
        .observe_request("/version", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(response, &request_id)
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let body = state.metrics.render_prometheus().await;
    with_request_id((StatusCode::OK, body).into_response(), &request_id)
}

pub(crate) async fn get_data_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    const ROUTE: &str = "/api/data";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = ROUTE, "request start");

    let document = match state.store.load() {
        Ok(document) => document,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e.into()).await,
    };
    let bytes = match serde_json::to_vec(&document) {
        Ok(bytes) => bytes,
        Err(e) => {
            return fail(&state, ROUTE, started, &request_id, ApiError::internal(e.to_string()))
                .await
        }
    };

    let etag = format!("\"{}\"", sha256_hex(&bytes));
    if if_none_match(&headers).as_deref() == Some(etag.as_str()) {
        let mut resp = StatusCode::NOT_MODIFIED.into_response();
        put_cache_headers(resp.headers_mut(), state.api.document_ttl, &etag);
        state
            .metrics
            .observe_request(ROUTE, StatusCode::NOT_MODIFIED, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    }

    let mut resp = Response::builder()
        .status(StatusCode::OK)
        .body(Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());
    resp.headers_mut()
        .insert("content-type", HeaderValue::from_static("application/json"));
    put_cache_headers(resp.headers_mut(), state.api.document_ttl, &etag);
    state
        .metrics
        .observe_request(ROUTE, StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

/// Read-only alias kept for the public site, which fetches the dataset from
/// a different path than the editor.
pub(crate) async fn travel_data_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    const ROUTE: &str = "/api/travel-data";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    match state.store.load() {
        Ok(document) => ok_json(
            &state,
            ROUTE,
            started,
            &request_id,
            serde_json::to_value(&document).unwrap_or_else(|_| json!({})),
        )
        .await,
        Err(e) => fail(&state, ROUTE, started, &request_id, e.into()).await,
    }
}

/// Full-document replace: trusts the caller's tree wholesale, no path
/// resolution, still backup-before-write.
pub(crate) async fn put_data_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Document>, JsonRejection>,
) -> Response {
    const ROUTE: &str = "/api/data";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = ROUTE, "request start");

    let Json(document) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            return fail(
                &state,
                ROUTE,
                started,
                &request_id,
                ApiError::invalid_payload(e.to_string()),
            )
            .await
        }
    };

    let _guard = state.document_lock.lock().await;
    if let Err(e) = state.store.save(&document) {
        return fail(&state, ROUTE, started, &request_id, e.into()).await;
    }
    drop(_guard);
    ok_json(
        &state,
        ROUTE,
        started,
        &request_id,
        success_message("Data saved successfully"),
    )
    .await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCountryRequest {
    country_key: String,
    country_data: Country,
}

pub(crate) async fn create_country_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateCountryRequest>, JsonRejection>,
) -> Response {
    const ROUTE: &str = "/api/countries";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = ROUTE, "request start");

    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            return fail(
                &state,
                ROUTE,
                started,
                &request_id,
                ApiError::invalid_payload(e.to_string()),
            )
            .await
        }
    };
    let key = match waypoint_model::parse_country_key(&req.country_key) {
        Ok(key) => key,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e.into()).await,
    };

    let result = mutate_document(&state, |document| {
        create_country(document, key, req.country_data).map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("Country added successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}

pub(crate) async fn delete_country_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_key): Path<String>,
) -> Response {
    const ROUTE: &str = "/api/countries/:key";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let key = match path_country_key(&raw_key) {
        Ok(key) => key,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e).await,
    };
    let result = mutate_document(&state, |document| {
        delete_country(document, &key)
            .map(|_| ())
            .map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("Country deleted successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}

pub(crate) async fn add_city_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_key): Path<String>,
    payload: Result<Json<City>, JsonRejection>,
) -> Response {
    const ROUTE: &str = "/api/countries/:key/cities";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let key = match path_country_key(&raw_key) {
        Ok(key) => key,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e).await,
    };
    let Json(city) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            return fail(
                &state,
                ROUTE,
                started,
                &request_id,
                ApiError::invalid_payload(e.to_string()),
            )
            .await
        }
    };
    let result = mutate_document(&state, |document| {
        add_city(document, &key, city).map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("City added successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}

pub(crate) async fn delete_city_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((raw_key, raw_slug)): Path<(String, String)>,
) -> Response {
    const ROUTE: &str = "/api/countries/:key/cities/:slug";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let parsed = path_country_key(&raw_key).and_then(|key| {
        path_city_slug(&raw_slug).map(|slug| (key, slug))
    });
    let (key, slug) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e).await,
    };
    let result = mutate_document(&state, |document| {
        delete_city(document, &key, &slug)
            .map(|_| ())
            .map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("City deleted successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}

pub(crate) async fn add_guide_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((raw_key, raw_slug)): Path<(String, String)>,
    payload: Result<Json<Guide>, JsonRejection>,
) -> Response {
    const ROUTE: &str = "/api/countries/:key/cities/:slug/guides";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let parsed = path_country_key(&raw_key).and_then(|key| {
        path_city_slug(&raw_slug).map(|slug| (key, slug))
    });
    let (key, slug) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e).await,
    };
    let Json(guide) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            return fail(
                &state,
                ROUTE,
                started,
                &request_id,
                ApiError::invalid_payload(e.to_string()),
            )
            .await
        }
    };
    let result = mutate_document(&state, |document| {
        add_guide(document, &key, &slug, guide).map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("Guide added successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}

pub(crate) async fn delete_guide_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((raw_key, raw_slug, raw_index)): Path<(String, String, String)>,
) -> Response {
    const ROUTE: &str = "/api/countries/:key/cities/:slug/guides/:index";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let parsed = path_country_key(&raw_key).and_then(|key| {
        path_city_slug(&raw_slug).and_then(|slug| {
            path_index(&raw_index, PathSegment::Guide).map(|index| (key, slug, index))
        })
    });
    let (key, slug, index) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e).await,
    };
    let result = mutate_document(&state, |document| {
        delete_guide(document, &key, &slug, index)
            .map(|_| ())
            .map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("Guide deleted successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}

pub(crate) async fn add_itinerary_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_key): Path<String>,
    payload: Result<Json<Itinerary>, JsonRejection>,
) -> Response {
    const ROUTE: &str = "/api/countries/:key/itineraries";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let key = match path_country_key(&raw_key) {
        Ok(key) => key,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e).await,
    };
    let Json(itinerary) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            return fail(
                &state,
                ROUTE,
                started,
                &request_id,
                ApiError::invalid_payload(e.to_string()),
            )
            .await
        }
    };
    let result = mutate_document(&state, |document| {
        add_itinerary(document, &key, itinerary).map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("Itinerary added successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}

pub(crate) async fn delete_itinerary_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((raw_key, raw_index)): Path<(String, String)>,
) -> Response {
    const ROUTE: &str = "/api/countries/:key/itineraries/:index";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let parsed = path_country_key(&raw_key).and_then(|key| {
        path_index(&raw_index, PathSegment::Itinerary).map(|index| (key, index))
    });
    let (key, index) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e).await,
    };
    let result = mutate_document(&state, |document| {
        delete_itinerary(document, &key, index)
            .map(|_| ())
            .map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("Itinerary deleted successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}

pub(crate) async fn add_transport_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_key): Path<String>,
    payload: Result<Json<TransportMode>, JsonRejection>,
) -> Response {
    const ROUTE: &str = "/api/countries/:key/transport";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let key = match path_country_key(&raw_key) {
        Ok(key) => key,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e).await,
    };
    let Json(mode) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            return fail(
                &state,
                ROUTE,
                started,
                &request_id,
                ApiError::invalid_payload(e.to_string()),
            )
            .await
        }
    };
    let result = mutate_document(&state, |document| {
        add_transport_mode(document, &key, mode).map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("Transport mode added successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}

pub(crate) async fn delete_transport_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((raw_key, raw_index)): Path<(String, String)>,
) -> Response {
    const ROUTE: &str = "/api/countries/:key/transport/:index";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);

    let parsed = path_country_key(&raw_key).and_then(|key| {
        path_index(&raw_index, PathSegment::TransportMode).map(|index| (key, index))
    });
    let (key, index) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return fail(&state, ROUTE, started, &request_id, e).await,
    };
    let result = mutate_document(&state, |document| {
        delete_transport_mode(document, &key, index)
            .map(|_| ())
            .map_err(ApiError::from)
    })
    .await;
    match result {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("Transport mode deleted successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e).await,
    }
}
