//! Upload, gallery listing, and deletion of image assets. These endpoints
//! never touch the document or its lock.

use crate::http::support::{fail, ok_json, propagated_request_id};
use crate::AppState;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde_json::json;
use std::time::Instant;
use tracing::info;
use waypoint_api::{success_message, ApiError};

/// Field name the upload widget posts its file under.
const UPLOAD_FIELD: &str = "image";

pub(crate) async fn upload_image_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    const ROUTE: &str = "/api/images";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = ROUTE, "upload start");

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
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

    let mut upload: Option<(Vec<u8>, String, String)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
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
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        match field.bytes().await {
            Ok(bytes) => {
                upload = Some((bytes.to_vec(), original_name, mime_type));
                break;
            }
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
        }
    }

    let Some((bytes, original_name, mime_type)) = upload else {
        return fail(
            &state,
            ROUTE,
            started,
            &request_id,
            ApiError::invalid_payload("No file uploaded"),
        )
        .await;
    };

    match state.assets.store(&bytes, &original_name, &mime_type) {
        Ok(stored) => {
            info!(
                request_id = %request_id,
                filename = %stored.filename,
                size = stored.size,
                "image stored"
            );
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                json!({
                    "success": true,
                    "filePath": stored.path,
                    "originalName": original_name,
                    "size": stored.size,
                }),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e.into()).await,
    }
}

pub(crate) async fn list_images_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    const ROUTE: &str = "/api/images";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    match state.assets.list() {
        Ok(assets) => {
            let payload = serde_json::to_value(&assets).unwrap_or_else(|_| json!([]));
            ok_json(&state, ROUTE, started, &request_id, payload).await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e.into()).await,
    }
}

pub(crate) async fn delete_image_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Response {
    const ROUTE: &str = "/api/images/:filename";
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    match state.assets.delete(&filename) {
        Ok(()) => {
            ok_json(
                &state,
                ROUTE,
                started,
                &request_id,
                success_message("Image deleted successfully"),
            )
            .await
        }
        Err(e) => fail(&state, ROUTE, started, &request_id, e.into()).await,
    }
}
