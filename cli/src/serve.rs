//! HTTP upload service for outline extraction.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use colored::Colorize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use pdftoc::{Error, ExtractOptions};

/// Multipart bodies above this size are rejected before extraction.
const UPLOAD_LIMIT: usize = 64 * 1024 * 1024;

/// Requests past this budget return a truncated outline instead of
/// holding the connection.
const TIME_BUDGET: Duration = Duration::from_secs(30);

pub async fn run(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(health))
        .route("/extract-headings", post(extract_headings))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
        .layer(cors);

    println!("{} http://{}", "Listening on".green(), addr);
    println!("Health endpoint: http://{}/", addr);
    println!("Extraction endpoint: http://{}/extract-headings", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "message": "pdftoc outline extraction service",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "pdftoc",
    }))
}

async fn extract_headings(mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        upload = Some((filename, bytes.to_vec()));
                        break;
                    }
                    Err(e) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("failed to read upload: {e}"),
                        );
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, format!("invalid multipart body: {e}"));
            }
        }
    }

    let (filename, data) = match upload {
        Some(upload) => upload,
        None => {
            return error_response(StatusCode::BAD_REQUEST, "missing multipart field 'file'");
        }
    };

    if !filename.to_lowercase().ends_with(".pdf") {
        return error_response(StatusCode::BAD_REQUEST, "upload must be a .pdf file");
    }
    if !pdftoc::is_pdf_bytes(&data) {
        return error_response(StatusCode::BAD_REQUEST, "upload is not a PDF document");
    }

    log::debug!("extract-headings: {} ({} bytes)", filename, data.len());

    // Extraction is CPU-bound; keep it off the async reactor.
    let extracted = tokio::task::spawn_blocking(move || {
        let options = ExtractOptions::new().with_time_budget(TIME_BUDGET);
        pdftoc::extract_outline_with_options(&data, &filename, &options)
    })
    .await;

    match extracted {
        Ok(Ok(outline)) => Json(outline).into_response(),
        Ok(Err(err)) if err.is_unreadable() => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        Ok(Err(Error::TooLarge(message))) => error_response(StatusCode::BAD_REQUEST, message),
        Ok(Err(err)) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        Err(join_err) => {
            log::error!("extraction task failed: {join_err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "extraction task failed")
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}
