use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use storefront_core::exchange::export_failure_message;
use storefront_core::{
    CustomerApi, CustomerExporter, CustomerImporter, ImportNotice, InterfaceError, RejectedRecord,
};
use tracing::{error, info, warn};
use uuid::Uuid;

const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct CustomersState {
    importer: Arc<CustomerImporter>,
    exporter: Arc<CustomerExporter>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub success_count: usize,
    pub failure_count: usize,
    pub rejected: Vec<RejectedRecord>,
    pub notice: ImportNotice,
}

#[derive(Debug, Serialize)]
pub struct ExchangeError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<ImportNotice>,
    pub correlation_id: String,
}

pub fn router(api: Arc<dyn CustomerApi>, max_upload_bytes: usize) -> Router {
    let state = CustomersState {
        importer: Arc::new(CustomerImporter::new(api.clone())),
        exporter: Arc::new(CustomerExporter::new(api)),
    };

    Router::new()
        .route("/customers/upload", post(upload))
        .route("/customers/download", get(download))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

impl Upload {
    fn empty() -> Self {
        Self { file_name: String::new(), bytes: Vec::new() }
    }
}

/// A request without a `file` part is treated as an empty upload.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, (StatusCode, String)> {
    let read_error = |error: MultipartError| {
        (error.status(), format!("could not read upload: {}", error.body_text()))
    };

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(read_error)?;
        return Ok(Upload { file_name, bytes: bytes.to_vec() });
    }

    Ok(Upload::empty())
}

async fn upload(
    State(state): State<CustomersState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ExchangeError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    // A request that is not multipart at all carries no file.
    let upload = match multipart {
        Ok(mut multipart) => read_upload(&mut multipart).await.map_err(|(status, message)| {
            warn!(
                event_name = "http.customers.upload_unreadable",
                correlation_id = %correlation_id,
                error = %message,
                "customer upload could not be read"
            );
            let body = ExchangeError {
                error: message,
                notice: None,
                correlation_id: correlation_id.clone(),
            };
            (status, Json(body))
        })?,
        Err(rejection) => {
            warn!(
                event_name = "http.customers.upload_not_multipart",
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "customer upload is not a multipart request"
            );
            Upload::empty()
        }
    };

    let result = state.importer.import(&upload.bytes, &upload.file_name).await;
    let notice = ImportNotice::from_result(&result);

    match result {
        Ok(outcome) => {
            info!(
                event_name = "http.customers.upload_completed",
                correlation_id = %correlation_id,
                file_name = %upload.file_name,
                status = outcome.status().as_str(),
                "customer upload processed"
            );
            Ok(Json(UploadResponse {
                status: outcome.status().as_str(),
                success_count: outcome.success_count(),
                failure_count: outcome.failure_count(),
                rejected: outcome.rejected().to_vec(),
                notice,
            }))
        }
        Err(import_error) => {
            let interface =
                InterfaceError::from(import_error).with_correlation_id(correlation_id.clone());
            Err((
                StatusCode::BAD_REQUEST,
                Json(ExchangeError {
                    error: interface.message().to_string(),
                    notice: Some(notice),
                    correlation_id,
                }),
            ))
        }
    }
}

async fn download(
    State(state): State<CustomersState>,
) -> Result<impl IntoResponse, (StatusCode, Json<ExchangeError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    match state.exporter.export().await {
        Ok(artifact) => Ok((
            [
                (header::CONTENT_TYPE, artifact.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.file_name),
                ),
            ],
            artifact.bytes,
        )),
        Err(export_error) => {
            let message = export_failure_message(&export_error);
            let interface =
                InterfaceError::from(export_error).with_correlation_id(correlation_id.clone());
            let status = match interface {
                InterfaceError::ServiceUnavailable { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error!(
                event_name = "http.customers.download_failed",
                correlation_id = %correlation_id,
                error = %interface,
                "customer download failed"
            );
            Err((status, Json(ExchangeError { error: message, notice: None, correlation_id })))
        }
    }
}
