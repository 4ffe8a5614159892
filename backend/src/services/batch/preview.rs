use crate::config::AppConfig;
use crate::services::batch::error::BatchError;
use crate::services::batch::normalize::normalize;
use crate::services::batch::sheet::read_table;
use crate::services::batch::upload::read_upload;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::requests::PreviewResponse;
use log::warn;

/// Actix handler for `POST /api/batch/preview`.
///
/// - On success: `200 OK` with a `PreviewResponse` JSON body.
/// - On failure: `400 Bad Request` with the error message.
pub(crate) async fn process(config: web::Data<AppConfig>, payload: Multipart) -> impl Responder {
    match preview_batch(payload, config.max_upload_bytes).await {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(e) => {
            warn!("Preview rejected: {}", e);
            HttpResponse::BadRequest().body(format!("Error: {}", e))
        }
    }
}

async fn preview_batch(payload: Multipart, max_bytes: usize) -> Result<PreviewResponse, BatchError> {
    let upload = read_upload(payload, max_bytes).await?;
    let table = read_table(&upload.file_name, upload.bytes)?;
    let rows = normalize(table)?;
    Ok(PreviewResponse {
        total_rows: rows.len(),
        rows,
    })
}
