use crate::services::batch::error::BatchError;
use actix_multipart::{Field, Multipart};
use common::requests::BatchForm;
use futures_util::StreamExt;
use serde_json::from_slice;

/// The parts of a batch upload.
pub(crate) struct BatchUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Present when the request carried a `json` part.
    pub form: Option<BatchForm>,
}

/// Collects the `file` part (and the optional `json` part) of a multipart request.
///
/// Parts may arrive in any order. Unknown parts are ignored. The file is kept in
/// memory; either part is rejected once it grows past `max_bytes`.
pub(crate) async fn read_upload(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<BatchUpload, BatchError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut form: Option<BatchForm> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| BatchError::Upload(e.to_string()))?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some("file") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();

                let bytes = read_field(&mut field, max_bytes).await?;
                file = Some((filename, bytes));
            }

            Some("json") => {
                let bytes = read_field(&mut field, max_bytes).await?;
                form = Some(from_slice(&bytes).map_err(|e| BatchError::Form(e.to_string()))?);
            }

            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or(BatchError::MissingPart("file"))?;
    Ok(BatchUpload {
        file_name,
        bytes,
        form,
    })
}

/// Buffers one multipart field, failing as soon as it exceeds `max_bytes`.
async fn read_field(field: &mut Field, max_bytes: usize) -> Result<Vec<u8>, BatchError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| BatchError::Upload(e.to_string()))?;
        if bytes.len() + chunk.len() > max_bytes {
            return Err(BatchError::TooLarge(max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
