use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::multipart::{Field, Multipart, MultipartError},
};

use crate::{
    error::{AppError, AppResult},
    storage::ImageUpload,
};

pub fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

/// Buffers one file field, refusing anything past `max_bytes`.
pub async fn read_image(mut field: Field<'_>, max_bytes: usize) -> AppResult<ImageUpload> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Ukuran berkas melebihi batas {max_bytes} byte"
            )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(ImageUpload {
        file_name,
        content_type,
        data: Bytes::from(data),
    })
}

/// Text fields plus at most one file field named `file_field`.
pub async fn collect_form(
    mut multipart: Multipart,
    file_field: &str,
    max_bytes: usize,
) -> AppResult<(HashMap<String, String>, Option<ImageUpload>)> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            if field.file_name().is_some() {
                file = Some(read_image(field, max_bytes).await?);
            }
        } else if !name.is_empty() {
            let value = field.text().await.map_err(multipart_error)?;
            fields.insert(name, value);
        }
    }

    Ok((fields, file))
}
