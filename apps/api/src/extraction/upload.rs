use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// The uploaded document part of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Text fields plus the optional `file` part of a multipart upload.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Returns a non-blank text field, trimmed.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Reads every part of a multipart body. A part named `file` is kept as bytes;
/// every other named part is read as text.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let filename = field.file_name().unwrap_or("upload.txt").to_string();
            let data = field.bytes().await?;
            // An empty file input is submitted as a nameless, zero-length part.
            if !data.is_empty() || !filename.is_empty() {
                form.file = Some(UploadedFile { filename, data });
            }
        } else if !name.is_empty() {
            let value = field.text().await?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
