//! In-memory multipart intake.

use axum::body::Bytes;
use axum::extract::Multipart;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::MediaError;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "my_file";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A single uploaded file held fully in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

impl BufferedFile {
    #[must_use]
    pub fn new(file_name: Option<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name,
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Buffer the field named `field_name`, skipping any others.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidFile` if the body is not valid multipart or
    /// the field is missing.
    pub async fn from_multipart(
        mut multipart: Multipart,
        field_name: &str,
    ) -> Result<Self, MediaError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| MediaError::InvalidFile(e.body_text()))?
        {
            if field.name() != Some(field_name) {
                continue;
            }

            let file_name = field.file_name().map(str::to_owned);
            let content_type = field
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| MediaError::InvalidFile(e.body_text()))?;

            return Ok(Self::new(file_name, content_type, bytes));
        }

        Err(MediaError::InvalidFile(format!(
            "missing multipart field '{field_name}'"
        )))
    }

    /// `data:{mime};base64,{payload}` URI of the buffered bytes.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        )
    }
}
