//! Signed upload client for the hosted media service.

use std::sync::Arc;

use reqwest::multipart::Form;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{BufferedFile, MediaError, UploadResult};
use crate::config::MediaConfig;

/// Resource type sent in the upload path; lets the service detect it.
const RESOURCE_TYPE: &str = "auto";

const SIGNATURE_ALGORITHM: &str = "sha256";

/// Client for the media service upload API.
///
/// Stateless apart from credentials; concurrent uploads are independent.
#[derive(Clone)]
pub struct MediaClient {
    inner: Arc<MediaClientInner>,
}

struct MediaClientInner {
    client: reqwest::Client,
    upload_url: Url,
    api_key: String,
    api_secret: SecretString,
}

impl MediaClient {
    /// Create a new upload client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the API base URL
    /// cannot carry the upload path.
    pub fn new(config: &MediaConfig) -> Result<Self, MediaError> {
        let mut upload_url = config.api_url.clone();
        upload_url
            .path_segments_mut()
            .map_err(|()| MediaError::InvalidUrl(config.api_url.to_string()))?
            .pop_if_empty()
            .extend(["v1_1", config.cloud_name.as_str(), RESOURCE_TYPE, "upload"]);

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(MediaClientInner {
                client,
                upload_url,
                api_key: config.api_key.clone(),
                api_secret: config.api_secret.clone(),
            }),
        })
    }

    /// Upload one buffered file and return the service's response unmodified.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Api` for any non-2xx answer (auth, quota, invalid
    /// file), `MediaError::Http` for transport failures and
    /// `MediaError::Parse` if the body is not a JSON object.
    #[instrument(skip(self, file), fields(
        file_name = file.file_name.as_deref().unwrap_or(""),
        content_type = %file.content_type,
        size = file.bytes.len(),
    ))]
    pub async fn upload(&self, file: &BufferedFile) -> Result<UploadResult, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("timestamp", timestamp.as_str())],
            self.inner.api_secret.expose_secret(),
        );

        let form = Form::new()
            .text("file", file.to_data_uri())
            .text("api_key", self.inner.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", SIGNATURE_ALGORITHM);

        let response = self
            .inner
            .client
            .post(self.inner.upload_url.clone())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = %status, message = %message, "Media service rejected upload");
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: UploadResult = serde_json::from_str(&body)?;
        debug!(public_id = ?result.public_id(), "Upload complete");
        Ok(result)
    }
}

/// Sign request parameters: sorted `k=v` pairs joined by `&`, followed by the
/// API secret, hashed with SHA-256 and hex encoded.
fn sign(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let payload = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha256::digest(format!("{payload}{secret}").as_bytes());
    format!("{digest:x}")
}

/// The service reports errors as `{"error": {"message": ...}}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
