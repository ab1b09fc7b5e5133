//! Media upload helper.
//!
//! Forwards a single in-memory file to the hosted media service
//! (Cloudinary-compatible upload API) and returns the service's response
//! untouched.
//!
//! Uploads go through two stages:
//!
//! 1. [`BufferedFile::from_multipart`] buffers the `my_file` field of an
//!    incoming `multipart/form-data` request in memory.
//! 2. [`MediaClient::upload`] encodes the buffer as a data URI and posts it to
//!    `/v1_1/{cloud}/auto/upload` with a signed request.

mod client;
mod intake;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use client::MediaClient;
pub use intake::{BufferedFile, UPLOAD_FIELD};

/// Errors from the media upload helper.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Network or transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The media service rejected the upload.
    #[error("Media service error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The media service answered with something other than a JSON object.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The incoming upload could not be read.
    #[error("Invalid upload: {0}")]
    InvalidFile(String),

    /// The configured API base cannot carry an upload path.
    #[error("Invalid media API URL: {0}")]
    InvalidUrl(String),
}

/// Upload response exactly as returned by the media service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadResult(Map<String, Value>);

impl UploadResult {
    /// HTTPS delivery URL of the stored asset.
    #[must_use]
    pub fn secure_url(&self) -> Option<&str> {
        self.str_field("secure_url")
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.str_field("url")
    }

    #[must_use]
    pub fn public_id(&self) -> Option<&str> {
        self.str_field("public_id")
    }

    /// Any field of the response.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}
