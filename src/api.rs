//! HTTP interface to the validation service.
//!
//! `ValidationApi` is the seam between the form controller and the server;
//! `HttpApi` is the reqwest-backed implementation. All endpoints are
//! resolved against the configured base URL and answer JSON, except
//! `upload` (multipart request) and `downloadLog` (binary response).

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Body, Client, Response, multipart};
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::submit::Submission;

/// Progress callback for uploads: (bytes sent, total bytes if known)
pub type ProgressFn = Box<dyn FnMut(u64, Option<u64>) + Send + 'static>;

/// Server status payload. `messages` is present only when the request asked
/// for validation records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub validating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
}

/// A successfully fetched log bundle
#[derive(Debug, Clone)]
pub struct LogDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Operations the validation service exposes to the client
#[async_trait]
pub trait ValidationApi: Send + Sync {
    /// GET `standards`, the root of the selection hierarchy
    async fn standards(&self) -> Result<Vec<String>>;

    /// POST `versions`: versions implemented for a standard
    async fn versions(&self, standard: &str) -> Result<Vec<String>>;

    /// POST `encodings`: encodings implemented for (standard, version)
    async fn encodings(&self, standard: &str, version: &str) -> Result<Vec<String>>;

    /// POST `messagetypes`: raw server list; the caller prepends "Auto Detect"
    async fn message_types(&self, standard: &str, version: &str) -> Result<Vec<String>>;

    /// POST `upload`: submit a document for validation
    async fn upload(&self, submission: &Submission, progress: ProgressFn) -> Result<()>;

    /// POST `status`: poll whether validation is running, optionally with
    /// the accumulated log lines
    async fn status(&self, include_validation_records: bool) -> Result<StatusReport>;

    /// GET `resetLog`: clear the server-side log
    async fn reset_log(&self) -> Result<()>;

    /// GET `downloadLog`: fetch the log bundle. Returns `Ok(None)` when the
    /// `Content-Disposition` header is missing or malformed; that download
    /// is silently skipped.
    async fn download_log(&self) -> Result<Option<LogDownload>>;
}

#[async_trait]
impl<T: ValidationApi + ?Sized> ValidationApi for std::sync::Arc<T> {
    async fn standards(&self) -> Result<Vec<String>> {
        (**self).standards().await
    }

    async fn versions(&self, standard: &str) -> Result<Vec<String>> {
        (**self).versions(standard).await
    }

    async fn encodings(&self, standard: &str, version: &str) -> Result<Vec<String>> {
        (**self).encodings(standard, version).await
    }

    async fn message_types(&self, standard: &str, version: &str) -> Result<Vec<String>> {
        (**self).message_types(standard, version).await
    }

    async fn upload(&self, submission: &Submission, progress: ProgressFn) -> Result<()> {
        (**self).upload(submission, progress).await
    }

    async fn status(&self, include_validation_records: bool) -> Result<StatusReport> {
        (**self).status(include_validation_records).await
    }

    async fn reset_log(&self) -> Result<()> {
        (**self).reset_log().await
    }

    async fn download_log(&self) -> Result<Option<LogDownload>> {
        (**self).download_log().await
    }
}

/// Reqwest-backed implementation of [`ValidationApi`]
pub struct HttpApi {
    client: Client,
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(ClientError::from)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request with an explicit timeout and map non-success statuses
    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<Response> {
        let response = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_seconds),
            request.send(),
        )
        .await
        .map_err(|_| ClientError::Timeout {
            url: url.to_string(),
            timeout_seconds: self.config.timeout_seconds,
        })?
        .map_err(ClientError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                message: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }
        Ok(response)
    }

    async fn fetch_list(&self, path: &str, fields: &[(&str, &str)]) -> Result<Vec<String>> {
        let url = self.config.endpoint(path);
        let response = self.send(self.client.post(&url).form(fields), &url).await?;
        response.json().await.map_err(|e| ClientError::Payload {
            url,
            details: e.to_string(),
        })
    }
}

#[async_trait]
impl ValidationApi for HttpApi {
    async fn standards(&self) -> Result<Vec<String>> {
        tracing::debug!("fetching standards");
        let url = self.config.endpoint("standards");
        let response = self.send(self.client.get(&url), &url).await?;
        response.json().await.map_err(|e| ClientError::Payload {
            url,
            details: e.to_string(),
        })
    }

    async fn versions(&self, standard: &str) -> Result<Vec<String>> {
        tracing::debug!(standard, "fetching versions");
        self.fetch_list("versions", &[("standard", standard)]).await
    }

    async fn encodings(&self, standard: &str, version: &str) -> Result<Vec<String>> {
        tracing::debug!(standard, version, "fetching encodings");
        self.fetch_list("encodings", &[("standard", standard), ("version", version)])
            .await
    }

    async fn message_types(&self, standard: &str, version: &str) -> Result<Vec<String>> {
        tracing::debug!(standard, version, "fetching message types");
        self.fetch_list(
            "messagetypes",
            &[("standard", standard), ("version", version)],
        )
        .await
    }

    async fn upload(&self, submission: &Submission, mut progress: ProgressFn) -> Result<()> {
        let url = self.config.endpoint("upload");
        let (filename, mime, bytes) = submission.document_part();
        let total = bytes.len() as u64;
        tracing::debug!(filename, total, "uploading document");

        progress(0, Some(total));

        // Stream the document in chunks so the progress callback tracks the
        // bytes handed to the transport.
        const CHUNK_SIZE: usize = 64 * 1024;
        let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let mut sent = 0u64;
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            progress(sent, Some(total));
            Ok::<_, std::io::Error>(chunk)
        }));

        let part = multipart::Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(filename)
            .mime_str(mime)?;
        let form = multipart::Form::new()
            .part("uploaded_file", part)
            .text("standard", submission.standard.clone())
            .text("version", submission.version.clone())
            .text("encoding", submission.encoding.clone())
            .text("message_type", submission.message_type.clone());

        let request = self
            .client
            .post(&url)
            .header("Last-Modified", http_date_now())
            .multipart(form);
        self.send(request, &url).await?;
        Ok(())
    }

    async fn status(&self, include_validation_records: bool) -> Result<StatusReport> {
        tracing::debug!(include_validation_records, "polling status");
        let url = self.config.endpoint("status");
        let include = include_validation_records.to_string();
        let request = self
            .client
            .post(&url)
            .form(&[("include_validation_records", include.as_str())]);
        let response = self.send(request, &url).await?;
        response.json().await.map_err(|e| ClientError::Payload {
            url,
            details: e.to_string(),
        })
    }

    async fn reset_log(&self) -> Result<()> {
        tracing::debug!("resetting log");
        let url = self.config.endpoint("resetLog");
        self.send(self.client.get(&url), &url).await?;
        Ok(())
    }

    async fn download_log(&self) -> Result<Option<LogDownload>> {
        tracing::debug!("downloading log");
        let url = self.config.endpoint("downloadLog");
        let response = self.send(self.client.get(&url), &url).await?;

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_attachment_filename);
        let Some(filename) = filename else {
            // The server always builds this header; anything else is skipped
            // without surfacing an error.
            tracing::warn!("downloadLog response had no attachment disposition, skipping");
            return Ok(None);
        };

        let bytes = response.bytes().await.map_err(ClientError::from)?;
        Ok(Some(LogDownload {
            filename,
            bytes: bytes.to_vec(),
        }))
    }
}

/// Extract the filename from a `Content-Disposition` header. The header must
/// match exactly `attachment; filename="<name>"`.
pub fn parse_attachment_filename(disposition: &str) -> Option<String> {
    const PREFIX: &str = "attachment; filename=\"";
    let rest = disposition.strip_prefix(PREFIX)?;
    let name = rest.strip_suffix('"')?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Current time as an HTTP-date, used to stamp the `Last-Modified` header
/// on submissions
fn http_date_now() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
