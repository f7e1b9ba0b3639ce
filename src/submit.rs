//! Submission payload and the upload half of the submit → poll lifecycle.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{ProgressFn, ValidationApi};
use crate::selection::{ControlStates, SelectionState};
use crate::session::ValidationSession;
use crate::surface::FormSurface;

/// Name given to inline text submitted as a document
pub const TEXT_UPLOAD_NAME: &str = "upload.txt";

/// A file the user picked or dropped onto the input surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// The document half of a submission: a picked file, or the content of the
/// text surface. Mutually exclusive by construction.
#[derive(Debug, Clone)]
pub enum Document {
    File(PickedFile),
    Text(String),
}

/// Everything the `upload` endpoint needs: the document plus the four
/// selected identifiers
#[derive(Debug, Clone)]
pub struct Submission {
    pub document: Document,
    pub standard: String,
    pub version: String,
    pub encoding: String,
    pub message_type: String,
}

impl Submission {
    /// Build a submission from the current form state. Returns `None` when
    /// the selection hierarchy is incomplete; the gate keeps the triggering
    /// controls disabled in that case, so the unset token can never reach
    /// the server.
    pub fn new(file: Option<PickedFile>, text: &str, selection: &SelectionState) -> Option<Self> {
        let document = match file {
            Some(file) => Document::File(file),
            None => Document::Text(text.to_string()),
        };
        Some(Self {
            document,
            standard: selection.standard.clone()?,
            version: selection.version.clone()?,
            encoding: selection.encoding.clone()?,
            message_type: selection.message_type.clone()?,
        })
    }

    /// The multipart file part: (filename, mime type, bytes). Inline text is
    /// re-encoded as a plain-text file named `upload.txt`.
    pub fn document_part(&self) -> (String, &'static str, Vec<u8>) {
        match &self.document {
            Document::File(file) => (
                file.name.clone(),
                "application/octet-stream",
                file.bytes.clone(),
            ),
            Document::Text(text) => (
                TEXT_UPLOAD_NAME.to_string(),
                "text/plain",
                text.as_bytes().to_vec(),
            ),
        }
    }
}

/// Issues the upload request and drives the surface through the upload
/// feedback sequence: instant gating, 0-100 progress, a transient
/// complete/failed indicator, then hand-off to the poller.
pub struct UploadSubmitter {
    feedback_delay: Duration,
}

impl UploadSubmitter {
    pub fn new(feedback_delay: Duration) -> Self {
        Self { feedback_delay }
    }

    /// Submit a document. The session is set to Submitting before the
    /// network round trip so the gate reacts instantly. A failed upload is
    /// absorbed here: the server is assumed to have recorded some terminal
    /// state, and the caller proceeds to the poller either way.
    pub async fn submit<A, S>(
        &self,
        api: &A,
        surface: &Arc<S>,
        session: &mut ValidationSession,
        submission: Submission,
    ) where
        A: ValidationApi + ?Sized,
        S: FormSurface + 'static,
    {
        session.begin_submission();
        surface.set_controls(ControlStates::all_disabled());
        surface.set_progress(0);
        surface.show_uploading(true);

        let progress_surface = Arc::clone(surface);
        let progress: ProgressFn = Box::new(move |sent, total| {
            if let Some(total) = total.filter(|t| *t > 0) {
                let percent = ((sent as f64 / total as f64) * 100.0).round() as u8;
                progress_surface.set_progress(percent.min(100));
            }
        });

        match api.upload(&submission, progress).await {
            Ok(()) => {
                surface.set_progress(100);
                surface.show_upload_result(true);
            }
            Err(e) => {
                tracing::warn!(error = %e, "upload failed");
                surface.set_progress(0);
                surface.show_upload_result(false);
            }
        }

        tokio::time::sleep(self.feedback_delay).await;
        surface.clear_upload_result();
        surface.show_uploading(false);
        surface.show_validating(true);
    }
}
