//! The form controller: owns the selection state, the session, and the
//! option cache, and turns user events into API calls and surface updates.
//!
//! Event handlers absorb failures of the cascading option loads (the list
//! just stays empty and the gate stays closed); submission and polling
//! errors from the poller are returned to the caller.

use std::sync::Arc;

use crate::api::{LogDownload, ValidationApi};
use crate::cache::OptionCache;
use crate::config::ClientConfig;
use crate::dragdrop::DragDropController;
use crate::error::Result;
use crate::poller::StatusPoller;
use crate::selection::{ControlStates, SelectionState, gate};
use crate::session::ValidationSession;
use crate::submit::{PickedFile, Submission, UploadSubmitter};
use crate::surface::FormSurface;

pub struct FormController<A, S>
where
    A: ValidationApi,
    S: FormSurface + 'static,
{
    api: A,
    surface: Arc<S>,
    cache: OptionCache,
    selection: SelectionState,
    session: ValidationSession,
    file: Option<PickedFile>,
    dragdrop: DragDropController,
    submitter: UploadSubmitter,
    poller: StatusPoller,
}

impl<A, S> FormController<A, S>
where
    A: ValidationApi,
    S: FormSurface + 'static,
{
    pub fn new(api: A, surface: Arc<S>, config: &ClientConfig) -> Self {
        Self {
            api,
            surface,
            cache: OptionCache::new(),
            selection: SelectionState::default(),
            session: ValidationSession::new(),
            file: None,
            dragdrop: DragDropController::new(config.feedback_delay()),
            submitter: UploadSubmitter::new(config.feedback_delay()),
            poller: StatusPoller::new(config.poll_interval()),
        }
    }

    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn session(&self) -> &ValidationSession {
        &self.session
    }

    fn current_gate(&self) -> ControlStates {
        gate(
            &self.selection,
            self.session.is_validating(),
            self.surface.text().is_empty(),
            self.surface.log().is_empty(),
        )
    }

    fn regate(&self) {
        self.surface.set_controls(self.current_gate());
    }

    /// Session start: load the standards list, then pick up any log the
    /// server already holds (a validation may still be running from before).
    pub async fn init(&mut self) -> Result<()> {
        match self.api.standards().await {
            Ok(standards) => self.surface.set_standard_options(&standards),
            Err(e) => tracing::warn!(error = %e, "failed to load standards"),
        }
        self.regate();
        self.poller
            .check_messages(&self.api, self.surface.as_ref(), &mut self.session)
            .await?;
        self.regate();
        Ok(())
    }

    /// The standard control changed. Dependent selections and their option
    /// lists are cleared before the version list is (re)loaded.
    pub async fn select_standard(&mut self, standard: Option<String>) {
        self.selection.standard = standard;
        self.selection.clear_dependents_of_standard();
        self.surface.set_version_options(&[]);
        self.surface.set_encoding_options(&[]);
        self.surface.set_message_type_options(&[]);

        if let Some(s) = self.selection.standard.clone() {
            let api = &self.api;
            match self.cache.versions(&s, || api.versions(&s)).await {
                Ok(versions) => self.surface.set_version_options(&versions),
                Err(e) => {
                    tracing::warn!(standard = %s, error = %e, "failed to load versions");
                }
            }
        }
        self.regate();
    }

    /// The version control changed. Encoding and message-type lists load
    /// together, both scoped to (standard, version).
    pub async fn select_version(&mut self, version: Option<String>) {
        self.selection.version = version;
        self.selection.clear_dependents_of_version();
        self.surface.set_encoding_options(&[]);
        self.surface.set_message_type_options(&[]);

        let pair = (
            self.selection.standard.clone(),
            self.selection.version.clone(),
        );
        if let (Some(s), Some(v)) = pair {
            let api = &self.api;
            match self.cache.encodings(&s, &v, || api.encodings(&s, &v)).await {
                Ok(encodings) => self.surface.set_encoding_options(&encodings),
                Err(e) => {
                    tracing::warn!(standard = %s, version = %v, error = %e, "failed to load encodings");
                }
            }
            match self
                .cache
                .message_types(&s, &v, || api.message_types(&s, &v))
                .await
            {
                Ok(types) => self.surface.set_message_type_options(&types),
                Err(e) => {
                    tracing::warn!(standard = %s, version = %v, error = %e, "failed to load message types");
                }
            }
        }
        self.regate();
    }

    pub fn select_encoding(&mut self, encoding: Option<String>) {
        self.selection.encoding = encoding;
        self.regate();
    }

    pub fn select_message_type(&mut self, message_type: Option<String>) {
        self.selection.message_type = message_type;
        self.regate();
    }

    /// Replace the document text. Typing into the surface discards any
    /// previously picked file.
    pub fn set_text(&mut self, text: &str) {
        self.file = None;
        self.surface.clear_file_selected();
        self.surface.set_text(text);
        self.regate();
    }

    /// A file was picked through the file chooser. Its content is read back
    /// into the text surface and submitted immediately.
    pub async fn pick_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<()> {
        if !self.current_gate().choose_file {
            tracing::debug!("file pick ignored, control is disabled");
            return Ok(());
        }
        let file = PickedFile {
            name: name.into(),
            bytes,
        };
        self.accept_file(file).await
    }

    /// Drop a held file reference. The text surface, still showing the
    /// read-back, becomes the document again.
    pub fn clear_file(&mut self) {
        self.file = None;
        self.surface.clear_file_selected();
        self.regate();
    }

    /// The validate control was activated: submit the text surface content.
    pub async fn validate(&mut self) -> Result<()> {
        if !self.current_gate().validate {
            tracing::debug!("validate ignored, control is disabled");
            return Ok(());
        }
        self.submit_current().await
    }

    pub fn drag_enter(&mut self) {
        self.dragdrop.drag_enter(self.surface.as_ref());
    }

    pub fn drag_leave(&mut self) {
        self.dragdrop.drag_leave(self.surface.as_ref());
    }

    /// A file was dropped on the input surface. Rejected drops (incomplete
    /// selection or validation running) are discarded by the drag-and-drop
    /// controller; accepted ones submit immediately, like a picked file.
    pub async fn drop_file(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<()> {
        let file = PickedFile {
            name: name.into(),
            bytes,
        };
        let accepted = self
            .dragdrop
            .drop_file(
                self.surface.as_ref(),
                &self.selection,
                self.session.is_validating(),
                file,
            )
            .await;
        match accepted {
            Some(file) => self.accept_file(file).await,
            None => {
                self.regate();
                Ok(())
            }
        }
    }

    async fn accept_file(&mut self, file: PickedFile) -> Result<()> {
        self.surface
            .set_text(&String::from_utf8_lossy(&file.bytes));
        self.surface.show_file_selected(&file.name);
        self.file = Some(file);
        self.submit_current().await
    }

    async fn submit_current(&mut self) -> Result<()> {
        let text = self.surface.text();
        let Some(submission) = Submission::new(self.file.take(), &text, &self.selection) else {
            // Unreachable through the gated entry points
            return Ok(());
        };
        self.submitter
            .submit(&self.api, &self.surface, &mut self.session, submission)
            .await;
        self.surface.clear_file_selected();
        self.poller
            .check_validating(&self.api, self.surface.as_ref(), &mut self.session)
            .await?;
        self.regate();
        Ok(())
    }

    /// Clear the server-side log, then re-poll so the (now empty) log view
    /// reflects what the server holds.
    pub async fn reset_log(&mut self) -> Result<()> {
        if !self.current_gate().reset_log {
            tracing::debug!("reset log ignored, control is disabled");
            return Ok(());
        }
        if let Err(e) = self.api.reset_log().await {
            tracing::warn!(error = %e, "reset log request failed");
        }
        self.surface.set_log("");
        self.session.reset_log();
        self.regate();
        self.poller
            .check_messages(&self.api, self.surface.as_ref(), &mut self.session)
            .await?;
        self.regate();
        Ok(())
    }

    /// Fetch the log bundle. `Ok(None)` means the control was disabled or
    /// the server response carried no usable attachment.
    pub async fn download_log(&self) -> Result<Option<LogDownload>> {
        if !self.current_gate().download_log {
            tracing::debug!("download log ignored, control is disabled");
            return Ok(None);
        }
        self.api.download_log().await
    }
}
