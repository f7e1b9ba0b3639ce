//! Drag-and-drop choreography for the document input surface.
//!
//! Entering a drag clears the text surface so the drop target reads as
//! empty; leaving without dropping restores whatever was there. A drop is
//! only forwarded to submission when the selection hierarchy is complete
//! and no validation is running; otherwise the file is discarded after a
//! transient rejection indicator.

use std::time::Duration;

use crate::selection::{SelectionState, drop_allowed};
use crate::submit::PickedFile;
use crate::surface::FormSurface;

pub struct DragDropController {
    reject_delay: Duration,
    prev_text: Option<String>,
}

impl DragDropController {
    pub fn new(reject_delay: Duration) -> Self {
        Self {
            reject_delay,
            prev_text: None,
        }
    }

    /// A drag entered the input surface: remember the text and blank it
    pub fn drag_enter<S: FormSurface + ?Sized>(&mut self, surface: &S) {
        self.prev_text = Some(surface.text());
        surface.set_text("");
    }

    /// The drag left without dropping: put the text back
    pub fn drag_leave<S: FormSurface + ?Sized>(&mut self, surface: &S) {
        if let Some(prev) = self.prev_text.take() {
            surface.set_text(&prev);
        }
    }

    /// A file was dropped. Returns it when the drop may proceed to
    /// submission; a rejected drop shows the indicator for `reject_delay`,
    /// restores the saved text, and discards the file.
    pub async fn drop_file<S: FormSurface + ?Sized>(
        &mut self,
        surface: &S,
        selection: &SelectionState,
        validating: bool,
        file: PickedFile,
    ) -> Option<PickedFile> {
        if !drop_allowed(selection, validating) {
            tracing::debug!(name = %file.name, "drop rejected, selection incomplete");
            surface.show_drop_rejected();
            tokio::time::sleep(self.reject_delay).await;
            surface.clear_drop_rejected();
            if let Some(prev) = self.prev_text.take() {
                surface.set_text(&prev);
            }
            return None;
        }
        self.prev_text = None;
        Some(file)
    }
}
