//! View abstraction driven by the form controller.
//!
//! The controller never touches markup; everything the user sees goes
//! through this trait. Methods take `&self`; implementations own their
//! interior mutability, mirroring how a real view is shared between event
//! handlers. The progress callback of an in-flight upload holds a second
//! handle to the surface, hence the `Send + Sync` bound.

use crate::selection::ControlStates;

pub trait FormSurface: Send + Sync {
    /// Replace the option list of the standard control. The unset option is
    /// always rendered first by the implementation.
    fn set_standard_options(&self, options: &[String]);
    fn set_version_options(&self, options: &[String]);
    fn set_encoding_options(&self, options: &[String]);
    fn set_message_type_options(&self, options: &[String]);

    /// Apply the derived gating to the controls
    fn set_controls(&self, states: ControlStates);

    /// Current content of the document text surface
    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    /// Current content of the log view
    fn log(&self) -> String;
    fn set_log(&self, log: &str);

    /// Upload progress, 0-100
    fn set_progress(&self, percent: u8);
    /// Show or hide the "uploading" state of the input area
    fn show_uploading(&self, on: bool);
    /// Transient post-upload indicator: complete on success, failed otherwise
    fn show_upload_result(&self, ok: bool);
    fn clear_upload_result(&self);

    /// Show or hide the "validating" state of the input area
    fn show_validating(&self, on: bool);

    /// A file was picked or dropped; show its name in place of the text surface
    fn show_file_selected(&self, name: &str);
    fn clear_file_selected(&self);

    /// Transient indicator that a drop was rejected because the selection
    /// hierarchy is incomplete
    fn show_drop_rejected(&self);
    fn clear_drop_rejected(&self);
}
