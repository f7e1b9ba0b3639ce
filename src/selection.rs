//! Selection state and derived control gating.
//!
//! The four-level classification hierarchy (standard → version → encoding /
//! message type) is tracked with explicit `Option`s; an unset control is
//! `None` rather than a sentinel string. Gating is a pure function of the
//! selection, the document text, the log, and whether validation is running.

/// Current state of the four selection controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub standard: Option<String>,
    pub version: Option<String>,
    pub encoding: Option<String>,
    pub message_type: Option<String>,
}

impl SelectionState {
    /// True iff all four controls hold a real selection
    pub fn all_selected(&self) -> bool {
        self.standard.is_some()
            && self.version.is_some()
            && self.encoding.is_some()
            && self.message_type.is_some()
    }

    /// Clear version, encoding and message type. Selecting a new standard
    /// invalidates everything below it.
    pub fn clear_dependents_of_standard(&mut self) {
        self.version = None;
        self.encoding = None;
        self.message_type = None;
    }

    /// Clear encoding and message type, which are scoped to (standard, version).
    pub fn clear_dependents_of_version(&mut self) {
        self.encoding = None;
        self.message_type = None;
    }
}

/// Which controls may currently be activated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlStates {
    pub choose_file: bool,
    pub validate: bool,
    pub reset_log: bool,
    pub download_log: bool,
}

impl ControlStates {
    /// Everything disabled. Used while validation is in progress.
    pub fn all_disabled() -> Self {
        Self::default()
    }
}

/// Compute the control states from the observable form state.
///
/// While validating everything is disabled regardless of selection. The
/// validate control additionally requires a non-empty text surface: a picked
/// or dropped file is expected to have been written back into the surface
/// before this is consulted.
pub fn gate(
    selection: &SelectionState,
    validating: bool,
    text_empty: bool,
    log_empty: bool,
) -> ControlStates {
    if validating {
        return ControlStates::all_disabled();
    }
    let all = selection.all_selected();
    ControlStates {
        choose_file: all,
        validate: all && !text_empty,
        reset_log: !log_empty,
        download_log: !log_empty,
    }
}

/// Whether a drop on the input surface may proceed to submission
pub fn drop_allowed(selection: &SelectionState, validating: bool) -> bool {
    selection.all_selected() && !validating
}
