/// Phase of the validation session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No submission in flight and no polling outstanding
    #[default]
    Idle,
    /// Upload request issued, response not yet handled
    Submitting,
    /// Polling, but the server has not yet confirmed progress with log content
    PollingQuiet,
    /// Validation confirmed running, fixed-interval polling
    PollingActive,
}

/// Client-side view of one validation session.
///
/// Created Idle with no log fetched at page load. Set to Submitting before
/// the upload round trip so gating reacts instantly, driven through the
/// polling phases, and returned to Idle only once the server reports
/// `validating = false` and log content has been fetched since the last
/// reset.
#[derive(Debug, Clone, Default)]
pub struct ValidationSession {
    pub phase: SessionPhase,
    /// Whether log content has been fetched at least once since the last reset
    pub log_fetched: bool,
}

impl ValidationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// True whenever a submission or poll chain is outstanding
    pub fn is_validating(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    /// Enter Submitting. Called synchronously before the upload request is
    /// issued; SelectionGate keeps the triggering controls disabled until
    /// the terminal transition, so this is never re-entered mid-flight.
    pub fn begin_submission(&mut self) {
        self.phase = SessionPhase::Submitting;
    }

    /// Terminal transition back to Idle
    pub fn finish(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    /// Forget that log content was ever fetched. Used after a log reset.
    pub fn reset_log(&mut self) {
        self.log_fetched = false;
    }
}
