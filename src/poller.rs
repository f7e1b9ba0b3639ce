//! Status polling loop: the only path by which a session returns to Idle.
//!
//! Two entry points share one loop. `check_messages` asks for the log
//! lines on the first request (page load, after a log reset);
//! `check_validating` asks only for the running flag (right after an
//! upload). While the server reports `validating = true` the loop re-polls
//! on a fixed interval with the flag-only request; the moment it reports
//! `validating = false` without log content, one more records request is
//! issued immediately so the final log is never missed.

use std::time::Duration;

use crate::api::ValidationApi;
use crate::error::Result;
use crate::selection::ControlStates;
use crate::session::{SessionPhase, ValidationSession};
use crate::surface::FormSurface;

pub struct StatusPoller {
    poll_interval: Duration,
}

impl StatusPoller {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Poll starting with a records request. Used at session start and
    /// after a log reset, where the log view must be (re)populated.
    pub async fn check_messages<A, S>(
        &self,
        api: &A,
        surface: &S,
        session: &mut ValidationSession,
    ) -> Result<()>
    where
        A: ValidationApi + ?Sized,
        S: FormSurface + ?Sized,
    {
        self.run(api, surface, session, true).await
    }

    /// Poll starting with a flag-only request. Used right after an upload,
    /// where the first question is only whether validation is running.
    pub async fn check_validating<A, S>(
        &self,
        api: &A,
        surface: &S,
        session: &mut ValidationSession,
    ) -> Result<()>
    where
        A: ValidationApi + ?Sized,
        S: FormSurface + ?Sized,
    {
        self.run(api, surface, session, false).await
    }

    async fn run<A, S>(
        &self,
        api: &A,
        surface: &S,
        session: &mut ValidationSession,
        mut include_records: bool,
    ) -> Result<()>
    where
        A: ValidationApi + ?Sized,
        S: FormSurface + ?Sized,
    {
        loop {
            let report = api.status(include_records).await?;

            if let Some(messages) = &report.messages {
                // An empty list still counts as fetched content
                surface.set_log(&render_log(messages));
                session.log_fetched = true;
            }

            if report.validating {
                session.phase = SessionPhase::PollingActive;
                surface.show_validating(true);
                surface.set_controls(ControlStates::all_disabled());
                tokio::time::sleep(self.poll_interval).await;
                // Steady-state polls only need the flag
                include_records = false;
            } else if report.messages.is_some() {
                session.finish();
                surface.show_validating(false);
                return Ok(());
            } else {
                // Not validating, but this response carried no log content.
                // Re-issue immediately with records so the terminal
                // transition always lands with the final log in view.
                session.phase = SessionPhase::PollingQuiet;
                include_records = true;
            }
        }
    }
}

/// Render log lines the way the log view shows them: one line per message,
/// each newline-terminated
pub fn render_log(messages: &[String]) -> String {
    let mut out = String::with_capacity(messages.iter().map(|m| m.len() + 1).sum());
    for message in messages {
        out.push_str(message);
        out.push('\n');
    }
    out
}
