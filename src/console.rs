//! Terminal rendition of the form surface.
//!
//! Holds the same state a page would (option lists, text, log, control
//! gating) behind a mutex and narrates the interesting transitions to
//! stdout: upload progress, the transient upload result, validation start,
//! and log lines as they arrive. Colors and the progress line are only
//! emitted on a TTY.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use crate::selection::ControlStates;
use crate::surface::FormSurface;

#[derive(Default)]
struct ConsoleState {
    standard_options: Vec<String>,
    version_options: Vec<String>,
    encoding_options: Vec<String>,
    message_type_options: Vec<String>,
    controls: ControlStates,
    text: String,
    log: String,
    /// How many log lines have already been printed
    printed_log_lines: usize,
    uploading: bool,
    validating_announced: bool,
}

pub struct ConsoleSurface {
    state: Mutex<ConsoleState>,
    show_colors: bool,
    quiet: bool,
}

impl ConsoleSurface {
    pub fn new(quiet: bool) -> Self {
        Self {
            state: Mutex::new(ConsoleState::default()),
            show_colors: atty::is(atty::Stream::Stdout),
            quiet,
        }
    }

    fn state(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap()
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn say(&self, line: &str) {
        if !self.quiet {
            println!("{line}");
        }
    }

    pub fn standard_options(&self) -> Vec<String> {
        self.state().standard_options.clone()
    }

    pub fn version_options(&self) -> Vec<String> {
        self.state().version_options.clone()
    }

    pub fn encoding_options(&self) -> Vec<String> {
        self.state().encoding_options.clone()
    }

    pub fn message_type_options(&self) -> Vec<String> {
        self.state().message_type_options.clone()
    }

    pub fn controls(&self) -> ControlStates {
        self.state().controls
    }
}

impl FormSurface for ConsoleSurface {
    fn set_standard_options(&self, options: &[String]) {
        self.state().standard_options = options.to_vec();
    }

    fn set_version_options(&self, options: &[String]) {
        self.state().version_options = options.to_vec();
    }

    fn set_encoding_options(&self, options: &[String]) {
        self.state().encoding_options = options.to_vec();
    }

    fn set_message_type_options(&self, options: &[String]) {
        self.state().message_type_options = options.to_vec();
    }

    fn set_controls(&self, states: ControlStates) {
        self.state().controls = states;
    }

    fn text(&self) -> String {
        self.state().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.state().text = text.to_string();
    }

    fn log(&self) -> String {
        self.state().log.clone()
    }

    fn set_log(&self, log: &str) {
        let mut state = self.state();
        // Print only the lines that are new since the last refresh
        let total = log.lines().count();
        if total < state.printed_log_lines {
            state.printed_log_lines = 0;
        }
        if !self.quiet {
            for line in log.lines().skip(state.printed_log_lines) {
                println!("{line}");
            }
        }
        state.printed_log_lines = total;
        state.log = log.to_string();
    }

    fn set_progress(&self, percent: u8) {
        if self.quiet || !self.show_colors {
            return;
        }
        print!("\rUploading: {percent:3}%");
        let _ = std::io::stdout().flush();
    }

    fn show_uploading(&self, on: bool) {
        self.state().uploading = on;
    }

    fn show_upload_result(&self, ok: bool) {
        if self.state().uploading && self.show_colors && !self.quiet {
            // End the progress line
            println!();
        }
        if ok {
            self.say(&self.colorize("upload complete", "32"));
        } else {
            self.say(&self.colorize("upload failed", "31"));
        }
    }

    fn clear_upload_result(&self) {}

    fn show_validating(&self, on: bool) {
        let mut state = self.state();
        if on && !state.validating_announced {
            state.validating_announced = true;
            drop(state);
            self.say("validating...");
        } else if !on {
            state.validating_announced = false;
        }
    }

    fn show_file_selected(&self, name: &str) {
        self.say(&format!("submitting {name}"));
    }

    fn clear_file_selected(&self) {}

    fn show_drop_rejected(&self) {
        self.say(&self.colorize(
            "drop ignored: complete the selection hierarchy first",
            "33",
        ));
    }

    fn clear_drop_rejected(&self) {}
}
