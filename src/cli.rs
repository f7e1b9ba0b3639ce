//! Command line interface definitions

use std::path::PathBuf;

use clap::Parser;

use crate::cache::AUTO_DETECT;
use crate::config::ClientConfig;

#[derive(Parser, Debug)]
#[command(
    name = "validate-client",
    about = "Submit documents to a message validation service and follow the run",
    version
)]
pub struct Cli {
    /// Document to submit for validation
    pub file: Option<PathBuf>,

    /// Inline document text to submit instead of a file
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Base URL of the validation service
    #[arg(short = 'u', long, default_value = "http://localhost:8080/")]
    pub base_url: String,

    /// Standard to validate against; omit to list the available standards
    #[arg(short, long)]
    pub standard: Option<String>,

    /// Version of the standard; omit to list the available versions
    #[arg(short = 'r', long = "standard-version")]
    pub standard_version: Option<String>,

    /// Document encoding; omit to list the available encodings
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Message type; the default lets the server infer it
    #[arg(short, long, default_value = AUTO_DETECT)]
    pub message_type: String,

    /// Clear the server-side log before submitting
    #[arg(long)]
    pub reset_log: bool,

    /// Download the log bundle into this directory after the run
    #[arg(long, value_name = "DIR")]
    pub download_log: Option<PathBuf>,

    /// Interval between status polls in milliseconds
    #[arg(long, default_value = "1000")]
    pub poll_interval_ms: u64,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Validate argument combinations beyond what clap can express
    pub fn validate(&self) -> Result<(), String> {
        if let Some(file) = &self.file {
            if !file.exists() {
                return Err(format!("file does not exist: {}", file.display()));
            }
            if !file.is_file() {
                return Err(format!("not a file: {}", file.display()));
            }
        }

        if self.file.is_some() || self.text.is_some() {
            if self.standard.is_none() {
                return Err("--standard is required when submitting a document".to_string());
            }
            if self.standard_version.is_none() {
                return Err(
                    "--standard-version is required when submitting a document".to_string()
                );
            }
            if self.encoding.is_none() {
                return Err("--encoding is required when submitting a document".to_string());
            }
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.base_url.clone());
        config.timeout_seconds = self.timeout;
        config.poll_interval_ms = self.poll_interval_ms;
        config
    }
}
