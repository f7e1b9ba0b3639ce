//! # validate-client Library
//!
//! An async Rust client for a message validation service: it drives the
//! service's document-submission form programmatically, with cached
//! selection hierarchies, gated controls, upload progress, and a polling
//! loop that follows a validation run to completion.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod console;
pub mod controller;
pub mod dragdrop;
pub mod error;
pub mod poller;
pub mod selection;
pub mod session;
pub mod submit;
pub mod surface;

pub use api::{HttpApi, LogDownload, ProgressFn, StatusReport, ValidationApi};
pub use cache::{AUTO_DETECT, OptionCache};
pub use cli::Cli;
pub use config::ClientConfig;
pub use console::ConsoleSurface;
pub use controller::FormController;
pub use dragdrop::DragDropController;
pub use error::{ClientError, Result};
pub use poller::StatusPoller;
pub use selection::{ControlStates, SelectionState, drop_allowed, gate};
pub use session::{SessionPhase, ValidationSession};
pub use submit::{Document, PickedFile, Submission, UploadSubmitter};
pub use surface::FormSurface;
