use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use validate_client::{
    ClientError, ControlStates, FormSurface, LogDownload, ProgressFn, Result, StatusReport,
    Submission, ValidationApi,
};

/// Every call made against the mock service, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiCall {
    Standards,
    Versions(String),
    Encodings(String, String),
    MessageTypes(String, String),
    Upload {
        standard: String,
        version: String,
        encoding: String,
        message_type: String,
        filename: String,
        size: u64,
    },
    Status {
        include_records: bool,
    },
    ResetLog,
    DownloadLog,
}

/// Mock validation service with canned option lists, a scripted sequence of
/// status responses, and a request log
pub struct MockApi {
    standards: Vec<String>,
    versions: HashMap<String, Vec<String>>,
    encodings: HashMap<(String, String), Vec<String>>,
    message_types: HashMap<(String, String), Vec<String>>,
    status_script: Mutex<VecDeque<StatusReport>>,
    fail_upload: AtomicBool,
    fail_versions: AtomicBool,
    fail_status: AtomicBool,
    download: Mutex<Option<LogDownload>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            standards: Vec::new(),
            versions: HashMap::new(),
            encodings: HashMap::new(),
            message_types: HashMap::new(),
            status_script: Mutex::new(VecDeque::new()),
            fail_upload: AtomicBool::new(false),
            fail_versions: AtomicBool::new(false),
            fail_status: AtomicBool::new(false),
            download: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A small realistic catalog: two standards, one of them fully populated
    pub fn with_catalog() -> Self {
        let mut api = Self::new();
        api.standards = vec!["TMDD".to_string(), "NTCIP".to_string()];
        api.versions.insert(
            "TMDD".to_string(),
            vec!["3.1".to_string(), "3.03d".to_string()],
        );
        api.encodings.insert(
            ("TMDD".to_string(), "3.1".to_string()),
            vec!["XML".to_string()],
        );
        api.message_types.insert(
            ("TMDD".to_string(), "3.1".to_string()),
            vec![
                "deviceInformationUpdate".to_string(),
                "fullEventUpdate".to_string(),
            ],
        );
        api
    }

    /// Queue the next status response. Responses are consumed in order; once
    /// the script runs dry the service answers idle with an empty log.
    fn push_status(&self, validating: bool, messages: Option<&[&str]>) {
        self.status_script.lock().unwrap().push_back(StatusReport {
            validating,
            messages: messages.map(|m| m.iter().map(|s| s.to_string()).collect()),
        });
    }

    /// Validation running, flag-only response
    pub fn push_running(&self) {
        self.push_status(true, None);
    }

    /// Validation running, with the log lines so far
    pub fn push_running_with_log(&self, messages: &[&str]) {
        self.push_status(true, Some(messages));
    }

    /// Not running, flag-only response (no `messages` field)
    pub fn push_idle(&self) {
        self.push_status(false, None);
    }

    /// Not running, with the final log lines
    pub fn push_final_log(&self, messages: &[&str]) {
        self.push_status(false, Some(messages));
    }

    pub fn set_fail_upload(&self, fail: bool) {
        self.fail_upload.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_versions(&self, fail: bool) {
        self.fail_versions.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_status(&self, fail: bool) {
        self.fail_status.store(fail, Ordering::SeqCst);
    }

    pub fn set_download(&self, filename: &str, bytes: Vec<u8>) {
        *self.download.lock().unwrap() = Some(LogDownload {
            filename: filename.to_string(),
            bytes,
        });
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::Status { include_records } => Some(include_records),
                _ => None,
            })
            .collect()
    }

    fn log(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn not_found(&self, what: &str) -> ClientError {
        ClientError::HttpStatus {
            url: format!("mock://{what}"),
            status: 404,
            message: "Not Found".to_string(),
        }
    }
}

#[async_trait]
impl ValidationApi for MockApi {
    async fn standards(&self) -> Result<Vec<String>> {
        self.log(ApiCall::Standards);
        Ok(self.standards.clone())
    }

    async fn versions(&self, standard: &str) -> Result<Vec<String>> {
        self.log(ApiCall::Versions(standard.to_string()));
        if self.fail_versions.load(Ordering::SeqCst) {
            return Err(self.not_found("versions"));
        }
        self.versions
            .get(standard)
            .cloned()
            .ok_or_else(|| self.not_found("versions"))
    }

    async fn encodings(&self, standard: &str, version: &str) -> Result<Vec<String>> {
        self.log(ApiCall::Encodings(standard.to_string(), version.to_string()));
        self.encodings
            .get(&(standard.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| self.not_found("encodings"))
    }

    async fn message_types(&self, standard: &str, version: &str) -> Result<Vec<String>> {
        self.log(ApiCall::MessageTypes(
            standard.to_string(),
            version.to_string(),
        ));
        self.message_types
            .get(&(standard.to_string(), version.to_string()))
            .cloned()
            .ok_or_else(|| self.not_found("messagetypes"))
    }

    async fn upload(&self, submission: &Submission, mut progress: ProgressFn) -> Result<()> {
        let (filename, _mime, bytes) = submission.document_part();
        let size = bytes.len() as u64;
        self.log(ApiCall::Upload {
            standard: submission.standard.clone(),
            version: submission.version.clone(),
            encoding: submission.encoding.clone(),
            message_type: submission.message_type.clone(),
            filename,
            size,
        });

        progress(0, Some(size));
        progress(size, Some(size));

        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(ClientError::HttpStatus {
                url: "mock://upload".to_string(),
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }

    async fn status(&self, include_validation_records: bool) -> Result<StatusReport> {
        self.log(ApiCall::Status {
            include_records: include_validation_records,
        });
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(ClientError::HttpStatus {
                url: "mock://status".to_string(),
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(self
            .status_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StatusReport {
                validating: false,
                messages: Some(Vec::new()),
            }))
    }

    async fn reset_log(&self) -> Result<()> {
        self.log(ApiCall::ResetLog);
        Ok(())
    }

    async fn download_log(&self) -> Result<Option<LogDownload>> {
        self.log(ApiCall::DownloadLog);
        Ok(self.download.lock().unwrap().clone())
    }
}

/// Every surface mutation the controller performs, in order
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    StandardOptions(Vec<String>),
    VersionOptions(Vec<String>),
    EncodingOptions(Vec<String>),
    MessageTypeOptions(Vec<String>),
    Controls(ControlStates),
    Text(String),
    Log(String),
    Progress(u8),
    Uploading(bool),
    UploadResult(bool),
    UploadResultCleared,
    Validating(bool),
    FileSelected(String),
    FileSelectedCleared,
    DropRejected,
    DropRejectedCleared,
}

#[derive(Default)]
struct SurfaceState {
    standard_options: Vec<String>,
    version_options: Vec<String>,
    encoding_options: Vec<String>,
    message_type_options: Vec<String>,
    controls: ControlStates,
    text: String,
    log: String,
    progress: u8,
}

/// Form surface that records every mutation alongside the resulting state
#[derive(Default)]
pub struct RecordingSurface {
    state: Mutex<SurfaceState>,
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn controls(&self) -> ControlStates {
        self.state.lock().unwrap().controls
    }

    pub fn standard_options(&self) -> Vec<String> {
        self.state.lock().unwrap().standard_options.clone()
    }

    pub fn version_options(&self) -> Vec<String> {
        self.state.lock().unwrap().version_options.clone()
    }

    pub fn encoding_options(&self) -> Vec<String> {
        self.state.lock().unwrap().encoding_options.clone()
    }

    pub fn message_type_options(&self) -> Vec<String> {
        self.state.lock().unwrap().message_type_options.clone()
    }

    pub fn progress(&self) -> u8 {
        self.state.lock().unwrap().progress
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl FormSurface for RecordingSurface {
    fn set_standard_options(&self, options: &[String]) {
        self.state.lock().unwrap().standard_options = options.to_vec();
        self.record(SurfaceEvent::StandardOptions(options.to_vec()));
    }

    fn set_version_options(&self, options: &[String]) {
        self.state.lock().unwrap().version_options = options.to_vec();
        self.record(SurfaceEvent::VersionOptions(options.to_vec()));
    }

    fn set_encoding_options(&self, options: &[String]) {
        self.state.lock().unwrap().encoding_options = options.to_vec();
        self.record(SurfaceEvent::EncodingOptions(options.to_vec()));
    }

    fn set_message_type_options(&self, options: &[String]) {
        self.state.lock().unwrap().message_type_options = options.to_vec();
        self.record(SurfaceEvent::MessageTypeOptions(options.to_vec()));
    }

    fn set_controls(&self, states: ControlStates) {
        self.state.lock().unwrap().controls = states;
        self.record(SurfaceEvent::Controls(states));
    }

    fn text(&self) -> String {
        self.state.lock().unwrap().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.state.lock().unwrap().text = text.to_string();
        self.record(SurfaceEvent::Text(text.to_string()));
    }

    fn log(&self) -> String {
        self.state.lock().unwrap().log.clone()
    }

    fn set_log(&self, log: &str) {
        self.state.lock().unwrap().log = log.to_string();
        self.record(SurfaceEvent::Log(log.to_string()));
    }

    fn set_progress(&self, percent: u8) {
        self.state.lock().unwrap().progress = percent;
        self.record(SurfaceEvent::Progress(percent));
    }

    fn show_uploading(&self, on: bool) {
        self.record(SurfaceEvent::Uploading(on));
    }

    fn show_upload_result(&self, ok: bool) {
        self.record(SurfaceEvent::UploadResult(ok));
    }

    fn clear_upload_result(&self) {
        self.record(SurfaceEvent::UploadResultCleared);
    }

    fn show_validating(&self, on: bool) {
        self.record(SurfaceEvent::Validating(on));
    }

    fn show_file_selected(&self, name: &str) {
        self.record(SurfaceEvent::FileSelected(name.to_string()));
    }

    fn clear_file_selected(&self) {
        self.record(SurfaceEvent::FileSelectedCleared);
    }

    fn show_drop_rejected(&self) {
        self.record(SurfaceEvent::DropRejected);
    }

    fn clear_drop_rejected(&self) {
        self.record(SurfaceEvent::DropRejectedCleared);
    }
}
