//! Page-level submission flow.
//!
//! A [`SubmissionSession`] plays the role of the upload page: it gates
//! re-submission with a busy flag, assembles the request from the form,
//! posts it to the relay through an [`AnalysisGateway`], and keeps the last
//! result view or error message for display.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use log::{info, warn};
use parking_lot::RwLock;
use serde_json::Value;

use super::presentation::{present_response, ChartStyle, ResultView};
use super::submission::{assemble_request, SubmissionError};
use crate::models::{AnalysisRequest, FormState, RecordParseError};

/// Relay route the page posts to.
pub const RELAY_PATH: &str = "/api/process-csv";

/// Failure talking to the relay.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The relay answered with a non-2xx status.
    #[error("Error: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Transport(String),
}

/// Where assembled requests are sent.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    async fn submit(&self, request: &AnalysisRequest) -> Result<Value, ClientError>;
}

/// [`AnalysisGateway`] that posts to a running relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(relay_base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", relay_base_url.trim_end_matches('/'), RELAY_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisGateway for RelayClient {
    async fn submit(&self, request: &AnalysisRequest) -> Result<Value, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}

/// Why a submission produced no result.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("A submission is already in progress")]
    Busy,

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Results(#[from] RecordParseError),
}

/// What the page currently shows below the form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageState {
    pub results: Option<ResultView>,
    pub error: Option<String>,
}

/// Clears the busy flag when the submission ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Upload page: one submission at a time, last outcome kept for display.
#[derive(Debug, Default)]
pub struct SubmissionSession {
    busy: AtomicBool,
    page: RwLock<PageState>,
    style: ChartStyle,
}

impl SubmissionSession {
    pub fn new(style: ChartStyle) -> Self {
        Self {
            busy: AtomicBool::new(false),
            page: RwLock::new(PageState::default()),
            style,
        }
    }

    /// True while a submission is in flight; the submit button is disabled.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn page(&self) -> PageState {
        self.page.read().clone()
    }

    /// Submit the form.
    ///
    /// Input errors (no file, incomplete dates) are returned without touching
    /// the displayed page. Once a request has been built, the previous result
    /// is cleared and replaced by the new view or by an error message.
    pub async fn submit(
        &self,
        form: &FormState,
        gateway: &dyn AnalysisGateway,
    ) -> Result<ResultView, SessionError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let request = assemble_request(form).await?;
        *self.page.write() = PageState::default();

        let outcome = match gateway.submit(&request).await {
            Ok(value) => present_response(&value, &self.style).map_err(SessionError::from),
            Err(err) => Err(SessionError::from(err)),
        };

        let mut page = self.page.write();
        match &outcome {
            Ok(view) => {
                info!(
                    "Analysis returned {} datasets",
                    view.chart().map_or(0, |c| c.datasets.len())
                );
                page.results = Some(view.clone());
            }
            Err(err) => {
                warn!("Submission failed: {}", err);
                page.error = Some(err.to_string());
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectedFile;
    use parking_lot::Mutex;
    use serde_json::json;

    struct RecordingGateway {
        reply: Result<Value, ClientError>,
        calls: Mutex<Vec<AnalysisRequest>>,
    }

    impl RecordingGateway {
        fn new(reply: Result<Value, ClientError>) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AnalysisGateway for RecordingGateway {
        async fn submit(&self, request: &AnalysisRequest) -> Result<Value, ClientError> {
            self.calls.lock().push(request.clone());
            self.reply.clone()
        }
    }

    fn ready_form() -> FormState {
        FormState::new().select_file(SelectedFile::upload("towers.csv", "a,b\n"))
    }

    #[tokio::test]
    async fn test_no_file_makes_no_call() {
        let session = SubmissionSession::default();
        let gateway = RecordingGateway::new(Ok(json!({"data": []})));
        let result = session.submit(&FormState::new(), &gateway).await;
        assert!(matches!(
            result,
            Err(SessionError::Submission(SubmissionError::NoFileSelected))
        ));
        assert!(gateway.calls.lock().is_empty());
        assert_eq!(session.page(), PageState::default());
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_empty_data_is_not_an_error() {
        let session = SubmissionSession::default();
        let gateway = RecordingGateway::new(Ok(json!({"data": []})));
        let view = session.submit(&ready_form(), &gateway).await.unwrap();
        assert_eq!(view, ResultView::Empty);
        assert_eq!(session.page().error, None);
        assert_eq!(gateway.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_status_error_message() {
        let session = SubmissionSession::default();
        let gateway = RecordingGateway::new(Err(ClientError::Status {
            status: 422,
            reason: "Unprocessable Entity".into(),
        }));
        assert!(session.submit(&ready_form(), &gateway).await.is_err());
        let page = session.page();
        assert_eq!(page.error.as_deref(), Some("Error: 422 Unprocessable Entity"));
        assert_eq!(page.results, None);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_new_submission_clears_previous_error() {
        let session = SubmissionSession::default();
        let failing = RecordingGateway::new(Err(ClientError::Transport("down".into())));
        let _ = session.submit(&ready_form(), &failing).await;
        assert!(session.page().error.is_some());

        let working = RecordingGateway::new(Ok(json!({"data": [{
            "state": "New York",
            "start_time": "2024-03-01T10:00:00Z",
            "confidence": 75.0,
            "count_rows": 4,
            "count_recovered": 0,
            "count_interpolated": 1
        }]})));
        let view = session.submit(&ready_form(), &working).await.unwrap();
        assert!(view.offers_graph());
        let page = session.page();
        assert_eq!(page.error, None);
        assert_eq!(page.results, Some(view));
    }

    #[test]
    fn test_relay_client_endpoint() {
        let client = RelayClient::new("http://127.0.0.1:3000/").unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:3000/api/process-csv");
    }
}
