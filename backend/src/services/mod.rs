//! Service layer: request assembly, relay forwarding, result presentation and
//! the page-level submission flow.

pub mod forwarder;
pub mod presentation;
pub mod session;
pub mod submission;

pub use forwarder::{forward, AnalysisBackend, BackendReply, HttpBackend, RelayError, TransportError};
pub use presentation::{build_timeline, present_response, ChartStyle, GraphModal, ResultView, TimelineChart};
pub use session::{AnalysisGateway, ClientError, PageState, RelayClient, SessionError, SubmissionSession};
pub use submission::{assemble_request, SubmissionError};
