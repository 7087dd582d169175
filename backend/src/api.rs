//! Public API surface: the wire types exchanged with the relay and backend.

pub use crate::models::record::{parse_analysis_response, AnalysisRecord, RecordParseError};
pub use crate::models::request::{AnalysisRequest, DateFilter, RelayRequest};
pub use crate::models::weights::{Channel, WeightSet};
pub use crate::services::forwarder::{BACKEND_FAILURE, DEFAULT_BACKEND_URL, INTERNAL_FAILURE, PROCESS_CSV_PATH};
pub use crate::services::presentation::{ChartDataset, ChartPoint, LegendEntry, ResultView, TimelineChart};
pub use crate::services::session::RELAY_PATH;
