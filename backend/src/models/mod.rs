//! Domain types: weights, form state, requests and analysis records.

pub mod form;
pub mod record;
pub mod request;
pub mod weights;

pub use form::{FormError, FormState, SelectedFile};
pub use record::{parse_analysis_response, AnalysisRecord, RecordParseError};
pub use request::{AnalysisRequest, DateFilter, RelayRequest};
pub use weights::{Channel, LockState, WeightEditor, WeightError, WeightSet};
