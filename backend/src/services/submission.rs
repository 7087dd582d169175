//! Turns form state into an [`AnalysisRequest`].

use log::debug;

use crate::models::{AnalysisRequest, DateFilter, FormState, SelectedFile, WeightSet};

/// Why a submission could not be assembled.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Please upload a CSV file.")]
    NoFileSelected,

    #[error("Date filter is enabled but the {0} date is missing")]
    IncompleteDateFilter(&'static str),

    #[error("Failed to read '{name}': {source}")]
    FileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read the full text of the selected file.
pub async fn read_selected_file(file: &SelectedFile) -> Result<String, SubmissionError> {
    match file {
        SelectedFile::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SubmissionError::FileRead {
                    name: file.name(),
                    source,
                })
        }
        SelectedFile::Upload { contents, .. } => Ok(contents.to_string()),
    }
}

/// Date range to send, if filtering is on. Both dates are required together.
pub fn date_filter_for(form: &FormState) -> Result<Option<DateFilter>, SubmissionError> {
    if !form.date_filter_enabled {
        return Ok(None);
    }
    let start = form
        .start_date
        .as_ref()
        .ok_or(SubmissionError::IncompleteDateFilter("start"))?;
    let end = form
        .end_date
        .as_ref()
        .ok_or(SubmissionError::IncompleteDateFilter("end"))?;
    Ok(Some(DateFilter::new(start.clone(), end.clone())))
}

/// Weights to send: the edited set, or the neutral `{1, 1, 1}` when custom
/// weighting is off.
pub fn weights_for(form: &FormState) -> WeightSet {
    if form.weights_enabled {
        form.weights.weights()
    } else {
        WeightSet::neutral()
    }
}

/// Build the request for the current form.
///
/// Validation happens before the file is read, so a rejected submission
/// never touches the file.
pub async fn assemble_request(form: &FormState) -> Result<AnalysisRequest, SubmissionError> {
    let file = form.file.as_ref().ok_or(SubmissionError::NoFileSelected)?;
    let date_filter = date_filter_for(form)?;
    let contents = read_selected_file(file).await?;

    debug!(
        "Assembled request from '{}' ({} bytes, time gap {} min)",
        file.name(),
        contents.len(),
        form.time_gap_minutes()
    );

    Ok(AnalysisRequest::new(
        contents,
        weights_for(form),
        form.time_gap_minutes(),
        date_filter,
    ))
}
