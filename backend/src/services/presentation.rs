//! Timeline chart model for analysis results.
//!
//! Records are mapped to a renderer-neutral scatter chart: one dataset per
//! record, x = start time, y = confidence. The highlighted state is drawn in
//! one colour and every other state in a second colour, with the point fill
//! fading by confidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{parse_analysis_response, AnalysisRecord, RecordParseError};

pub const CHART_TITLE: &str = "State Analysis Over Time";
pub const NO_DATA_MESSAGE: &str = "No data available to display.";
pub const LEGEND_ALPHA: f64 = 0.8;

/// Opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// CSS colour with `alpha` clamped to [0, 1].
    pub fn css_alpha(&self, alpha: f64) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

/// Two-way colour split of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    /// State drawn in `highlight_color`
    pub highlight_label: String,
    pub highlight_color: Rgb,
    /// Legend label for every other state
    pub other_label: String,
    pub other_color: Rgb,
    pub point_radius: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            highlight_label: "New York".to_string(),
            highlight_color: Rgb::RED,
            other_label: "Connecticut".to_string(),
            other_color: Rgb::BLUE,
            point_radius: 1,
        }
    }
}

impl ChartStyle {
    pub fn color_for(&self, state: &str) -> Rgb {
        if state == self.highlight_label {
            self.highlight_color
        } else {
            self.other_color
        }
    }
}

/// A plotted record with the diagnostics shown on hover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: DateTime<Utc>,
    pub y: f64,
    pub count_rows: f64,
    pub count_recovered: f64,
    pub count_interpolated: f64,
}

impl ChartPoint {
    /// Hover text, one line per diagnostic.
    pub fn tooltip(&self) -> Vec<String> {
        vec![
            format!("Confidence: {}%", self.y),
            format!("Rows: {}", self.count_rows),
            format!("Recovered: {}", self.count_recovered),
            format!("Interpolated: {}", self.count_interpolated),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<ChartPoint>,
    pub background_color: String,
    pub border_color: String,
    pub point_radius: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub text: String,
    pub fill_style: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Time,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    pub scale: AxisScale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Confidence-over-time scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineChart {
    pub title: String,
    pub datasets: Vec<ChartDataset>,
    pub legend: Vec<LegendEntry>,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

/// What the results panel shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "chart", rename_all = "lowercase")]
pub enum ResultView {
    /// Nothing came back; not an error.
    Empty,
    Chart(TimelineChart),
}

impl ResultView {
    pub fn chart(&self) -> Option<&TimelineChart> {
        match self {
            ResultView::Chart(chart) => Some(chart),
            ResultView::Empty => None,
        }
    }

    /// The "View Graph" button is only offered when there is a chart.
    pub fn offers_graph(&self) -> bool {
        self.chart().is_some()
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            ResultView::Empty => Some(NO_DATA_MESSAGE),
            ResultView::Chart(_) => None,
        }
    }
}

pub fn dataset_for(record: &AnalysisRecord, style: &ChartStyle) -> ChartDataset {
    let color = style.color_for(&record.state);
    ChartDataset {
        label: record.state.clone(),
        data: vec![ChartPoint {
            x: record.start_time,
            y: record.confidence,
            count_rows: record.count_rows,
            count_recovered: record.count_recovered,
            count_interpolated: record.count_interpolated,
        }],
        background_color: color.css_alpha(record.confidence / 100.0),
        border_color: color.css(),
        point_radius: style.point_radius,
    }
}

/// Build the chart for `records`; an empty slice gives [`ResultView::Empty`].
pub fn build_timeline(records: &[AnalysisRecord], style: &ChartStyle) -> ResultView {
    if records.is_empty() {
        return ResultView::Empty;
    }

    ResultView::Chart(TimelineChart {
        title: CHART_TITLE.to_string(),
        datasets: records.iter().map(|r| dataset_for(r, style)).collect(),
        legend: vec![
            LegendEntry {
                text: style.highlight_label.clone(),
                fill_style: style.highlight_color.css_alpha(LEGEND_ALPHA),
            },
            LegendEntry {
                text: style.other_label.clone(),
                fill_style: style.other_color.css_alpha(LEGEND_ALPHA),
            },
        ],
        x_axis: Axis {
            title: "Time".to_string(),
            scale: AxisScale::Time,
            min: None,
            max: None,
        },
        y_axis: Axis {
            title: "Confidence (%)".to_string(),
            scale: AxisScale::Linear,
            min: Some(0.0),
            max: Some(100.0),
        },
    })
}

/// Validate a backend reply and build its view.
pub fn present_response(value: &Value, style: &ChartStyle) -> Result<ResultView, RecordParseError> {
    let records = parse_analysis_response(value)?;
    Ok(build_timeline(&records, style))
}

/// Visibility of the graph modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphModal {
    open: bool,
}

impl GraphModal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn toggle(&self) -> Self {
        Self { open: !self.open }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(state: &str, confidence: f64) -> AnalysisRecord {
        AnalysisRecord {
            state: state.to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            confidence,
            count_rows: 10.0,
            count_recovered: 3.0,
            count_interpolated: 2.0,
        }
    }

    #[test]
    fn test_empty_reply_renders_nothing() {
        let view = present_response(&json!({"data": []}), &ChartStyle::default()).unwrap();
        assert_eq!(view, ResultView::Empty);
        assert!(!view.offers_graph());
        assert_eq!(view.message(), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_highlight_split() {
        let style = ChartStyle::default();
        let view = build_timeline(
            &[record("New York", 50.0), record("Connecticut", 100.0), record("Vermont", 0.0)],
            &style,
        );
        let chart = view.chart().unwrap();
        assert_eq!(chart.datasets.len(), 3);
        assert_eq!(chart.datasets[0].border_color, "rgb(255, 0, 0)");
        assert_eq!(chart.datasets[0].background_color, "rgba(255, 0, 0, 0.5)");
        assert_eq!(chart.datasets[1].border_color, "rgb(0, 0, 255)");
        assert_eq!(chart.datasets[1].background_color, "rgba(0, 0, 255, 1)");
        assert_eq!(chart.datasets[2].background_color, "rgba(0, 0, 255, 0)");
        assert!(chart.datasets.iter().all(|d| d.point_radius == 1));
    }

    #[test]
    fn test_chart_frame() {
        let chart = build_timeline(&[record("Ohio", 10.0)], &ChartStyle::default());
        let chart = chart.chart().unwrap();
        assert_eq!(chart.title, CHART_TITLE);
        assert_eq!(chart.y_axis.min, Some(0.0));
        assert_eq!(chart.y_axis.max, Some(100.0));
        assert_eq!(chart.x_axis.scale, AxisScale::Time);
        assert_eq!(
            chart.legend,
            vec![
                LegendEntry {
                    text: "New York".into(),
                    fill_style: "rgba(255, 0, 0, 0.8)".into()
                },
                LegendEntry {
                    text: "Connecticut".into(),
                    fill_style: "rgba(0, 0, 255, 0.8)".into()
                },
            ]
        );
    }

    #[test]
    fn test_tooltip_lines() {
        let dataset = dataset_for(&record("New York", 87.5), &ChartStyle::default());
        assert_eq!(
            dataset.data[0].tooltip(),
            vec!["Confidence: 87.5%", "Rows: 10", "Recovered: 3", "Interpolated: 2"]
        );
        let whole = dataset_for(&record("New York", 90.0), &ChartStyle::default());
        assert_eq!(whole.data[0].tooltip()[0], "Confidence: 90%");
    }

    #[test]
    fn test_float_counts_render_as_integers() {
        let reply = json!({"data": [{
            "state": "New York",
            "start_time": "2024-03-01T10:00:00Z",
            "confidence": 70.0,
            "count_rows": 12.0,
            "count_recovered": 1.0,
            "count_interpolated": 0.0
        }]});
        let view = present_response(&reply, &ChartStyle::default()).unwrap();
        assert_eq!(
            view.chart().unwrap().datasets[0].data[0].tooltip(),
            vec!["Confidence: 70%", "Rows: 12", "Recovered: 1", "Interpolated: 0"]
        );
    }

    #[test]
    fn test_view_serializes_with_kind_tag() {
        let value = serde_json::to_value(ResultView::Empty).unwrap();
        assert_eq!(value, json!({"kind": "empty"}));
    }

    #[test]
    fn test_modal_toggle() {
        let modal = GraphModal::default();
        assert!(!modal.is_open());
        assert!(modal.toggle().is_open());
        assert!(!modal.toggle().toggle().is_open());
    }
}
