use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// Inbound body of an analysis request. Every field is optional on the wire;
/// which ones must be present depends on the mode the request selects.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub mode: Option<String>,
    #[serde(rename = "imageBase64")]
    pub image_base64: Option<String>,
    pub query: Option<String>,
    #[serde(rename = "mealItems")]
    pub meal_items: Option<Vec<String>>,
}

/// A classified analysis task. Exactly one variant is selected per request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisTask {
    /// Meal photo as a base64 data URI. This is the default mode: requests
    /// from the first app version carry no `mode` field at all.
    ImageAnalysis { image: String },
    /// Free-text food lookup ("Biryani", "Idli", ...).
    Search { query: String },
    /// Composite meal from free-text items ("2 Rotis", "1 Katori Dal", ...).
    BuildMeal { items: Vec<String> },
    /// Head-to-head comparison, parsed from a "Food A vs Food B" query.
    Compare { first: String, second: String },
}

/// Separator expected inside a comparison query.
pub const COMPARISON_SEPARATOR: &str = " vs ";

impl AnalysisTask {
    /// Classify a raw request. Explicit modes are checked first; anything
    /// else (including unknown mode strings) falls through to image
    /// analysis. Input validation happens here, before any upstream call.
    pub fn from_request(request: AnalysisRequest) -> Result<Self> {
        match request.mode.as_deref() {
            Some("search") => {
                let query = request.query.unwrap_or_default();
                if query.trim().is_empty() {
                    return Err(GatewayError::MissingInput(
                        "Search query is required".to_string(),
                    ));
                }
                Ok(AnalysisTask::Search { query })
            }
            Some("build") => {
                let items = request.meal_items.unwrap_or_default();
                if items.is_empty() {
                    return Err(GatewayError::MissingInput(
                        "Meal items are required".to_string(),
                    ));
                }
                Ok(AnalysisTask::BuildMeal { items })
            }
            Some("compare") => {
                let query = request.query.unwrap_or_default();
                if query.trim().is_empty() {
                    return Err(GatewayError::MissingInput(
                        "Comparison query is required".to_string(),
                    ));
                }
                let (first, second) = split_comparison(&query)?;
                Ok(AnalysisTask::Compare { first, second })
            }
            _ => {
                let image = request.image_base64.unwrap_or_default();
                if image.is_empty() {
                    return Err(GatewayError::MissingInput(
                        "Image data is required".to_string(),
                    ));
                }
                Ok(AnalysisTask::ImageAnalysis { image })
            }
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            AnalysisTask::ImageAnalysis { .. } => "image",
            AnalysisTask::Search { .. } => "search",
            AnalysisTask::BuildMeal { .. } => "build",
            AnalysisTask::Compare { .. } => "compare",
        }
    }
}

/// Split a "Food A vs Food B" query at the first separator occurrence.
/// A query without the separator, or with an empty side, is a client error.
pub fn split_comparison(query: &str) -> Result<(String, String)> {
    let format_error = || {
        GatewayError::MissingInput(
            "Comparison query must be in 'Food A vs Food B' format".to_string(),
        )
    };

    let (first, second) = query.split_once(COMPARISON_SEPARATOR).ok_or_else(format_error)?;
    let first = first.trim();
    let second = second.trim();
    if first.is_empty() || second.is_empty() {
        return Err(format_error());
    }

    Ok((first.to_string(), second.to_string()))
}
