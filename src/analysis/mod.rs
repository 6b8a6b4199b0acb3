//! Meal photo analysis
//!
//! Food recognition runs on a separate backend. This module shapes the
//! request, sends it, and parses the detected foods.

mod client;
mod types;

pub use client::{mime_for_path, to_data_url, FoodAnalyzer, HttpFoodAnalyzer, ImageSource};
pub use types::{
    AnalysisResult, AnalyzeRequest, AnalyzedFood, MealSuggestion, MealSuggestionRequest,
    MealSuggestions,
};

use thiserror::Error;

/// Analysis errors
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Meal analysis is not configured (set NUTRILENS_ANALYSIS_URL)")]
    NotConfigured,

    #[error("Either an image path, base64 image, or image URL must be provided")]
    MissingImage,

    #[error("Provide only one of image path, base64 image, or image URL")]
    AmbiguousImage,

    #[error("Failed to read image {0}: {1}")]
    ImageRead(String, #[source] std::io::Error),

    #[error("Analysis request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analysis endpoint returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Malformed analysis response: {0}")]
    Parse(#[from] serde_json::Error),
}
