//! HTTP client for the food analysis endpoint

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::types::{
    AnalysisResult, AnalyzeRequest, ErrorBody, MealSuggestionRequest, MealSuggestions,
};
use super::AnalysisError;

const ANALYZE_PATH: &str = "/api/analyze-food";
const SUGGEST_PATH: &str = "/api/suggest-meals";

/// Where the photo to analyze comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Local image file, sent inline as a data URL
    File(PathBuf),
    /// Base64 payload, with or without a `data:` prefix
    Base64(String),
    /// Publicly reachable URL, fetched by the endpoint
    Url(String),
}

impl ImageSource {
    /// Build a source from optional tool arguments; exactly one must be set
    pub fn from_parts(
        path: Option<String>,
        base64: Option<String>,
        url: Option<String>,
    ) -> Result<Self, AnalysisError> {
        let given = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (given(path), given(base64), given(url)) {
            (Some(p), None, None) => Ok(ImageSource::File(PathBuf::from(p))),
            (None, Some(b), None) => Ok(ImageSource::Base64(b)),
            (None, None, Some(u)) => Ok(ImageSource::Url(u)),
            (None, None, None) => Err(AnalysisError::MissingImage),
            _ => Err(AnalysisError::AmbiguousImage),
        }
    }

    /// Short reference stored with a logged meal
    pub fn reference(&self) -> Option<String> {
        match self {
            ImageSource::File(p) => Some(p.display().to_string()),
            ImageSource::Url(u) => Some(u.clone()),
            ImageSource::Base64(_) => None,
        }
    }

    async fn into_request(self) -> Result<AnalyzeRequest, AnalysisError> {
        match self {
            ImageSource::File(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| AnalysisError::ImageRead(path.display().to_string(), e))?;
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(AnalyzeRequest {
                    image: Some(to_data_url(&path, &bytes)),
                    image_url: None,
                })
            }
            ImageSource::Base64(data) => Ok(AnalyzeRequest {
                image: Some(data),
                image_url: None,
            }),
            ImageSource::Url(url) => Ok(AnalyzeRequest {
                image: None,
                image_url: Some(url),
            }),
        }
    }
}

/// MIME type from the file extension, defaulting to JPEG
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

/// Encode image bytes as a `data:` URL
pub fn to_data_url(path: &Path, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_for_path(path),
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Backend that turns meal photos into detected foods and suggests meals
#[async_trait]
pub trait FoodAnalyzer: Send + Sync {
    async fn analyze(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError>;

    async fn suggest_meals(
        &self,
        request: &MealSuggestionRequest,
    ) -> Result<MealSuggestions, AnalysisError>;
}

/// Analyzer backed by the remote analysis service
pub struct HttpFoodAnalyzer {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFoodAnalyzer {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AnalysisError::Http)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_PATH)
    }

    pub fn suggestions_endpoint(&self) -> String {
        format!("{}{}", self.base_url, SUGGEST_PATH)
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, AnalysisError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(endpoint)
            .json(body)
            .send()
            .await
            .map_err(AnalysisError::Http)?;

        let status = response.status();
        let text = response.text().await.map_err(AnalysisError::Http)?;
        debug!("{} responded {} ({} bytes)", endpoint, status, text.len());

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.detail)
                .unwrap_or(text);
            warn!("{} returned {}: {}", endpoint, status, detail);
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&text).map_err(AnalysisError::Parse)
    }
}

#[async_trait]
impl FoodAnalyzer for HttpFoodAnalyzer {
    async fn analyze(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        let request = source.into_request().await?;
        let endpoint = self.endpoint();

        info!("Sending meal photo to {}", endpoint);
        let result: AnalysisResult = self.post_json(&endpoint, &request).await?;
        info!(
            "Detected {} food item(s), {}",
            result.food_items.len(),
            result.calorie_summary()
        );
        Ok(result)
    }

    async fn suggest_meals(
        &self,
        request: &MealSuggestionRequest,
    ) -> Result<MealSuggestions, AnalysisError> {
        let endpoint = self.suggestions_endpoint();

        info!(
            "Requesting meal suggestions for {:.0} kcal remaining",
            request.remaining_calories
        );
        let result: MealSuggestions = self.post_json(&endpoint, request).await?;
        info!("Received {} meal suggestion(s)", result.suggestions.len());
        Ok(result)
    }
}
