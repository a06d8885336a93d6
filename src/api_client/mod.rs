//! ApiClient - Waste Classification API Adapter
//!
//! ## Responsibilities
//!
//! - Send detection requests to the inference server (JSON and multipart)
//! - Webcam start/stop/status control
//! - Normalize every failure into a uniform outcome shape
//!
//! Exactly one network exchange per call; no retries, no caching. Nothing
//! is raised past this boundary: every operation resolves to
//! [`ApiOutcome`], failures carried as a user-facing message.

pub mod types;

pub use types::*;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Fixed message for failures where no response reached the client
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network Error: Cannot reach server. Check your connection and server URL.";

/// Confidence threshold callers use when the user has not picked one
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// File name used for multipart image uploads
const UPLOAD_FILE_NAME: &str = "waste_photo.jpg";

/// Waste classification API client
pub struct ApiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a new API client from resolved configuration
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Base URL the client is pointed at
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Check server health
    pub async fn health_check(&self) -> ApiOutcome<HealthStatus> {
        self.get_json("/api/health").await
    }

    /// Get loaded model information
    pub async fn model_info(&self) -> ApiOutcome<ModelInfo> {
        self.get_json("/api/model/info").await
    }

    /// Run detection on a base64-encoded image
    ///
    /// The confidence threshold is transmitted exactly as given; the
    /// server is the validation authority.
    pub async fn detect_base64(&self, image: &str, confidence: f32) -> ApiOutcome<DetectionResult> {
        let body = json!({
            "image": image,
            "confidence": confidence,
        });

        tracing::debug!(confidence = confidence, "Sending base64 detection request");

        let req = self.client.post(self.endpoint("/api/detect/image")).json(&body);
        self.exchange("/api/detect/image", req).await
    }

    /// Run detection on raw image bytes via multipart upload
    ///
    /// Uses the extended upload timeout: the payload plus server-side
    /// inference can exceed the default request bound.
    pub async fn detect_upload(
        &self,
        image: Vec<u8>,
        confidence: f32,
    ) -> ApiOutcome<DetectionResult> {
        let form = match Self::upload_form(image, confidence) {
            Ok(form) => form,
            Err(e) => return ApiOutcome::fail(Self::failure_message(e)),
        };

        tracing::debug!(confidence = confidence, "Sending upload detection request");

        let req = self
            .client
            .post(self.endpoint("/api/detect/upload"))
            .multipart(form)
            .timeout(self.config.upload_timeout);
        self.exchange("/api/detect/upload", req).await
    }

    /// Start the server-side webcam stream
    ///
    /// Confidence travels as a query parameter; there is no body.
    pub async fn start_webcam(&self, confidence: f32) -> ApiOutcome<serde_json::Value> {
        let req = self
            .client
            .post(self.endpoint("/api/webcam/start"))
            .query(&[("confidence", confidence)]);
        self.exchange("/api/webcam/start", req).await
    }

    /// Stop the server-side webcam stream
    pub async fn stop_webcam(&self) -> ApiOutcome<serde_json::Value> {
        let req = self.client.post(self.endpoint("/api/webcam/stop"));
        self.exchange("/api/webcam/stop", req).await
    }

    /// Query webcam streaming status
    pub async fn webcam_status(&self) -> ApiOutcome<WebcamStatus> {
        self.get_json("/api/webcam/status").await
    }

    /// Pull a single frame from the active webcam stream
    pub async fn webcam_frame(&self) -> ApiOutcome<WebcamFrame> {
        self.get_json("/api/webcam/frame").await
    }

    /// URL of the live annotated MJPEG stream
    ///
    /// Pure; the rendering layer points a media view at this directly.
    pub fn webcam_stream_url(&self) -> String {
        self.endpoint("/api/webcam/stream")
    }

    /// List stored videos available for detection
    pub async fn list_videos(&self) -> ApiOutcome<VideoList> {
        self.get_json("/api/videos/list").await
    }

    /// Run detection on the first frame of a stored video
    pub async fn detect_video(
        &self,
        video_name: &str,
        confidence: f32,
    ) -> ApiOutcome<DetectionResult> {
        let path = format!("/api/videos/detect/{}", video_name);
        let req = self
            .client
            .post(self.endpoint(&path))
            .query(&[("confidence", confidence)]);
        self.exchange(&path, req).await
    }

    fn upload_form(image: Vec<u8>, confidence: f32) -> Result<Form> {
        let part = Part::bytes(image)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("image/jpeg")?;

        Ok(Form::new()
            .part("file", part)
            .text("confidence", confidence.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiOutcome<T> {
        let req = self.client.get(self.endpoint(path));
        self.exchange(path, req).await
    }

    /// Perform the exchange and fold any failure into the outcome shape
    async fn exchange<T: DeserializeOwned>(&self, path: &str, req: RequestBuilder) -> ApiOutcome<T> {
        match Self::request_json::<T>(req).await {
            Ok(data) => ApiOutcome::ok(data),
            Err(e) => {
                tracing::warn!(path = path, error = %e, "API request failed");
                ApiOutcome::fail(Self::failure_message(e))
            }
        }
    }

    async fn request_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api(Self::status_error_message(status, &body)));
        }

        resp.json::<T>()
            .await
            .map_err(|e| Error::Parse(format!("Invalid response body: {}", e)))
    }

    /// Derive a user-facing message from an error response body
    ///
    /// Precedence: structured `detail` field, then `error` field, then the
    /// generic status-coded fallback.
    fn status_error_message(status: StatusCode, body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message())
            .unwrap_or_else(|| format!("API Error: {}", status.as_u16()))
    }

    /// Derive the user-facing message for a failed exchange
    ///
    /// Connect and timeout failures mean no response reached the client;
    /// both collapse into the fixed connectivity message.
    fn failure_message(e: Error) -> String {
        match e {
            Error::Http(e) if e.is_connect() || e.is_timeout() => NETWORK_ERROR_MESSAGE.to_string(),
            Error::Http(e) => e.to_string(),
            Error::Api(msg) | Error::Parse(msg) => msg,
            other => other.to_string(),
        }
    }
}
