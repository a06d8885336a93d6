//! DetectionSession - Detection/Webcam Orchestrator
//!
//! ## Responsibilities
//!
//! - Own Detection State and Webcam State for one UI session
//! - Run single-image detections (newest-wins across concurrent calls)
//! - Start/stop lifecycle of the server-side webcam stream
//!
//! State transitions are pure methods on the state structs; this module
//! only glues them to transport outcomes. Consumers read state through
//! cloned snapshots and never mutate it directly.

use crate::api_client::{ApiClient, ApiOutcome, DetectionResult, WebcamStatus};
use base64::Engine;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Detection request lifecycle state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionState {
    /// True exactly while a detection request is in flight
    pub loading: bool,
    /// Last successful outcome; cleared when a new request begins
    pub results: Option<DetectionResult>,
    /// Last failure message; mutually exclusive with `results`
    pub error: Option<String>,
}

impl DetectionState {
    /// Transition to Pending: previous results and error are discarded
    /// before the new request is issued
    fn begin(&mut self) {
        self.loading = true;
        self.results = None;
        self.error = None;
    }

    /// Terminal transition from a transport outcome
    fn finish(&mut self, outcome: &ApiOutcome<DetectionResult>) {
        self.loading = false;
        if outcome.success {
            self.results = outcome.data.clone();
            self.error = None;
        } else {
            self.results = None;
            self.error = Some(
                outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| "Detection failed".to_string()),
            );
        }
    }

    /// Return to Idle
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Webcam session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebcamState {
    /// A start command has succeeded and no stop has succeeded since
    pub active: bool,
    /// Mirrors `active` today; separate field for a future partial-stream mode
    pub streaming: bool,
    /// Reserved for a pushed-frame representation; unused with MJPEG pull
    pub current_frame: Option<String>,
    /// Last failure from a start/stop attempt
    pub error: Option<String>,
}

impl WebcamState {
    /// Apply a start outcome; state follows the call's result strictly,
    /// including a re-issued start while already active
    fn apply_start(&mut self, outcome: &ApiOutcome<serde_json::Value>) {
        if outcome.success {
            self.active = true;
            self.streaming = true;
            self.error = None;
        } else {
            self.active = false;
            self.streaming = false;
            self.error = Some(
                outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| "Webcam start failed".to_string()),
            );
        }
    }

    /// Apply a stop outcome
    ///
    /// A failed stop keeps `active` as-is: the stream may still be running
    /// server-side and the state must not pretend it ended.
    fn apply_stop(&mut self, outcome: &ApiOutcome<serde_json::Value>) {
        if outcome.success {
            *self = Self::default();
        } else {
            self.error = Some(
                outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| "Webcam stop failed".to_string()),
            );
        }
    }

    /// Re-sync `active`/`streaming` from the service's reported status
    fn apply_status(&mut self, outcome: &ApiOutcome<WebcamStatus>) {
        match (&outcome.data, outcome.success) {
            (Some(status), true) => {
                self.active = status.active;
                self.streaming = status.active;
                self.error = None;
            }
            _ => {
                self.error = Some(
                    outcome
                        .error
                        .clone()
                        .unwrap_or_else(|| "Webcam status unavailable".to_string()),
                );
            }
        }
    }

    /// Force Stopped unconditionally
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Detection/webcam session orchestrator
///
/// One instance per UI session. Clones share the same state.
#[derive(Clone)]
pub struct DetectionSession {
    api: Arc<ApiClient>,
    detection: Arc<RwLock<DetectionState>>,
    webcam: Arc<RwLock<WebcamState>>,
    /// Monotonic token stream for newest-wins detection reconciliation
    detect_seq: Arc<AtomicU64>,
}

impl DetectionSession {
    /// Create a new session over the given API client
    pub fn new(api: ApiClient) -> Self {
        Self {
            api: Arc::new(api),
            detection: Arc::new(RwLock::new(DetectionState::default())),
            webcam: Arc::new(RwLock::new(WebcamState::default())),
            detect_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Underlying API client (health checks, model info)
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Snapshot of the current detection state
    pub async fn detection_state(&self) -> DetectionState {
        self.detection.read().await.clone()
    }

    /// Snapshot of the current webcam state
    pub async fn webcam_state(&self) -> WebcamState {
        self.webcam.read().await.clone()
    }

    /// Run detection on a base64-encoded image
    pub async fn detect_from_base64(
        &self,
        image: impl Into<String>,
        confidence: f32,
    ) -> ApiOutcome<DetectionResult> {
        let image = image.into();
        let token = self.begin_detection().await;
        let outcome = self.api.detect_base64(&image, confidence).await;
        self.finish_detection(token, outcome).await
    }

    /// Run detection on in-memory image bytes
    ///
    /// Encodes the bytes and uses the inline-image endpoint.
    pub async fn detect_from_bytes(
        &self,
        image: &[u8],
        confidence: f32,
    ) -> ApiOutcome<DetectionResult> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        self.detect_from_base64(encoded, confidence).await
    }

    /// Run detection on a local image file via multipart upload
    ///
    /// A failed file read is reconciled as a Failed terminal state, same
    /// as any transport failure.
    pub async fn detect_from_file(
        &self,
        path: impl AsRef<Path>,
        confidence: f32,
    ) -> ApiOutcome<DetectionResult> {
        let path = path.as_ref();
        let token = self.begin_detection().await;

        let outcome = match Self::read_image(path).await {
            Ok(bytes) => self.api.detect_upload(bytes, confidence).await,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read image file");
                ApiOutcome::fail(format!("Failed to read image file: {}", e))
            }
        };

        self.finish_detection(token, outcome).await
    }

    async fn read_image(path: &Path) -> crate::error::Result<Vec<u8>> {
        Ok(tokio::fs::read(path).await?)
    }

    /// Clear detection state back to Idle; idempotent
    pub async fn reset_detection(&self) {
        self.detection.write().await.reset();
        tracing::debug!("Detection state reset");
    }

    /// Start the server-side webcam stream
    pub async fn start_webcam(&self, confidence: f32) -> ApiOutcome<serde_json::Value> {
        let outcome = self.api.start_webcam(confidence).await;
        self.webcam.write().await.apply_start(&outcome);

        if outcome.success {
            tracing::info!(confidence = confidence, "Webcam started");
        } else {
            tracing::warn!(error = ?outcome.error, "Webcam start failed");
        }

        outcome
    }

    /// Stop the server-side webcam stream
    pub async fn stop_webcam(&self) -> ApiOutcome<serde_json::Value> {
        let outcome = self.api.stop_webcam().await;
        self.webcam.write().await.apply_stop(&outcome);

        if outcome.success {
            tracing::info!("Webcam stopped");
        } else {
            tracing::warn!(error = ?outcome.error, "Webcam stop failed; stream may still be running");
        }

        outcome
    }

    /// Re-sync webcam state from the service (e.g. after app foregrounding)
    pub async fn refresh_webcam_status(&self) -> ApiOutcome<WebcamStatus> {
        let outcome = self.api.webcam_status().await;
        self.webcam.write().await.apply_status(&outcome);
        outcome
    }

    /// Force webcam state to Stopped, independent of any call outcome
    pub async fn reset_webcam(&self) {
        self.webcam.write().await.reset();
        tracing::debug!("Webcam state reset");
    }

    /// URL the rendering layer should point a media view at
    pub fn stream_url(&self) -> String {
        self.api.webcam_stream_url()
    }

    async fn begin_detection(&self) -> u64 {
        let token = self.detect_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.detection.write().await.begin();
        token
    }

    /// Apply the terminal transition only if this call is still the newest
    /// issued; stale outcomes are discarded silently (newest-wins)
    async fn finish_detection(
        &self,
        token: u64,
        outcome: ApiOutcome<DetectionResult>,
    ) -> ApiOutcome<DetectionResult> {
        let latest = self.detect_seq.load(Ordering::SeqCst);
        if token == latest {
            self.detection.write().await.finish(&outcome);
        } else {
            tracing::debug!(token = token, latest = latest, "Discarding stale detection outcome");
        }
        outcome
    }
}
