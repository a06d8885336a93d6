//! Wire types for the waste classification API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Uniform outcome of one transport exchange
///
/// Every API operation resolves to this shape; failures are carried as a
/// message, never raised past the client boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiOutcome<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiOutcome<T> {
    /// Successful exchange carrying a payload
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed exchange carrying a user-facing message
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Health endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub camera_active: bool,
}

/// Model info endpoint response
///
/// `classes` keys arrive as JSON object keys (stringified class ids);
/// `input_size` may be a scalar or a list depending on the model export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,

    #[serde(default)]
    pub classes: HashMap<String, String>,

    #[serde(default)]
    pub input_size: serde_json::Value,
}

/// One recognized object instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: String,
    pub class_id: i32,
    pub confidence: f32,

    /// Normalized xywh coordinates (may be empty if the box had no data)
    #[serde(default)]
    pub bbox: Vec<f32>,

    /// Pixel-space xyxy coordinates
    #[serde(default)]
    pub bbox_pixels: Vec<f32>,
}

/// Detection endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub success: bool,

    #[serde(default)]
    pub detections: Vec<Detection>,

    pub count: usize,

    #[serde(default)]
    pub image_with_boxes: Option<String>,

    #[serde(default)]
    pub message: String,
}

/// Webcam status endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebcamStatus {
    pub active: bool,
    pub message: String,
}

/// Single pulled webcam frame (fallback for views that cannot render MJPEG)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebcamFrame {
    pub success: bool,
    pub image: String,

    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Stored video descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub name: String,
    pub path: String,
    pub display_name: String,
}

/// Video list endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub videos: Vec<VideoEntry>,
}

/// Error payload shapes the service emits
///
/// FastAPI validation failures carry `detail`, the global exception handler
/// carries `error`; anything else is kept raw and ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    /// Structured detail field (HTTPException)
    Detail { detail: ErrorDetail },
    /// Structured error field (global exception handler)
    Message { error: String },
    /// Unrecognized payload
    Unknown(serde_json::Value),
}

/// `detail` may be a plain string or a structured validation list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Structured(serde_json::Value),
}

impl ErrorBody {
    /// Resolve the body to a user-facing message, if it carries one
    pub fn message(&self) -> Option<String> {
        match self {
            ErrorBody::Detail {
                detail: ErrorDetail::Text(s),
            } => Some(s.clone()),
            ErrorBody::Detail {
                detail: ErrorDetail::Structured(v),
            } => Some(v.to_string()),
            ErrorBody::Message { error } => Some(error.clone()),
            ErrorBody::Unknown(_) => None,
        }
    }
}
