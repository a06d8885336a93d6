//! Wastecam Client Core
//!
//! Client-side core for the waste classification mobile app
//!
//! ## Architecture (4 Components)
//!
//! 1. ClientConfig - API address and timeouts, resolved once from env
//! 2. ApiClient - Inference server HTTP adapter (uniform outcome shape)
//! 3. DetectionSession - Detection/webcam state orchestrator
//! 4. Wire types - Serde contracts for the inference API
//!
//! ## Design Principles
//!
//! - The transport boundary never raises: every call resolves to
//!   `ApiOutcome<T>` with failures as user-facing messages
//! - State mutates only through session operations; consumers read
//!   cloned snapshots
//! - Newest-wins: a stale detection response never overwrites the state
//!   written by a newer request

pub mod api_client;
pub mod config;
pub mod error;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use api_client::{
    ApiClient, ApiOutcome, Detection, DetectionResult, HealthStatus, ModelInfo, VideoEntry,
    VideoList, WebcamFrame, WebcamStatus, DEFAULT_CONFIDENCE, NETWORK_ERROR_MESSAGE,
};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use session::{DetectionSession, DetectionState, WebcamState};
