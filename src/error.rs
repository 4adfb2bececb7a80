//! Error types
//!
//! The simulation tick itself cannot fail: missing targets, empty spawn tables
//! and stale boss shots are silent no-ops. Only construction and configuration
//! surface errors to the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid viewport: {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
