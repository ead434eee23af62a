//! Navigator error types.

use crate::backend::RenderError;
use mandelzoom_core::CoordinateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("release reported without a recorded press")]
    NoPressRecorded,

    #[error("selection has zero area")]
    EmptySelection,

    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] CoordinateError),

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("render request {request_id} failed: {source}")]
    RenderFailed {
        request_id: u64,
        #[source]
        source: RenderError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid session: {0}")]
    InvalidSession(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
