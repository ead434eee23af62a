//! The render backend seam.
//!
//! A backend turns a [`RenderRequest`] into an image somewhere the UI can load
//! it from. Rendering is asynchronous: `render` must return immediately and
//! resolve the future once the image exists (or the attempt failed).

use futures::future::BoxFuture;
use mandelzoom_core::RenderRequest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Image produced for one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedImage {
    pub request_id: u64,
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("renderer exited with {status}: {stderr}")]
    Exited { status: String, stderr: String },

    #[error("renderer timed out after {0:?}")]
    TimedOut(Duration),

    #[error("renderer reported success but wrote no image at {0:?}")]
    MissingOutput(PathBuf),

    #[error("render completion channel closed")]
    Disconnected,

    #[error("render rejected: {0}")]
    Rejected(String),
}

pub type RenderFuture = BoxFuture<'static, Result<RenderedImage, RenderError>>;

pub trait RenderBackend: Send + Sync {
    fn render(&self, request: RenderRequest) -> RenderFuture;
}
