pub mod backend;
pub mod config;
pub mod error;
pub mod manager;
pub mod persistence;
pub mod process_renderer;
pub mod sequencing;

pub use backend::{RenderBackend, RenderError, RenderFuture, RenderedImage};
pub use config::{CoordinateFormat, NavigatorConfig, RendererConfig};
pub use error::NavigatorError;
pub use manager::{BoundaryManager, PendingRender, RenderCompletion, RenderOutcome};
pub use persistence::{load_session, save_session, NavigatorSession, SESSION_VERSION};
pub use process_renderer::ProcessRenderer;
pub use sequencing::{RenderSequencer, RenderTicket, ResponseOrdering};
