//! The boundary manager: the navigator's single source of truth.
//!
//! Owns the current boundary and render parameters, turns press/release
//! gestures into new boundaries, and issues a render request after every
//! change. Rendering is fire-and-forget: each request comes back as a
//! [`PendingRender`] which the caller drives to completion and hands back
//! through [`BoundaryManager::complete_render`].
//!
//! The manager itself holds no locks. Callers sharing it across threads wrap
//! it in a single `Mutex` so mutations stay serialized.

use crate::backend::{RenderBackend, RenderError, RenderFuture, RenderedImage};
use crate::config::NavigatorConfig;
use crate::error::NavigatorError;
use crate::persistence::{NavigatorSession, SESSION_VERSION};
use crate::sequencing::{RenderSequencer, RenderTicket};
use mandelzoom_core::{
    calculate_precision_digits, selection_to_boundary, selection_to_high_precision_boundary,
    AspectRatio, Boundary, BoundaryMode, CanvasSize, CoordinateError, PixelPoint, RenderCoordinates,
    RenderParameters, RenderRequest, Selection, MIN_PRECISION_DIGITS, PRECISION_THRESHOLD,
};
use std::fmt;
use std::sync::Arc;

/// An issued render request whose image has not arrived yet.
pub struct PendingRender {
    ticket: RenderTicket,
    response: RenderFuture,
}

impl PendingRender {
    pub fn ticket(&self) -> RenderTicket {
        self.ticket
    }

    /// Wait for the backend and package the result for `complete_render`.
    pub async fn wait(self) -> RenderCompletion {
        let result = self.response.await;
        RenderCompletion {
            ticket: self.ticket,
            result,
        }
    }
}

impl fmt::Debug for PendingRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRender")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct RenderCompletion {
    pub ticket: RenderTicket,
    pub result: Result<RenderedImage, RenderError>,
}

/// What `complete_render` did with a successful completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Applied,
    /// A newer request was issued; the image was discarded.
    Stale,
}

pub struct BoundaryManager {
    backend: Arc<dyn RenderBackend>,
    canvas: CanvasSize,
    aspect_ratio: AspectRatio,
    starting_boundary: Boundary,
    default_params: RenderParameters,
    boundary: BoundaryMode,
    params: RenderParameters,
    press: Option<PixelPoint>,
    image: Option<RenderedImage>,
    sequencer: RenderSequencer,
}

impl BoundaryManager {
    /// Create a manager showing `starting_boundary` and issue the first render.
    pub fn new(
        starting_boundary: Boundary,
        aspect_ratio: AspectRatio,
        canvas: CanvasSize,
        backend: Arc<dyn RenderBackend>,
    ) -> Result<(Self, PendingRender), NavigatorError> {
        let config = NavigatorConfig {
            starting_boundary,
            aspect_ratio,
            canvas,
            ..NavigatorConfig::default()
        };
        Self::from_config(&config, backend)
    }

    pub fn from_config(
        config: &NavigatorConfig,
        backend: Arc<dyn RenderBackend>,
    ) -> Result<(Self, PendingRender), NavigatorError> {
        config.validate()?;
        let boundary = working_boundary(config.starting_boundary, config.canvas)
            .and_then(|boundary| RenderCoordinates::from_boundary(&boundary).map(|_| boundary))
            .map_err(|e| NavigatorError::Config(format!("starting boundary: {}", e)))?;
        let mut manager = Self {
            backend,
            canvas: config.canvas,
            aspect_ratio: config.aspect_ratio,
            starting_boundary: config.starting_boundary,
            default_params: config.render_defaults,
            boundary,
            params: config.render_defaults,
            press: None,
            image: None,
            sequencer: RenderSequencer::new(config.response_ordering),
        };
        let pending = manager.render_current()?;
        Ok((manager, pending))
    }

    pub fn set_press_coordinates(&mut self, x: f64, y: f64) {
        self.press = Some(PixelPoint::new(x, y));
    }

    /// Zoom into the aspect-constrained box spanned by the recorded press and
    /// this release.
    ///
    /// The press is consumed. On error the boundary is left untouched and no
    /// render is issued.
    pub fn update_boundary(
        &mut self,
        release_x: f64,
        release_y: f64,
    ) -> Result<PendingRender, NavigatorError> {
        let press = self.press.take().ok_or(NavigatorError::NoPressRecorded)?;
        let release = PixelPoint::new(release_x, release_y);
        let selection = Selection::constrained(press, release, self.aspect_ratio);
        if selection.is_empty() {
            return Err(NavigatorError::EmptySelection);
        }

        let next = match &self.boundary {
            BoundaryMode::Native(current) => {
                let mapped = selection_to_boundary(&selection, current, self.canvas)?;
                if mapped.needs_high_precision() || !mapped.is_valid() {
                    // Edges this close together may already coincide in f64, so
                    // the selection is mapped again in decimal from the current boundary
                    let current = current.to_high_precision(MIN_PRECISION_DIGITS)?;
                    let digits = calculate_precision_digits(&current, self.canvas);
                    log::info!(
                        "Switching to high precision: width {:e} < {:e}, {} digits",
                        mapped.width(),
                        PRECISION_THRESHOLD,
                        digits
                    );
                    BoundaryMode::HighPrecision(selection_to_high_precision_boundary(
                        &selection,
                        &current,
                        self.canvas,
                        digits,
                    )?)
                } else {
                    BoundaryMode::Native(mapped)
                }
            }
            BoundaryMode::HighPrecision(current) => {
                // Digits for the current boundary leave enough margin for one zoom step
                let digits = calculate_precision_digits(current, self.canvas);
                BoundaryMode::HighPrecision(selection_to_high_precision_boundary(
                    &selection,
                    current,
                    self.canvas,
                    digits,
                )?)
            }
        };

        if let BoundaryMode::HighPrecision(high) = &next {
            high.ensure_extent()?;
        }
        let coordinates = RenderCoordinates::from_boundary(&next)?;
        log::debug!(
            "Selection {:?} -> {} boundary, width {:e}",
            selection,
            next.name(),
            next.width_f64()
        );
        self.boundary = next;
        Ok(self.dispatch(coordinates))
    }

    pub fn set_max_iterations(&mut self, max_iterations: u32) -> Result<PendingRender, NavigatorError> {
        if max_iterations == 0 {
            return Err(NavigatorError::InvalidParameter {
                name: "max_iterations",
                reason: "must be positive".to_string(),
            });
        }
        self.params.max_iterations = max_iterations;
        self.render_current()
    }

    pub fn set_palette_length(&mut self, palette_length: u32) -> Result<PendingRender, NavigatorError> {
        if palette_length == 0 {
            return Err(NavigatorError::InvalidParameter {
                name: "palette_length",
                reason: "must be positive".to_string(),
            });
        }
        self.params.palette_length = palette_length;
        self.render_current()
    }

    pub fn set_palette_id(&mut self, palette_id: u32) -> Result<PendingRender, NavigatorError> {
        self.params.palette_id = palette_id;
        self.render_current()
    }

    /// Return to the starting boundary and default parameters. The starting
    /// boundary is native unless it is already narrower than the threshold.
    pub fn reset(&mut self) -> Result<PendingRender, NavigatorError> {
        log::info!("Resetting to starting boundary");
        self.boundary = working_boundary(self.starting_boundary, self.canvas)?;
        self.params = self.default_params;
        self.press = None;
        self.render_current()
    }

    /// Replace boundary and parameters with a saved session and re-render.
    pub fn restore(&mut self, session: NavigatorSession) -> Result<PendingRender, NavigatorError> {
        if session.version != SESSION_VERSION {
            return Err(NavigatorError::InvalidSession(format!(
                "unsupported version {} (expected {})",
                session.version, SESSION_VERSION
            )));
        }
        let valid_boundary = match &session.boundary {
            BoundaryMode::Native(b) => b.is_valid(),
            BoundaryMode::HighPrecision(b) => b.is_valid(),
        };
        if !valid_boundary {
            return Err(NavigatorError::InvalidSession(
                "boundary edges must satisfy start < end".to_string(),
            ));
        }
        if !session.params.is_valid() {
            return Err(NavigatorError::InvalidSession(
                "maxIterations and paletteLength must be positive".to_string(),
            ));
        }
        let invalid = |e: CoordinateError| NavigatorError::InvalidSession(e.to_string());
        let boundary = match session.boundary {
            BoundaryMode::Native(native) => working_boundary(native, self.canvas).map_err(invalid)?,
            high => high,
        };
        let coordinates = RenderCoordinates::from_boundary(&boundary).map_err(invalid)?;

        self.boundary = boundary;
        self.params = session.params;
        self.press = None;
        Ok(self.dispatch(coordinates))
    }

    /// Apply a finished render.
    ///
    /// Failures leave the previous image in place and surface as
    /// [`NavigatorError::RenderFailed`].
    pub fn complete_render(
        &mut self,
        completion: RenderCompletion,
    ) -> Result<RenderOutcome, NavigatorError> {
        let request_id = completion.ticket.id();
        let image = match completion.result {
            Ok(image) => image,
            Err(source) => {
                log::warn!("Render request {} failed: {}", request_id, source);
                return Err(NavigatorError::RenderFailed { request_id, source });
            }
        };

        if !self.sequencer.accepts(completion.ticket) {
            log::debug!("Discarding stale render {}", request_id);
            return Ok(RenderOutcome::Stale);
        }
        log::debug!("Showing render {} from {}", request_id, image.path.display());
        self.image = Some(image);
        Ok(RenderOutcome::Applied)
    }

    pub fn session(&self) -> NavigatorSession {
        NavigatorSession::new(self.boundary.clone(), self.params)
    }

    pub fn image(&self) -> Option<&RenderedImage> {
        self.image.as_ref()
    }

    pub fn press_coordinates(&self) -> Option<PixelPoint> {
        self.press
    }

    pub fn boundary(&self) -> &BoundaryMode {
        &self.boundary
    }

    pub fn is_high_precision(&self) -> bool {
        self.boundary.is_high_precision()
    }

    pub fn params(&self) -> RenderParameters {
        self.params
    }

    pub fn max_iterations(&self) -> u32 {
        self.params.max_iterations
    }

    pub fn palette_length(&self) -> u32 {
        self.params.palette_length
    }

    pub fn palette_id(&self) -> u32 {
        self.params.palette_id
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    fn render_current(&mut self) -> Result<PendingRender, NavigatorError> {
        let coordinates = RenderCoordinates::from_boundary(&self.boundary)?;
        Ok(self.dispatch(coordinates))
    }

    fn dispatch(&mut self, coordinates: RenderCoordinates) -> PendingRender {
        let ticket = self.sequencer.issue();
        let request = RenderRequest {
            request_id: ticket.id(),
            coordinates,
            params: self.params,
        };
        log::info!(
            "Render request {} ({}, max_iterations={}, palette_length={}, palette_id={})",
            request.request_id,
            self.boundary.name(),
            request.params.max_iterations,
            request.params.palette_length,
            request.params.palette_id
        );
        PendingRender {
            ticket,
            response: self.backend.render(request),
        }
    }
}

/// Native boundaries already narrower than the precision threshold are held
/// in high precision from the start.
fn working_boundary(boundary: Boundary, canvas: CanvasSize) -> Result<BoundaryMode, CoordinateError> {
    if !boundary.needs_high_precision() {
        return Ok(BoundaryMode::Native(boundary));
    }
    let digits = calculate_precision_digits(
        &boundary.to_high_precision(MIN_PRECISION_DIGITS)?,
        canvas,
    );
    log::info!(
        "Boundary width {:e} < {:e}, holding it in high precision ({} digits)",
        boundary.width(),
        PRECISION_THRESHOLD,
        digits
    );
    Ok(BoundaryMode::HighPrecision(boundary.to_high_precision(digits)?))
}

impl fmt::Debug for BoundaryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryManager")
            .field("canvas", &self.canvas)
            .field("aspect_ratio", &self.aspect_ratio)
            .field("boundary", &self.boundary)
            .field("params", &self.params)
            .field("press", &self.press)
            .field("image", &self.image)
            .field("sequencer", &self.sequencer)
            .finish_non_exhaustive()
    }
}
