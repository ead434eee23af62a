//! Navigator configuration.
//!
//! Loaded from JSON; every field is optional and falls back to the
//! Mandelbrot defaults.

use crate::error::NavigatorError;
use crate::sequencing::ResponseOrdering;
use mandelzoom_core::{AspectRatio, Boundary, CanvasSize, RenderParameters, MANDELBROT_DEFAULTS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How high precision coordinates are passed on the renderer command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoordinateFormat {
    /// Decimal strings, e.g. `-0.74364388703715870475`
    #[default]
    Decimal,
    /// Four comma separated fixed point limbs, e.g. `4294967295,2147483648,0,0`
    Limbs,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfig {
    pub program: PathBuf,
    /// Arguments placed before the generated ones
    pub args: Vec<String>,
    pub output_dir: PathBuf,
    pub output_stem: String,
    pub coordinate_format: CoordinateFormat,
    pub timeout_ms: Option<u64>,
}

impl RendererConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("./mandelbrot-renderer"),
            args: Vec::new(),
            output_dir: PathBuf::from("generated-files"),
            output_stem: "mandelbrot_set".to_string(),
            coordinate_format: CoordinateFormat::Decimal,
            timeout_ms: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigatorConfig {
    pub canvas: CanvasSize,
    pub aspect_ratio: AspectRatio,
    pub starting_boundary: Boundary,
    /// Parameters used at startup and restored by a reset
    pub render_defaults: RenderParameters,
    pub response_ordering: ResponseOrdering,
    pub renderer: RendererConfig,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            aspect_ratio: AspectRatio::default(),
            starting_boundary: MANDELBROT_DEFAULTS.starting_boundary,
            render_defaults: RenderParameters::default(),
            response_ordering: ResponseOrdering::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl NavigatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, NavigatorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NavigatorError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::info!("Loaded navigator config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NavigatorError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(NavigatorError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if !self.aspect_ratio.is_valid() {
            return Err(NavigatorError::Config(format!(
                "aspect ratio terms must be positive, got {:?}",
                <[u32; 2]>::from(self.aspect_ratio)
            )));
        }
        if !self.starting_boundary.is_valid() {
            return Err(NavigatorError::Config(format!(
                "starting boundary must be finite with start < end on both axes, got {:?}",
                self.starting_boundary
            )));
        }
        if !self.render_defaults.is_valid() {
            return Err(NavigatorError::Config(
                "maxIterations and paletteLength must be positive".to_string(),
            ));
        }
        if self.renderer.program.as_os_str().is_empty() {
            return Err(NavigatorError::Config("renderer program is empty".to_string()));
        }
        Ok(())
    }
}
