//! Explorer defaults and render parameters.
//!
//! The defaults here are what a reset returns to; they are shared by the
//! navigator and by anything that builds render requests directly.

use crate::boundary::Boundary;
use serde::{Deserialize, Serialize};

/// Default exploration settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplorerDefaults {
    /// Boundary shown before any selection
    pub starting_boundary: Boundary,
    pub max_iterations: u32,
    pub palette_length: u32,
    pub palette_id: u32,
}

/// Mandelbrot exploration defaults.
pub static MANDELBROT_DEFAULTS: ExplorerDefaults = ExplorerDefaults {
    starting_boundary: Boundary {
        re_start: -2.0,
        re_end: 1.0,
        im_start: -1.0,
        im_end: 1.0,
    },
    max_iterations: 700,
    palette_length: 250,
    palette_id: 0,
};

/// Parameters passed to the renderer alongside the boundary.
///
/// Changing any of them re-renders the current boundary unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderParameters {
    pub max_iterations: u32,
    pub palette_length: u32,
    pub palette_id: u32,
}

impl RenderParameters {
    /// Iteration cap and palette length must be positive.
    pub fn is_valid(&self) -> bool {
        self.max_iterations > 0 && self.palette_length > 0
    }
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            max_iterations: MANDELBROT_DEFAULTS.max_iterations,
            palette_length: MANDELBROT_DEFAULTS.palette_length,
            palette_id: MANDELBROT_DEFAULTS.palette_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandelbrot_defaults_values() {
        assert_eq!(MANDELBROT_DEFAULTS.starting_boundary, Boundary::default());
        assert_eq!(MANDELBROT_DEFAULTS.max_iterations, 700);
        assert_eq!(MANDELBROT_DEFAULTS.palette_length, 250);
        assert_eq!(MANDELBROT_DEFAULTS.palette_id, 0);
    }

    #[test]
    fn default_parameters_are_valid() {
        assert!(RenderParameters::default().is_valid());
    }

    #[test]
    fn zero_iterations_are_invalid() {
        let params = RenderParameters {
            max_iterations: 0,
            ..RenderParameters::default()
        };
        assert!(!params.is_valid());
    }

    #[test]
    fn parameters_use_camel_case() {
        let json = serde_json::to_string(&RenderParameters::default()).unwrap();
        assert_eq!(json, r#"{"maxIterations":700,"paletteLength":250,"paletteId":0}"#);
    }
}
