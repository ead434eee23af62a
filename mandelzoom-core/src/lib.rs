pub mod boundary;
pub mod config;
pub mod decimal;
pub mod error;
pub mod fixed_point;
pub mod mapping;
pub mod precision;
pub mod render_request;
pub mod selection;

pub use boundary::{
    Boundary, BoundaryMode, FixedPointBoundary, HighPrecisionBoundary, PRECISION_THRESHOLD,
};
pub use config::{ExplorerDefaults, RenderParameters, MANDELBROT_DEFAULTS};
pub use decimal::BigDecimal;
pub use error::CoordinateError;
pub use fixed_point::{decimal_to_fixed_point, fixed_to_decimal, FixedPoint};
pub use mapping::{
    map, map_high_precision, selection_to_boundary, selection_to_high_precision_boundary,
};
pub use precision::{calculate_precision_digits, MIN_PRECISION_DIGITS};
pub use render_request::{RenderCoordinates, RenderRequest};
pub use selection::{AspectRatio, CanvasSize, PixelPoint, Selection};
