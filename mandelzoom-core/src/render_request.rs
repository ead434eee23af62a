use crate::boundary::{BoundaryMode, FixedPointBoundary};
use crate::config::RenderParameters;
use crate::error::CoordinateError;
use serde::{Deserialize, Serialize};

/// Boundary as handed to the renderer.
///
/// High precision edges travel as decimal strings so no precision is lost at
/// the process boundary; they are never converted to f64.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "precision", rename_all = "snake_case")]
pub enum RenderCoordinates {
    #[serde(rename_all = "camelCase")]
    Native {
        re_start: f64,
        re_end: f64,
        im_start: f64,
        im_end: f64,
    },
    #[serde(rename_all = "camelCase")]
    HighPrecision {
        re_start: String,
        re_end: String,
        im_start: String,
        im_end: String,
        /// The same edges encoded for a fixed point renderer
        fixed_point: FixedPointBoundary,
    },
}

impl RenderCoordinates {
    /// Build the wire coordinates for a boundary.
    ///
    /// High precision boundaries are encoded to fixed point here, so an edge
    /// outside the integer limb range is reported before anything is sent.
    pub fn from_boundary(boundary: &BoundaryMode) -> Result<Self, CoordinateError> {
        match boundary {
            BoundaryMode::Native(b) => {
                b.ensure_finite()?;
                Ok(RenderCoordinates::Native {
                    re_start: b.re_start,
                    re_end: b.re_end,
                    im_start: b.im_start,
                    im_end: b.im_end,
                })
            }
            BoundaryMode::HighPrecision(b) => {
                let fixed_point = b.to_fixed_point()?;
                let [re_start, re_end, im_start, im_end] = b.to_decimal_strings();
                Ok(RenderCoordinates::HighPrecision {
                    re_start,
                    re_end,
                    im_start,
                    im_end,
                    fixed_point,
                })
            }
        }
    }

    pub fn is_high_precision(&self) -> bool {
        matches!(self, RenderCoordinates::HighPrecision { .. })
    }

    /// Edges formatted as command line arguments, `[re_start, re_end, im_start, im_end]`.
    pub fn to_decimal_args(&self) -> [String; 4] {
        match self {
            RenderCoordinates::Native {
                re_start,
                re_end,
                im_start,
                im_end,
            } => [
                re_start.to_string(),
                re_end.to_string(),
                im_start.to_string(),
                im_end.to_string(),
            ],
            RenderCoordinates::HighPrecision {
                re_start,
                re_end,
                im_start,
                im_end,
                ..
            } => [
                re_start.clone(),
                re_end.clone(),
                im_start.clone(),
                im_end.clone(),
            ],
        }
    }
}

/// One render request. `request_id` increases monotonically per navigator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub request_id: u64,
    pub coordinates: RenderCoordinates,
    pub params: RenderParameters,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{Boundary, HighPrecisionBoundary};

    #[test]
    fn native_coordinates_keep_f64_values() {
        let coordinates =
            RenderCoordinates::from_boundary(&BoundaryMode::Native(Boundary::default())).unwrap();
        assert!(!coordinates.is_high_precision());
        assert_eq!(coordinates.to_decimal_args(), ["-2", "1", "-1", "1"]);
    }

    #[test]
    fn high_precision_coordinates_travel_as_strings() {
        let boundary = HighPrecisionBoundary::from_strings(
            "-0.7436438870371587047521915061",
            "-0.7436438870371587047521915060",
            "0.1318259042053119704931320563",
            "0.1318259042053119704931320564",
            64,
        )
        .unwrap();
        let coordinates =
            RenderCoordinates::from_boundary(&BoundaryMode::HighPrecision(boundary)).unwrap();
        let json = serde_json::to_string(&coordinates).unwrap();
        assert!(json.contains("\"precision\":\"high_precision\""));
        assert!(json.contains("\"reStart\":\""));
        assert!(json.contains("\"fixedPoint\""));
    }

    #[test]
    fn out_of_range_high_precision_edge_is_rejected() {
        let boundary = HighPrecisionBoundary::from_strings("0", "5e9", "0", "1", 64).unwrap();
        let result = RenderCoordinates::from_boundary(&BoundaryMode::HighPrecision(boundary));
        assert!(matches!(result, Err(CoordinateError::Range { .. })));
    }

    #[test]
    fn request_roundtrips_through_json() {
        let request = RenderRequest {
            request_id: 7,
            coordinates: RenderCoordinates::from_boundary(&BoundaryMode::Native(Boundary::default()))
                .unwrap(),
            params: RenderParameters::default(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"requestId\":7"));
        let restored: RenderRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, request);
    }
}
