use serde::{Deserialize, Serialize};

/// Canvas resolution in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(900, 600)
    }
}

/// Pointer position in pixel space (y grows downward)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Required width:height ratio of a selection, e.g. `[3, 2]` for a 900x600 canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl From<[u32; 2]> for AspectRatio {
    fn from([width, height]: [u32; 2]) -> Self {
        Self::new(width, height)
    }
}

impl From<AspectRatio> for [u32; 2] {
    fn from(ratio: AspectRatio) -> Self {
        [ratio.width, ratio.height]
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::new(3, 2)
    }
}

/// Axis-aligned selection in pixel space. `top < bottom` in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Selection {
    /// Build the selection spanned by a press and a release, forced to `ratio`.
    ///
    /// Whichever axis the drag covers more of (relative to the ratio) is kept;
    /// the other is recomputed from it, keeping the drag direction. A drag with
    /// no movement on the recomputed axis extends it in the positive direction.
    pub fn constrained(press: PixelPoint, release: PixelPoint, ratio: AspectRatio) -> Self {
        let ratio_w = ratio.width as f64;
        let ratio_h = ratio.height as f64;
        let mut dx = release.x - press.x;
        let mut dy = release.y - press.y;

        if dx.abs() * ratio_h > dy.abs() * ratio_w {
            dy = direction(dy) * dx.abs() * ratio_h / ratio_w;
        } else {
            dx = direction(dx) * dy.abs() * ratio_w / ratio_h;
        }

        Self {
            left: press.x.min(press.x + dx),
            right: press.x.max(press.x + dx),
            top: press.y.min(press.y + dy),
            bottom: press.y.max(press.y + dy),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}

fn direction(delta: f64) -> f64 {
    if delta < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ratio(selection: &Selection, ratio: AspectRatio) {
        let actual = selection.width() / selection.height();
        assert!(
            (actual - ratio.as_f64()).abs() < 1e-9,
            "expected ratio {}, got {}",
            ratio.as_f64(),
            actual
        );
    }

    #[test]
    fn wide_drag_keeps_width() {
        let ratio = AspectRatio::new(3, 2);
        let selection =
            Selection::constrained(PixelPoint::new(100.0, 100.0), PixelPoint::new(400.0, 150.0), ratio);
        assert_eq!(selection.left, 100.0);
        assert_eq!(selection.right, 400.0);
        assert_eq!(selection.top, 100.0);
        assert_eq!(selection.bottom, 300.0);
        assert_ratio(&selection, ratio);
    }

    #[test]
    fn tall_drag_keeps_height() {
        let ratio = AspectRatio::new(3, 2);
        let selection =
            Selection::constrained(PixelPoint::new(100.0, 100.0), PixelPoint::new(120.0, 300.0), ratio);
        assert_eq!(selection.height(), 200.0);
        assert_eq!(selection.width(), 300.0);
        assert_ratio(&selection, ratio);
    }

    #[test]
    fn drag_up_and_left_keeps_direction() {
        let ratio = AspectRatio::new(3, 2);
        let selection =
            Selection::constrained(PixelPoint::new(500.0, 400.0), PixelPoint::new(200.0, 390.0), ratio);
        assert_eq!(selection.right, 500.0);
        assert_eq!(selection.left, 200.0);
        assert_eq!(selection.bottom, 400.0);
        assert_eq!(selection.top, 200.0);
    }

    #[test]
    fn horizontal_drag_extends_downward() {
        let ratio = AspectRatio::new(3, 2);
        let selection =
            Selection::constrained(PixelPoint::new(0.0, 0.0), PixelPoint::new(90.0, 0.0), ratio);
        assert_eq!(selection.height(), 60.0);
        assert!(!selection.is_empty());
    }

    #[test]
    fn click_without_drag_is_empty() {
        let point = PixelPoint::new(10.0, 10.0);
        let selection = Selection::constrained(point, point, AspectRatio::default());
        assert!(selection.is_empty());
    }

    #[test]
    fn ratio_holds_for_many_drags() {
        let ratio = AspectRatio::new(16, 9);
        let press = PixelPoint::new(450.0, 300.0);
        for (x, y) in [(0.0, 0.0), (900.0, 10.0), (451.0, 599.0), (13.0, 377.5), (800.0, 290.0)] {
            let selection = Selection::constrained(press, PixelPoint::new(x, y), ratio);
            assert_ratio(&selection, ratio);
        }
    }

    #[test]
    fn aspect_ratio_serializes_as_pair() {
        let json = serde_json::to_string(&AspectRatio::new(2, 3)).unwrap();
        assert_eq!(json, "[2,3]");
        let restored: AspectRatio = serde_json::from_str("[16,9]").unwrap();
        assert_eq!(restored, AspectRatio::new(16, 9));
    }
}
