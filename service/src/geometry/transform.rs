//! Mapping between display and intrinsic coordinates.

use super::{Dimensions, Vertex};

/// Position in a continuous 2D space, either display or intrinsic.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,

    /// Vertical coordinate.
    pub y: f64,
}

impl From<Vertex> for Point {
    fn from(v: Vertex) -> Self {
        Self {
            x: f64::from(v.x),
            y: f64::from(v.y),
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Size of the container a layout image is displayed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width in display units.
    pub width: f64,

    /// Height in display units.
    pub height: f64,
}

/// Affine transform of an image fitted into a [`Viewport`] with its aspect
/// ratio preserved and the unused space split evenly on both sides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayTransform {
    /// Display units per intrinsic pixel.
    scale: f64,

    /// Horizontal letterbox offset in display units.
    offset_x: f64,

    /// Vertical letterbox offset in display units.
    offset_y: f64,
}

impl DisplayTransform {
    /// Fits an image of the provided [`Dimensions`] into the `viewport`.
    ///
    /// Returns [`None`] if the `viewport` has no positive finite area.
    #[must_use]
    pub fn fit(viewport: Viewport, dimensions: Dimensions) -> Option<Self> {
        let Viewport { width, height } = viewport;
        if !(width.is_finite() && height.is_finite())
            || width <= 0.0
            || height <= 0.0
        {
            return None;
        }

        let (w, h) = (
            f64::from(dimensions.width()),
            f64::from(dimensions.height()),
        );
        let scale = (width / w).min(height / h);
        Some(Self {
            scale,
            offset_x: (width - w * scale) / 2.0,
            offset_y: (height - h * scale) / 2.0,
        })
    }

    /// Returns the number of display units per intrinsic pixel.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Maps a display `point` into intrinsic space, rounded to whole pixels.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "saturating cast of a rounded value"
    )]
    #[must_use]
    pub fn to_intrinsic(&self, point: Point) -> Vertex {
        let Point { x, y } = self.to_intrinsic_point(point);
        Vertex::new(x.round() as i32, y.round() as i32)
    }

    /// Maps a display `point` into intrinsic space without rounding.
    ///
    /// Suits hit testing, where sub-pixel precision matters.
    #[must_use]
    pub fn to_intrinsic_point(&self, point: Point) -> Point {
        Point {
            x: (point.x - self.offset_x) / self.scale,
            y: (point.y - self.offset_y) / self.scale,
        }
    }

    /// Maps an intrinsic [`Vertex`] into display space.
    #[must_use]
    pub fn to_display(&self, vertex: Vertex) -> Point {
        Point {
            x: f64::from(vertex.x) * self.scale + self.offset_x,
            y: f64::from(vertex.y) * self.scale + self.offset_y,
        }
    }
}

#[cfg(test)]
mod spec {
    use proptest::prelude::*;

    use super::{DisplayTransform, Point, Viewport};
    use crate::geometry::{Dimensions, Vertex};

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions::new(width, height).unwrap()
    }

    #[test]
    fn letterboxes_wide_image() {
        let t = DisplayTransform::fit(
            Viewport {
                width: 800.0,
                height: 800.0,
            },
            dims(2000, 1000),
        )
        .unwrap();

        assert_eq!(t.to_intrinsic((400.0, 400.0).into()), Vertex::new(1000, 500));
        assert_eq!(t.to_intrinsic((0.0, 200.0).into()), Vertex::new(0, 0));
        assert_eq!(
            t.to_display(Vertex::new(2000, 1000)),
            Point { x: 800.0, y: 600.0 },
        );
    }

    #[test]
    fn pillarboxes_tall_image() {
        let t = DisplayTransform::fit(
            Viewport {
                width: 1000.0,
                height: 500.0,
            },
            dims(500, 1000),
        )
        .unwrap();

        assert_eq!(t.to_display(Vertex::new(0, 0)), Point { x: 375.0, y: 0.0 });
        assert_eq!(t.to_intrinsic((500.0, 250.0).into()), Vertex::new(250, 500));
    }

    #[test]
    fn rejects_empty_viewport() {
        for (width, height) in
            [(0.0, 100.0), (100.0, 0.0), (-1.0, 5.0), (f64::NAN, 5.0)]
        {
            let viewport = Viewport { width, height };

            assert!(DisplayTransform::fit(viewport, dims(10, 10)).is_none());
        }
    }

    proptest! {
        #[test]
        fn to_intrinsic_inverts_to_display(
            (w, h) in (1u32..10_000, 1u32..10_000),
            (vw, vh) in (1.0f64..4_000.0, 1.0f64..4_000.0),
            (x, y) in (-20_000i32..20_000, -20_000i32..20_000),
        ) {
            let t = DisplayTransform::fit(
                Viewport { width: vw, height: vh },
                dims(w, h),
            ).unwrap();
            let v = Vertex::new(x, y);

            prop_assert_eq!(t.to_intrinsic(t.to_display(v)), v);
        }
    }
}
