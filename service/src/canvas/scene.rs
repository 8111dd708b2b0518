//! Renderable snapshot of a [`Canvas`].

#[cfg(doc)]
use super::Canvas;
use super::Swatch;
use crate::{
    domain::Plot,
    geometry::{self, Dimensions, Vertex},
};

/// Everything needed to draw a [`Canvas`] over its layout image.
///
/// All coordinates are in the intrinsic pixel space of the image.
#[derive(Clone, Debug)]
pub struct Scene<'p> {
    /// Intrinsic size of the image, used as the view box.
    pub view_box: Dimensions,

    /// [`Shape`]s of the rendered [`Plot`]s, in the provided order.
    pub shapes: Vec<Shape<'p>>,

    /// [`Draft`] polygon being drawn, if any.
    pub draft: Option<Draft>,

    /// [`Plot`] under the pointer, if any.
    pub hovered: Option<&'p Plot>,
}

impl Scene<'_> {
    /// Returns the SVG `viewBox` attribute value of this [`Scene`].
    #[must_use]
    pub fn view_box_attr(&self) -> String {
        format!(
            "0 0 {} {}",
            self.view_box.width(),
            self.view_box.height(),
        )
    }
}

/// Closed outline of a single [`Plot`].
#[derive(Clone, Debug)]
pub struct Shape<'p> {
    /// Outlined [`Plot`].
    pub plot: &'p Plot,

    /// [`Swatch`] matching the [`Plot`] status.
    pub swatch: Swatch,

    /// Whether the pointer is over this [`Shape`].
    pub hovered: bool,
}

impl Shape<'_> {
    /// Returns the SVG `points` attribute value of this [`Shape`].
    #[must_use]
    pub fn points(&self) -> String {
        self.plot.polygon.to_string()
    }

    /// Returns the opacity the [`Swatch::fill`] is applied with.
    #[must_use]
    pub fn fill_opacity(&self) -> f64 {
        if self.hovered {
            Swatch::HOVER_FILL_OPACITY
        } else {
            Swatch::FILL_OPACITY
        }
    }
}

/// Open polyline of the polygon being drawn, with a marker per vertex.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    /// Placed [`Vertex`]es, in placement order.
    pub vertices: Vec<Vertex>,

    /// Whether the polygon can be completed already.
    pub completable: bool,
}

impl Draft {
    /// Returns the SVG `points` attribute value of the polyline.
    #[must_use]
    pub fn points(&self) -> String {
        geometry::serialize(&self.vertices)
    }
}
