//! Interactive drawing surface over a layout image.
//!
//! A [`Canvas`] either collects the vertices of a new plot polygon
//! ([`Mode::Editing`]) or resolves pointer positions to existing plots
//! ([`Mode::Viewing`]). It never talks to storage: completed polygons are
//! handed over to the caller.

mod palette;
mod scene;

use std::mem;

use tracing as log;

use crate::{
    domain::{plot, Plot},
    geometry::{Dimensions, DisplayTransform, Point, Polygon, Vertex, Viewport},
};

pub use self::{
    palette::{Color, Palette, Swatch},
    scene::{Draft, Scene, Shape},
};

/// Interaction mode of a [`Canvas`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Pointer presses place polygon vertices.
    Editing,

    /// Pointer presses select plots.
    Viewing,
}

/// Outcome of a pointer press on a [`Canvas`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Press {
    /// [`Vertex`] was appended to the draft.
    Placed(Vertex),

    /// Available [`Plot`] was selected.
    Selected(plot::Id),
}

/// Drawing surface over a layout image of known [`Dimensions`].
#[derive(Clone, Debug)]
pub struct Canvas {
    /// Current interaction [`Mode`].
    mode: Mode,

    /// Intrinsic [`Dimensions`] of the layout image.
    dimensions: Dimensions,

    /// [`Vertex`]es of the polygon being drawn.
    draft: Vec<Vertex>,

    /// [`Palette`] to render plots with.
    palette: Palette,
}

impl Canvas {
    /// Creates a new empty [`Canvas`] in the provided [`Mode`].
    #[must_use]
    pub fn new(mode: Mode, dimensions: Dimensions) -> Self {
        Self {
            mode,
            dimensions,
            draft: vec![],
            palette: Palette::default(),
        }
    }

    /// Replaces the [`Palette`] of this [`Canvas`].
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Returns the current [`Mode`] of this [`Canvas`].
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches this [`Canvas`] into another [`Mode`].
    ///
    /// Leaving [`Mode::Editing`] discards the draft.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != Mode::Editing {
            self.reset_draft();
        }
        self.mode = mode;
    }

    /// Returns the intrinsic [`Dimensions`] of the layout image.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Returns the [`Vertex`]es placed so far.
    #[must_use]
    pub fn draft(&self) -> &[Vertex] {
        &self.draft
    }

    /// Maps a pointer position inside the `viewport` onto the layout image.
    ///
    /// [`None`] if the `viewport` has no area.
    #[must_use]
    pub fn locate(&self, viewport: Viewport, pointer: Point) -> Option<Vertex> {
        DisplayTransform::fit(viewport, self.dimensions)
            .map(|t| t.to_intrinsic(pointer))
    }

    /// Appends the provided [`Vertex`] to the draft.
    ///
    /// Does nothing outside [`Mode::Editing`].
    pub fn add_vertex(&mut self, vertex: impl Into<Vertex>) {
        if self.mode == Mode::Editing {
            self.draft.push(vertex.into());
        }
    }

    /// Discards all the placed [`Vertex`]es.
    pub fn reset_draft(&mut self) {
        self.draft.clear();
    }

    /// Indicates whether the draft has enough [`Vertex`]es to be completed.
    #[must_use]
    pub fn can_complete(&self) -> bool {
        self.draft.len() >= Polygon::MIN_VERTICES
    }

    /// Turns the draft into a [`Polygon`] and clears it.
    ///
    /// Leaves the draft untouched and returns [`None`] if it has too few
    /// [`Vertex`]es.
    pub fn complete_polygon(&mut self) -> Option<Polygon> {
        if !self.can_complete() {
            return None;
        }
        let polygon = Polygon::new(mem::take(&mut self.draft))?;
        log::debug!("polygon `{polygon}` completed");
        Some(polygon)
    }

    /// Resolves the first of the `plots` containing the provided [`Vertex`].
    #[must_use]
    pub fn hit<'p>(plots: &'p [Plot], at: Vertex) -> Option<&'p Plot> {
        plots.iter().find(|p| p.polygon.contains(at))
    }

    /// Handles a pointer press at the provided [`Vertex`].
    ///
    /// In [`Mode::Editing`] places a [`Vertex`]. In [`Mode::Viewing`] selects
    /// the [`Plot`] under the pointer, if it's still available.
    pub fn press(&mut self, at: Vertex, plots: &[Plot]) -> Option<Press> {
        match self.mode {
            Mode::Editing => {
                self.add_vertex(at);
                Some(Press::Placed(at))
            }
            Mode::Viewing => Self::hit(plots, at)
                .filter(|p| p.status == plot::Status::Available)
                .map(|p| Press::Selected(p.id)),
        }
    }

    /// Renders the provided `plots` along with the draft.
    #[must_use]
    pub fn render<'p>(
        &self,
        plots: &'p [Plot],
        hover: Option<Vertex>,
    ) -> Scene<'p> {
        let hovered = hover.and_then(|at| Self::hit(plots, at));
        let shapes = plots
            .iter()
            .map(|plot| Shape {
                plot,
                swatch: self.palette.swatch(plot.status),
                hovered: hovered.is_some_and(|h| h.id == plot.id),
            })
            .collect();
        let draft = (!self.draft.is_empty()).then(|| Draft {
            vertices: self.draft.clone(),
            completable: self.can_complete(),
        });

        Scene {
            view_box: self.dimensions,
            shapes,
            draft,
            hovered,
        }
    }
}
