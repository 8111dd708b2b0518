//! [`Drafting`] controller of the operator drawing plots.

use common::Money;
use tracerr::Traced;
use tracing as log;

use crate::{
    canvas::{Canvas, Mode, Scene},
    command::{create_plot, CreatePlot},
    domain::{plot, user, Layout, Plot},
    geometry::{Polygon, Vertex},
    Command,
};

use super::{AsFailure as _, Failure};

/// Details of a [`Plot`] entered once its [`Polygon`] is drawn.
#[derive(Clone, Debug)]
pub struct Details {
    /// [`plot::Number`] of the [`Plot`].
    pub number: plot::Number,

    /// [`plot::Area`] of the [`Plot`].
    pub area: plot::Area,

    /// Price of the [`Plot`].
    pub price: Money,

    /// [`plot::Facing`] of the [`Plot`].
    pub facing: plot::Facing,

    /// [`plot::Description`] of the [`Plot`].
    pub description: Option<plot::Description>,
}

/// Controller of an operator drawing new [`Plot`]s over a [`Layout`].
#[derive(Debug)]
pub struct Drafting<S> {
    /// [`Service`] to execute operations with.
    ///
    /// [`Service`]: crate::Service
    service: S,

    /// Signed in operator.
    author: user::Identity,

    /// [`Layout`] the [`Plot`]s are drawn on.
    layout: Layout,

    /// [`Canvas`] in [`Mode::Editing`].
    canvas: Canvas,

    /// Completed [`Polygon`] waiting for its [`Details`].
    pending: Option<Polygon>,
}

impl<S> Drafting<S>
where
    S: Command<
        CreatePlot,
        Ok = Plot,
        Err = Traced<create_plot::ExecutionError>,
    >,
{
    /// Starts drawing over the provided [`Layout`].
    #[must_use]
    pub fn new(service: S, author: user::Identity, layout: Layout) -> Self {
        let canvas = Canvas::new(Mode::Editing, layout.dimensions);
        Self {
            service,
            author,
            layout,
            canvas,
            pending: None,
        }
    }

    /// Returns the [`Canvas`] being drawn on.
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Places a [`Vertex`] of the polygon being drawn.
    pub fn add_vertex(&mut self, vertex: impl Into<Vertex>) {
        self.canvas.add_vertex(vertex);
    }

    /// Discards the polygon being drawn.
    pub fn reset(&mut self) {
        self.canvas.reset_draft();
    }

    /// Renders the [`Layout`] with its existing `plots` and the draft.
    #[must_use]
    pub fn render<'p>(
        &self,
        plots: &'p [Plot],
        hover: Option<Vertex>,
    ) -> Scene<'p> {
        self.canvas.render(plots, hover)
    }

    /// Completes the polygon being drawn, making it pending for [`save()`].
    ///
    /// Does nothing, keeping the draft, if the draft has too few vertices or
    /// another [`Polygon`] is still pending: [`save()`] or [`discard()`] it
    /// first.
    ///
    /// [`discard()`]: Self::discard
    /// [`save()`]: Self::save
    pub fn complete(&mut self) -> Option<&Polygon> {
        if self.pending.is_some() {
            return None;
        }
        let polygon = self.canvas.complete_polygon()?;
        Some(&*self.pending.insert(polygon))
    }

    /// Returns the pending [`Polygon`], if any.
    #[must_use]
    pub fn pending(&self) -> Option<&Polygon> {
        self.pending.as_ref()
    }

    /// Drops the pending [`Polygon`].
    pub fn discard(&mut self) {
        self.pending = None;
    }

    /// Saves the pending [`Polygon`] as a new [`Plot`].
    ///
    /// The pending [`Polygon`] is kept on failure, so saving can be retried
    /// with corrected [`Details`].
    ///
    /// # Errors
    ///
    /// If nothing is pending, or the [`Plot`] is rejected.
    pub async fn save(&mut self, details: Details) -> Result<Plot, Failure> {
        let polygon = self.pending.clone().ok_or_else(|| {
            Failure::validation(&"complete a polygon of at least 3 points")
        })?;
        let Details {
            number,
            area,
            price,
            facing,
            description,
        } = details;

        let plot = self
            .service
            .execute(CreatePlot {
                author: self.author,
                layout_id: self.layout.id,
                number,
                polygon,
                area,
                price,
                facing,
                description,
            })
            .await
            .map_err(|e| e.into_failure())?;

        log::debug!("`Plot(id: {})` saved from drafting", plot.id);
        self.pending = None;
        Ok(plot)
    }
}

#[cfg(test)]
mod spec {
    use super::{Details, Drafting};
    use crate::{
        domain::{layout, plot},
        fixture,
        workflow::Kind,
    };

    fn details(number: &str) -> Details {
        let cmd = fixture::new_plot(
            layout::Id::new(),
            fixture::operator(),
            number,
            fixture::square(),
        );
        Details {
            number: cmd.number,
            area: cmd.area,
            price: cmd.price,
            facing: cmd.facing,
            description: cmd.description,
        }
    }

    fn draw_square<S>(drafting: &mut Drafting<S>) {
        for v in [(10, 10), (100, 10), (100, 100), (10, 100)] {
            drafting.canvas.add_vertex(v);
        }
    }

    #[tokio::test]
    async fn saves_completed_polygon() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let mut drafting = Drafting::new(&svc, owner, layout);
        draw_square(&mut drafting);

        assert_eq!(
            drafting.complete().map(ToString::to_string).as_deref(),
            Some("10,10 100,10 100,100 10,100"),
        );
        assert!(drafting.canvas().draft().is_empty());

        let saved = drafting.save(details("A1")).await.unwrap();

        assert_eq!(saved.status, plot::Status::Available);
        assert_eq!(saved.polygon, fixture::square());
        assert!(drafting.pending().is_none());
    }

    #[tokio::test]
    async fn keeps_pending_polygon_on_failure() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        _ = fixture::plot(&svc, &layout, "A1", fixture::square()).await;
        let mut drafting = Drafting::new(&svc, owner, layout);
        draw_square(&mut drafting);
        _ = drafting.complete().unwrap();

        let failure = drafting.save(details("A1")).await.unwrap_err();

        assert_eq!(failure.kind, Kind::Conflict);
        assert_eq!(drafting.pending(), Some(&fixture::square()));

        _ = drafting.save(details("A2")).await.unwrap();
        assert!(drafting.pending().is_none());
    }

    #[tokio::test]
    async fn requires_completed_polygon() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let mut drafting = Drafting::new(&svc, owner, layout);
        drafting.add_vertex((1, 1));
        drafting.add_vertex((2, 2));

        assert!(drafting.complete().is_none());
        assert_eq!(drafting.canvas().draft().len(), 2);
        let failure = drafting.save(details("A1")).await.unwrap_err();
        assert_eq!(failure.kind, Kind::Validation);
    }

    #[tokio::test]
    async fn keeps_unsaved_polygon_pending() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let mut drafting = Drafting::new(&svc, owner, layout);
        draw_square(&mut drafting);
        _ = drafting.complete().unwrap();
        for v in [(200, 200), (300, 200), (300, 300)] {
            drafting.add_vertex(v);
        }

        assert!(drafting.complete().is_none());
        assert_eq!(drafting.pending(), Some(&fixture::square()));
        assert_eq!(drafting.canvas().draft().len(), 3);

        drafting.discard();

        assert_eq!(
            drafting.complete().map(ToString::to_string).as_deref(),
            Some("200,200 300,200 300,300"),
        );
    }
}
