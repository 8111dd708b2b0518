//! [`Checkout`] controller of the buyer path.

use tracerr::Traced;
use tracing as log;

use crate::{
    canvas::{Canvas, Mode, Press, Scene},
    command::{create_booking, CreateBooking},
    domain::{booking, layout, plot, user, Booking, Layout, Plot},
    geometry::Vertex,
    infra::database,
    query,
    Command, Query,
};

use super::{AsFailure as _, Failure};

/// Controller of a buyer browsing a single [`Layout`] and booking its
/// [`Plot`]s.
#[derive(Debug)]
pub struct Checkout<S> {
    /// [`Service`] to execute operations with.
    ///
    /// [`Service`]: crate::Service
    service: S,

    /// Signed in user, if any.
    identity: Option<user::Identity>,

    /// Browsed [`Layout`].
    layout: Layout,

    /// Cached [`Plot`]s of the browsed [`Layout`].
    plots: Vec<Plot>,

    /// [`Canvas`] the [`Layout`] is viewed through.
    canvas: Canvas,

    /// ID of the [`Plot`] chosen for booking.
    selected: Option<plot::Id>,
}

impl<S> Checkout<S>
where
    S: Query<
            query::layout::ById,
            Ok = Option<Layout>,
            Err = Traced<database::Error>,
        > + Query<
            query::plots::OfLayout,
            Ok = Vec<Plot>,
            Err = Traced<database::Error>,
        > + Command<
            CreateBooking,
            Ok = Booking,
            Err = Traced<create_booking::ExecutionError>,
        >,
{
    /// Opens the [`Layout`] with the provided ID.
    ///
    /// # Errors
    ///
    /// If the [`Layout`] doesn't exist or cannot be loaded.
    pub async fn open(
        service: S,
        layout_id: layout::Id,
        identity: Option<user::Identity>,
    ) -> Result<Self, Failure> {
        let (layout, plots) = futures::try_join!(
            service.execute(query::layout::ById::by(layout_id)),
            service.execute(query::plots::OfLayout::by(layout_id)),
        )
        .map_err(|e| e.into_failure())?;
        let layout = layout.ok_or_else(|| {
            Failure::conflict(&format!("`Layout(id: {layout_id})` is gone"))
        })?;

        Ok(Self {
            service,
            identity,
            canvas: Canvas::new(Mode::Viewing, layout.dimensions),
            layout,
            plots,
            selected: None,
        })
    }

    /// Returns the browsed [`Layout`].
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns the cached [`Plot`]s of the browsed [`Layout`].
    #[must_use]
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    /// Returns the currently selected [`Plot`], if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Plot> {
        let id = self.selected?;
        self.plots.iter().find(|p| p.id == id)
    }

    /// Renders the browsed [`Layout`] with the pointer at `hover`.
    #[must_use]
    pub fn render(&self, hover: Option<Vertex>) -> Scene<'_> {
        self.canvas.render(&self.plots, hover)
    }

    /// Selects the available [`Plot`] under the pointer, if any.
    pub fn press(&mut self, at: Vertex) -> Option<&Plot> {
        match self.canvas.press(at, &self.plots)? {
            Press::Selected(id) => {
                self.selected = Some(id);
                self.selected()
            }
            Press::Placed(_) => None,
        }
    }

    /// Selects the [`Plot`] with the provided ID for booking.
    ///
    /// # Errors
    ///
    /// If the [`Plot`] is not on the browsed [`Layout`] or not available.
    pub fn select_plot(&mut self, plot_id: plot::Id) -> Result<(), Failure> {
        let plot = self
            .plots
            .iter()
            .find(|p| p.id == plot_id)
            .ok_or_else(|| {
                Failure::validation(&format!(
                    "`Plot(id: {plot_id})` is not on this layout",
                ))
            })?;
        if plot.status != plot::Status::Available {
            return Err(Failure::validation(&format!(
                "plot `{}` is `{}`, not available",
                plot.number, plot.status,
            )));
        }
        self.selected = Some(plot_id);
        Ok(())
    }

    /// Drops the current selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Re-fetches the [`Plot`]s of the browsed [`Layout`].
    ///
    /// # Errors
    ///
    /// If the [`Plot`]s cannot be loaded.
    pub async fn refresh(&mut self) -> Result<(), Failure> {
        self.plots = self
            .service
            .execute(query::plots::OfLayout::by(self.layout.id))
            .await
            .map_err(|e| e.into_failure())?;
        Ok(())
    }

    /// Re-fetches the [`Plot`]s after a finished `action`, keeping the
    /// stale ones if that fails.
    async fn refresh_after(&mut self, action: &str) {
        if let Err(e) = self.refresh().await {
            log::warn!(
                "`Layout(id: {})` left stale after {action}: {e}",
                self.layout.id,
            );
        }
    }

    /// Books the selected [`Plot`] with the provided [`booking::Contact`].
    ///
    /// On success the selection is dropped. On conflict the selection is
    /// kept, while [`Plot`]s are re-fetched to show their current state.
    /// A failed re-fetch only leaves the cached [`Plot`]s stale: the
    /// outcome of the booking itself is returned anyway.
    ///
    /// # Errors
    ///
    /// If no buyer is signed in, nothing is selected, or the booking is
    /// rejected.
    pub async fn submit_booking(
        &mut self,
        contact: booking::Contact,
    ) -> Result<Booking, Failure> {
        let buyer = self
            .identity
            .filter(user::Identity::is_buyer)
            .ok_or_else(|| Failure::validation(&"sign in as a buyer to book"))?;
        let plot_id = self
            .selected
            .ok_or_else(|| Failure::validation(&"select a plot to book"))?;

        let result = self
            .service
            .execute(CreateBooking {
                buyer,
                plot_id,
                contact,
            })
            .await;
        match result {
            Ok(booking) => {
                log::debug!("`Plot(id: {plot_id})` booked from checkout");
                self.selected = None;
                self.refresh_after("booking").await;
                Ok(booking)
            }
            Err(e) => {
                let failure = e.into_failure();
                if failure.is_conflict() {
                    log::debug!(
                        "booking `Plot(id: {plot_id})` conflicted: {}",
                        failure.message,
                    );
                    self.refresh_after("conflict").await;
                }
                Err(failure)
            }
        }
    }
}
