//! [`Command`] for advancing a [`Booking`] through its lifecycle.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, layout, plot, user, Booking, Layout, Plot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Booking`] into another [`booking::Status`].
///
/// The [`Plot`] status is recomputed and stored in the same transaction.
#[derive(Clone, Copy, Debug)]
pub struct AdvanceBookingStatus {
    /// Operator owning the layout of the booked [`Plot`].
    pub operator: user::Identity,

    /// ID of the [`Booking`] to advance.
    pub booking_id: booking::Id,

    /// [`booking::Status`] the operator last saw.
    ///
    /// The [`Command`] fails if the stored one differs.
    pub expected: booking::Status,

    /// [`booking::Status`] to move into.
    pub target: booking::Status,
}

impl<Db> Command<AdvanceBookingStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Plot, plot::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Plot>, plot::Id>>,
            Ok = Option<Plot>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Layout>, layout::Id>>,
            Ok = Option<Layout>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Update<Plot>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AdvanceBookingStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AdvanceBookingStatus {
            operator,
            booking_id,
            expected,
            target,
        } = cmd;

        if !operator.is_operator() {
            return Err(tracerr::new!(E::NotOwner(operator.id)));
        }
        let event = expected
            .advance(target)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let plot_id = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?
            .plot_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent transitions upon the same `Plot`.
        tx.execute(Lock(By::<Plot, _>::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        let mut plot = tx
            .execute(Select(By::<Option<Plot>, _>::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;
        tx.execute(Select(By::<Option<Layout>, _>::new(plot.layout_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|l| l.owner_id == operator.id)
            .ok_or(E::NotOwner(operator.id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        if booking.status != expected {
            return Err(tracerr::new!(E::StaleStatus {
                expected,
                actual: booking.status,
            }));
        }

        plot.status = plot
            .status
            .on(event)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        booking.status = target;
        booking.updated_at = DateTime::now().coerce();

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Update(plot))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Booking(id: {booking_id})` advanced `{expected}` -> `{target}` \
             by `User(id: {})`",
            operator.id,
        );

        Ok(booking)
    }
}

/// Error of [`AdvanceBookingStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested [`booking::Status`] is not reachable.
    #[display("{_0}")]
    #[from]
    InvalidTransition(booking::InvalidTransition),

    /// Initiator does not own the layout of the booked [`Plot`].
    #[display("`User(id: {_0})` does not own the booked plot")]
    NotOwner(#[error(not(source))] user::Id),

    /// Stored [`Plot`] status does not accept the transition.
    #[display("{_0}")]
    #[from]
    PlotTransition(plot::InvalidTransition),

    /// [`Booking`] was changed since the initiator last saw it.
    #[display(
        "booking is `{actual}` already, while `{expected}` was expected"
    )]
    StaleStatus {
        /// [`booking::Status`] the initiator last saw.
        #[error(not(source))]
        expected: booking::Status,

        /// Currently stored [`booking::Status`].
        #[error(not(source))]
        actual: booking::Status,
    },
}
