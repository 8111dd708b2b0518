//! [`Command`] for creating a new [`Booking`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, plot, user, Booking, Plot},
    infra::{database, Database},
    read::booking::Active,
    Service,
};

use super::Command;

/// [`Command`] for requesting a [`Plot`] on behalf of a buyer.
///
/// The new [`Booking`] is [`booking::Status::Pending`] and the [`Plot`]
/// becomes [`plot::Status::Booked`] in the same transaction.
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// Buyer requesting the [`Plot`].
    pub buyer: user::Identity,

    /// ID of the requested [`Plot`].
    pub plot_id: plot::Id,

    /// [`booking::Contact`] details of the buyer.
    pub contact: booking::Contact,
}

impl<Db> Command<CreateBooking> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Plot, plot::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Plot>, plot::Id>>,
            Ok = Option<Plot>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<Booking>>, plot::Id>>,
            Ok = Option<Active<Booking>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Update<Plot>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateBooking) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            buyer,
            plot_id,
            contact,
        } = cmd;

        if buyer.role != user::Role::Buyer {
            return Err(tracerr::new!(E::NotBuyer(buyer.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent bookings of the same `Plot`.
        tx.execute(Lock(By::<Plot, _>::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut plot = tx
            .execute(Select(By::<Option<Plot>, _>::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PlotNotExists(plot_id))
            .map_err(tracerr::wrap!())?;

        let active = tx
            .execute(Select(By::<Option<Active<Booking>>, _>::new(plot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if active.is_some() {
            return Err(tracerr::new!(E::PlotNotAvailable(plot.status)));
        }
        plot.status = plot
            .status
            .on(booking::Event::Created)
            .map_err(|e| tracerr::new!(E::PlotNotAvailable(e.from)))?;

        let now = DateTime::now();
        let booking = Booking {
            id: booking::Id::new(),
            plot_id,
            user_id: buyer.id,
            contact,
            status: booking::Status::Pending,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        tx.execute(Insert(booking.clone())).await.map_err(|e| {
            let c = Some(database::ACTIVE_BOOKING_CONSTRAINT);
            if e.as_ref().is_unique_violation(c) {
                tracerr::new!(E::PlotNotAvailable(plot::Status::Booked))
            } else {
                tracerr::map_from(e)
            }
        })?;
        tx.execute(Update(plot))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Booking(id: {})` of `Plot(id: {plot_id})` created by \
             `User(id: {})`",
            booking.id,
            buyer.id,
        );

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requester is not a buyer.
    #[display("`User(id: {_0})` is not a buyer")]
    NotBuyer(#[error(not(source))] user::Id),

    /// [`Plot`] is already booked or sold.
    #[display("plot is not available, it is `{_0}`")]
    PlotNotAvailable(#[error(not(source))] plot::Status),

    /// [`Plot`] with the provided ID does not exist.
    #[display("`Plot(id: {_0})` does not exist")]
    PlotNotExists(#[error(not(source))] plot::Id),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use super::{CreateBooking, ExecutionError};
    use crate::{
        command::AdvanceBookingStatus,
        domain::{booking, plot, user, Booking},
        fixture, query,
        read::booking::Active,
        Command as _,
    };

    #[tokio::test]
    async fn books_available_plot() {
        let svc = fixture::service();
        let layout = fixture::layout(&svc, fixture::operator()).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;
        let buyer = fixture::buyer();

        let created = svc
            .execute(CreateBooking {
                buyer,
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap();

        assert_eq!(created.status, booking::Status::Pending);
        assert_eq!(created.user_id, buyer.id);

        let p = svc
            .execute(query::plot::ById::by(p.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(p.status, plot::Status::Booked);
    }

    #[tokio::test]
    async fn second_booking_conflicts_and_leaves_plot_unchanged() {
        let svc = fixture::service();
        let layout = fixture::layout(&svc, fixture::operator()).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;
        let first = svc
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap();

        let err = svc
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PlotNotAvailable(plot::Status::Booked),
        ));

        let p = svc
            .execute(query::plot::ById::by(p.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(p.status, plot::Status::Booked);

        let active = svc
            .database()
            .execute(Select(By::<Option<Active<Booking>>, _>::new(p.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(active.id, first.id);
    }

    #[tokio::test]
    async fn rejects_operators() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;

        let err = svc
            .execute(CreateBooking {
                buyer: owner,
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotBuyer(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_plot() {
        let err = fixture::service()
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: plot::Id::new(),
                contact: fixture::contact(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::PlotNotExists(_)));
    }

    #[tokio::test]
    async fn sold_plot_cannot_be_booked() {
        let svc = fixture::service();
        let layout = fixture::layout(&svc, fixture::operator()).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;
        let sold = svc
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap();
        for (expected, target) in [
            (booking::Status::Pending, booking::Status::Confirmed),
            (booking::Status::Confirmed, booking::Status::Sold),
        ] {
            _ = svc
                .execute(AdvanceBookingStatus {
                    operator: user::Identity::operator(layout.owner_id),
                    booking_id: sold.id,
                    expected,
                    target,
                })
                .await
                .unwrap();
        }

        let err = svc
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::PlotNotAvailable(plot::Status::Sold),
        ));
        let p = svc
            .execute(query::plot::ById::by(p.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(p.status, plot::Status::Sold);
    }
}
