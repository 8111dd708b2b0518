//! [`Desk`] controller of the operator path.

use tracerr::Traced;
use tracing as log;

use crate::{
    command::{advance_booking_status, AdvanceBookingStatus},
    domain::{booking, user, Booking},
    infra::database,
    query,
    read::booking::Entry,
    Command, Query,
};

use super::{AsFailure as _, Failure};

/// Controller of an operator handling [`Booking`]s on the plots of their
/// layouts.
#[derive(Debug)]
pub struct Desk<S> {
    /// [`Service`] to execute operations with.
    ///
    /// [`Service`]: crate::Service
    service: S,

    /// Signed in operator.
    operator: user::Identity,

    /// Cached [`Entry`]s, newest first.
    entries: Vec<Entry>,
}

impl<S> Desk<S>
where
    S: Query<
            query::bookings::OfOwner,
            Ok = Vec<Entry>,
            Err = Traced<database::Error>,
        > + Command<
            AdvanceBookingStatus,
            Ok = Booking,
            Err = Traced<advance_booking_status::ExecutionError>,
        >,
{
    /// Opens a [`Desk`] of the provided operator.
    ///
    /// # Errors
    ///
    /// If the `operator` is not one, or [`Booking`]s cannot be loaded.
    pub async fn open(
        service: S,
        operator: user::Identity,
    ) -> Result<Self, Failure> {
        if !operator.is_operator() {
            return Err(Failure::validation(&format!(
                "`User(id: {})` is not an operator",
                operator.id,
            )));
        }

        let mut desk = Self {
            service,
            operator,
            entries: vec![],
        };
        desk.refresh().await?;
        Ok(desk)
    }

    /// Returns the cached [`Entry`]s, newest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Re-fetches the [`Entry`]s.
    ///
    /// # Errors
    ///
    /// If [`Booking`]s cannot be loaded.
    pub async fn refresh(&mut self) -> Result<(), Failure> {
        self.entries = self
            .service
            .execute(query::bookings::OfOwner::by(self.operator.id.into()))
            .await
            .map_err(|e| e.into_failure())?;
        Ok(())
    }

    /// Re-fetches the [`Entry`]s after a finished `action`, keeping the
    /// stale ones if that fails.
    async fn refresh_after(&mut self, action: &str) {
        if let Err(e) = self.refresh().await {
            log::warn!(
                "bookings of `User(id: {})` left stale after {action}: {e}",
                self.operator.id,
            );
        }
    }

    /// Moves the [`Booking`] with the provided ID into the `target`
    /// [`booking::Status`].
    ///
    /// The cached [`booking::Status`] is the expected one: if somebody
    /// changed the [`Booking`] meanwhile, nothing is written and a conflict
    /// is returned along with the re-fetched [`Entry`]s. A failed re-fetch
    /// never hides the outcome of the advance itself.
    ///
    /// # Errors
    ///
    /// If the transition is illegal, or the [`Booking`] is rejected.
    pub async fn advance_status(
        &mut self,
        booking_id: booking::Id,
        target: booking::Status,
    ) -> Result<Booking, Failure> {
        let expected = self
            .entries
            .iter()
            .find(|e| e.booking.id == booking_id)
            .map(|e| e.booking.status)
            .ok_or_else(|| {
                Failure::validation(&format!(
                    "`Booking(id: {booking_id})` is not on this desk",
                ))
            })?;
        _ = expected
            .advance(target)
            .map_err(|e| Failure::validation(&e))?;

        let result = self
            .service
            .execute(AdvanceBookingStatus {
                operator: self.operator,
                booking_id,
                expected,
                target,
            })
            .await;
        match result {
            Ok(booking) => {
                log::debug!(
                    "`Booking(id: {booking_id})` advanced from desk to \
                     `{target}`",
                );
                self.refresh_after("advance").await;
                Ok(booking)
            }
            Err(e) => {
                let failure = e.into_failure();
                if failure.is_conflict() {
                    self.refresh_after("conflict").await;
                }
                Err(failure)
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Desk;
    use crate::{
        command::CreateBooking,
        domain::{booking, plot},
        fixture, query,
        workflow::Kind,
        Command as _,
    };

    #[tokio::test]
    async fn lists_own_bookings_only() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;
        let other = fixture::layout(&svc, fixture::operator()).await;
        let q = fixture::plot(&svc, &other, "1", fixture::square()).await;
        for plot_id in [p.id, q.id] {
            _ = svc
                .execute(CreateBooking {
                    buyer: fixture::buyer(),
                    plot_id,
                    contact: fixture::contact(),
                })
                .await
                .unwrap();
        }

        let desk = Desk::open(&svc, owner).await.unwrap();

        assert_eq!(desk.entries().len(), 1);
        assert_eq!(desk.entries()[0].plot_number, p.number);
        assert_eq!(desk.entries()[0].layout_id, layout.id);
    }

    #[tokio::test]
    async fn rejects_buyers() {
        let svc = fixture::service();

        let failure = Desk::open(&svc, fixture::buyer()).await.unwrap_err();

        assert_eq!(failure.kind, Kind::Validation);
    }

    #[tokio::test]
    async fn validates_transition_locally() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;
        let b = svc
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap();
        let mut desk = Desk::open(&svc, owner).await.unwrap();

        let failure = desk
            .advance_status(b.id, booking::Status::Sold)
            .await
            .unwrap_err();

        assert_eq!(failure.kind, Kind::Validation);
        assert_eq!(desk.entries()[0].booking.status, booking::Status::Pending);
    }

    #[tokio::test]
    async fn second_writer_loses() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;
        let b = svc
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap();
        let mut first = Desk::open(&svc, owner).await.unwrap();
        let mut second = Desk::open(&svc, owner).await.unwrap();

        _ = first
            .advance_status(b.id, booking::Status::Confirmed)
            .await
            .unwrap();
        let failure = second
            .advance_status(b.id, booking::Status::Cancelled)
            .await
            .unwrap_err();

        assert_eq!(failure.kind, Kind::Conflict);
        assert_eq!(
            second.entries()[0].booking.status,
            booking::Status::Confirmed,
        );
        let p = svc
            .execute(query::plot::ById::by(p.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(p.status, plot::Status::Booked);
    }

    #[tokio::test]
    async fn sale_propagates_to_plot() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;
        let b = svc
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap();
        let mut desk = Desk::open(&svc, owner).await.unwrap();

        for target in [booking::Status::Confirmed, booking::Status::Sold] {
            let advanced = desk.advance_status(b.id, target).await.unwrap();
            assert_eq!(advanced.status, target);
        }

        let p = svc
            .execute(query::plot::ById::by(p.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(p.status, plot::Status::Sold);
        assert_eq!(desk.entries()[0].booking.status, booking::Status::Sold);
    }

    #[tokio::test]
    async fn advance_stands_when_refetch_fails() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;
        let b = svc
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap();
        let flaky = fixture::Flaky::new(&svc);
        let mut desk = Desk::open(&flaky, owner).await.unwrap();
        flaky.failing.set(true);

        let advanced = desk
            .advance_status(b.id, booking::Status::Confirmed)
            .await
            .unwrap();

        assert_eq!(advanced.status, booking::Status::Confirmed);
        assert_eq!(desk.entries()[0].booking.status, booking::Status::Pending);
    }

    #[tokio::test]
    async fn conflict_survives_failed_refetch() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        let p = fixture::plot(&svc, &layout, "7", fixture::square()).await;
        let b = svc
            .execute(CreateBooking {
                buyer: fixture::buyer(),
                plot_id: p.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap();
        let flaky = fixture::Flaky::new(&svc);
        let mut first = Desk::open(&flaky, owner).await.unwrap();
        let mut second = Desk::open(&flaky, owner).await.unwrap();
        _ = first
            .advance_status(b.id, booking::Status::Confirmed)
            .await
            .unwrap();
        flaky.failing.set(true);

        let failure = second
            .advance_status(b.id, booking::Status::Cancelled)
            .await
            .unwrap_err();

        assert_eq!(failure.kind, Kind::Conflict);
        assert!(failure.message.contains("confirmed"), "{failure}");
    }
}
