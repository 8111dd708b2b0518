//! Availability [`Status`] of a [`Plot`] and its transition table.
//!
//! [`Plot`]: super::Plot

use common::define_kind;
use derive_more::{Display, Error};

use crate::domain::booking;

define_kind! {
    #[doc = "Availability status of a [`Plot`](super::Plot)."]
    enum Status {
        #[doc = "Open for booking."]
        #[str = "available"]
        Available = 1,

        #[doc = "Held by a pending or confirmed booking."]
        #[str = "booked"]
        Booked = 2,

        #[doc = "Sold. Terminal."]
        #[str = "sold"]
        Sold = 3,
    }
}

impl Status {
    /// Applies the provided booking [`Event`] to this [`Status`].
    ///
    /// | from        | event       | to          |
    /// |-------------|-------------|-------------|
    /// | `available` | `created`   | `booked`    |
    /// | `booked`    | `confirmed` | `booked`    |
    /// | `booked`    | `sold`      | `sold`      |
    /// | `booked`    | `cancelled` | `available` |
    ///
    /// # Errors
    ///
    /// If the pair is not in the table above.
    ///
    /// [`Event`]: booking::Event
    pub fn on(self, event: booking::Event) -> Result<Self, InvalidTransition> {
        use booking::Event as Ev;

        match (self, event) {
            (Self::Available, Ev::Created) | (Self::Booked, Ev::Confirmed) => {
                Ok(Self::Booked)
            }
            (Self::Booked, Ev::Sold) => Ok(Self::Sold),
            (Self::Booked, Ev::Cancelled) => Ok(Self::Available),
            (
                Self::Available,
                Ev::Confirmed | Ev::Sold | Ev::Cancelled,
            )
            | (Self::Booked, Ev::Created)
            | (
                Self::Sold,
                Ev::Created | Ev::Confirmed | Ev::Sold | Ev::Cancelled,
            ) => Err(InvalidTransition { from: self, event }),
        }
    }

    /// Projects the [`Status`] of a plot from the status of its active
    /// booking, if any.
    #[must_use]
    pub fn project(booking: Option<booking::Status>) -> Self {
        use booking::Status as B;

        match booking {
            None | Some(B::Cancelled) => Self::Available,
            Some(B::Pending | B::Confirmed) => Self::Booked,
            Some(B::Sold) => Self::Sold,
        }
    }

    /// Indicates whether no transition leaves this [`Status`].
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Sold)
    }
}

/// Booking [`Event`] cannot be applied to a plot in the given [`Status`].
///
/// [`Event`]: booking::Event
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("`{event}` booking event is invalid for `{from}` plot")]
pub struct InvalidTransition {
    /// [`Status`] the transition was attempted from.
    #[error(not(source))]
    pub from: Status,

    /// Rejected booking [`Event`].
    ///
    /// [`Event`]: booking::Event
    #[error(not(source))]
    pub event: booking::Event,
}

#[cfg(test)]
mod spec {
    use super::Status;
    use crate::domain::booking::{self, Event};

    #[test]
    fn follows_transition_table() {
        assert_eq!(Status::Available.on(Event::Created), Ok(Status::Booked));
        assert_eq!(Status::Booked.on(Event::Confirmed), Ok(Status::Booked));
        assert_eq!(Status::Booked.on(Event::Sold), Ok(Status::Sold));
        assert_eq!(Status::Booked.on(Event::Cancelled), Ok(Status::Available));
    }

    #[test]
    fn rejects_other_pairs() {
        for (from, event) in [
            (Status::Available, Event::Confirmed),
            (Status::Available, Event::Sold),
            (Status::Available, Event::Cancelled),
            (Status::Booked, Event::Created),
        ] {
            assert!(from.on(event).is_err(), "{from} accepted {event}");
        }
        for event in Event::ALL {
            assert!(Status::Sold.on(*event).is_err(), "sold accepted {event}");
        }
    }

    #[test]
    fn projects_active_booking() {
        use booking::Status as B;

        assert_eq!(Status::project(None), Status::Available);
        assert_eq!(Status::project(Some(B::Pending)), Status::Booked);
        assert_eq!(Status::project(Some(B::Confirmed)), Status::Booked);
        assert_eq!(Status::project(Some(B::Sold)), Status::Sold);
        assert_eq!(Status::project(Some(B::Cancelled)), Status::Available);
    }

    #[test]
    fn table_agrees_with_projection() {
        // Walking every legal booking path keeps the plot status equal to the
        // projection of the booking status.
        use booking::Status as B;

        let paths: &[&[B]] = &[
            &[B::Pending, B::Confirmed, B::Sold],
            &[B::Pending, B::Cancelled],
            &[B::Pending, B::Confirmed, B::Cancelled],
        ];
        for path in paths {
            let mut plot = Status::Available.on(Event::Created).unwrap();
            let mut current = path[0];
            assert_eq!(plot, Status::project(Some(current)));

            for &next in &path[1..] {
                plot = plot.on(current.advance(next).unwrap()).unwrap();
                current = next;

                assert_eq!(plot, Status::project(Some(current)));
            }
        }
    }

    #[test]
    fn only_sold_is_terminal() {
        assert!(Status::Sold.is_terminal());
        assert!(!Status::Booked.is_terminal());
        assert!(!Status::Available.is_terminal());
    }
}
