//! [`Booking`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use uuid::Uuid;

use crate::domain::{plot, user};

/// Request of a buyer to purchase a [`Plot`].
///
/// [`Plot`]: crate::domain::Plot
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the booked [`Plot`].
    ///
    /// [`Plot`]: crate::domain::Plot
    pub plot_id: plot::Id,

    /// ID of the buyer who made this [`Booking`].
    pub user_id: user::Id,

    /// [`Contact`] details left by the buyer.
    pub contact: Contact,

    /// [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Booking`] was last modified.
    pub updated_at: ModificationDateTime,
}

impl Booking {
    /// Indicates whether this [`Booking`] still holds its plot.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// ID of a [`Booking`].
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, FromStr, Hash, Into, PartialEq,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "Requested by a buyer, awaiting the operator."]
        #[str = "pending"]
        Pending = 1,

        #[doc = "Accepted by the operator."]
        #[str = "confirmed"]
        Confirmed = 2,

        #[doc = "Completed sale. Terminal."]
        #[str = "sold"]
        Sold = 3,

        #[doc = "Withdrawn by the operator. Terminal."]
        #[str = "cancelled"]
        Cancelled = 4,
    }
}

impl Status {
    /// Indicates whether a [`Booking`] in this [`Status`] holds its plot.
    ///
    /// At most one active [`Booking`] exists per plot.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Advances this [`Status`] to the `target` one, returning the [`Event`]
    /// the plot should react on.
    ///
    /// The only legal edges are `pending → confirmed`, `pending → cancelled`,
    /// `confirmed → sold` and `confirmed → cancelled`.
    ///
    /// # Errors
    ///
    /// If the edge is not legal.
    pub fn advance(self, target: Self) -> Result<Event, InvalidTransition> {
        match (self, target) {
            (Self::Pending, Self::Confirmed) => Ok(Event::Confirmed),
            (Self::Confirmed, Self::Sold) => Ok(Event::Sold),
            (Self::Pending | Self::Confirmed, Self::Cancelled) => {
                Ok(Event::Cancelled)
            }
            (
                Self::Pending | Self::Confirmed | Self::Sold | Self::Cancelled,
                Self::Pending | Self::Confirmed | Self::Sold | Self::Cancelled,
            ) => Err(InvalidTransition {
                from: self,
                to: target,
            }),
        }
    }
}

define_kind! {
    #[doc = "Change in the life of a [`Booking`] affecting its plot."]
    enum Event {
        #[doc = "New [`Booking`] was created in the [`Status::Pending`]."]
        #[str = "created"]
        Created = 1,

        #[doc = "[`Booking`] was confirmed by the operator."]
        #[str = "confirmed"]
        Confirmed = 2,

        #[doc = "[`Booking`] resulted in a sale."]
        #[str = "sold"]
        Sold = 3,

        #[doc = "[`Booking`] was cancelled by the operator."]
        #[str = "cancelled"]
        Cancelled = 4,
    }
}

/// [`Booking`] cannot be advanced between the given [`Status`]es.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("`{from}` booking cannot become `{to}`")]
pub struct InvalidTransition {
    /// Current [`Status`].
    #[error(not(source))]
    pub from: Status,

    /// Requested [`Status`].
    #[error(not(source))]
    pub to: Status,
}

/// Contact details a buyer leaves with a [`Booking`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contact {
    /// [`Name`] of the buyer.
    pub name: Name,

    /// [`Email`] of the buyer.
    pub email: Email,

    /// [`Phone`] of the buyer.
    pub mobile: Phone,
}

/// Name of a buyer.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Email address of a buyer.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format: a local part and a
        /// dotted domain without whitespace.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Mobile phone number of a buyer.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format: an optional country
        /// code followed by 10 digits, optionally grouped.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(\+\d{1,3}[-\s]?)?\d{3,5}[-\s]?\d{3}[-\s]?\d{2,4}$")
                .expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Booking`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Booking, unit::Modification)>;
