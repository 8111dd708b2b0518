//! [`Plot`] definitions.

mod status;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{domain::layout, geometry::Polygon};

pub use self::status::{InvalidTransition, Status};

/// Individual parcel of land drawn on a [`Layout`].
///
/// [`Layout`]: crate::domain::Layout
#[derive(Clone, Debug)]
pub struct Plot {
    /// ID of this [`Plot`].
    pub id: Id,

    /// ID of the [`Layout`] this [`Plot`] is drawn on.
    ///
    /// [`Layout`]: crate::domain::Layout
    pub layout_id: layout::Id,

    /// [`Number`] of this [`Plot`] within its [`Layout`].
    ///
    /// [`Layout`]: crate::domain::Layout
    pub number: Number,

    /// Boundary of this [`Plot`] in intrinsic image space.
    pub polygon: Polygon,

    /// [`Area`] of this [`Plot`].
    pub area: Area,

    /// Price of this [`Plot`].
    pub price: Money,

    /// [`Facing`] of this [`Plot`].
    pub facing: Facing,

    /// [`Description`] of this [`Plot`], if any.
    pub description: Option<Description>,

    /// Availability [`Status`] of this [`Plot`].
    ///
    /// Always equals the [`Status::project()`]ion of the active booking of
    /// this [`Plot`].
    pub status: Status,

    /// [`DateTime`] when this [`Plot`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Plot`].
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

/// Number of a [`Plot`], as printed on the layout, like `A-12`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        number.trim() == number && !number.is_empty() && number.len() <= 32
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Number`")
    }
}

/// Area of a [`Plot`] in square feet.
#[derive(AsRef, Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Area(Decimal);

impl Area {
    /// Creates a new [`Area`] if the given `sq_ft` is positive.
    #[must_use]
    pub fn new(sq_ft: Decimal) -> Option<Self> {
        (sq_ft > Decimal::ZERO).then_some(Self(sq_ft))
    }

    /// Returns the square feet of this [`Area`].
    #[must_use]
    pub fn sq_ft(self) -> Decimal {
        self.0
    }
}

impl FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Area`")
    }
}

define_kind! {
    #[doc = "Direction a [`Plot`] faces."]
    enum Facing {
        #[doc = "East."]
        #[str = "E"]
        East = 1,

        #[doc = "West."]
        #[str = "W"]
        West = 2,

        #[doc = "North."]
        #[str = "N"]
        North = 3,

        #[doc = "South."]
        #[str = "S"]
        South = 4,

        #[doc = "North-east."]
        #[str = "NE"]
        NorthEast = 5,

        #[doc = "North-west."]
        #[str = "NW"]
        NorthWest = 6,

        #[doc = "South-east."]
        #[str = "SE"]
        SouthEast = 7,

        #[doc = "South-west."]
        #[str = "SW"]
        SouthWest = 8,
    }
}

/// Free-form description of a [`Plot`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.trim().is_empty() && text.len() <= 2048).then_some(Self(text))
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// [`DateTime`] when a [`Plot`] was created.
pub type CreationDateTime = DateTimeOf<(Plot, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Area, Facing, Number};

    #[test]
    fn area_must_be_positive() {
        assert!("1200.5".parse::<Area>().is_ok());
        assert!("0".parse::<Area>().is_err());
        assert!("-3".parse::<Area>().is_err());
        assert!("wide".parse::<Area>().is_err());
    }

    #[test]
    fn facing_uses_compass_abbreviations() {
        assert_eq!("NE".parse::<Facing>(), Ok(Facing::NorthEast));
        assert_eq!(Facing::SouthWest.to_string(), "SW");
        assert_eq!(Facing::ALL.len(), 8);
    }

    #[test]
    fn number_is_trimmed() {
        assert!(Number::new("A-12").is_some());
        assert!(Number::new(" 12").is_none());
        assert!(Number::new("").is_none());
    }
}
