//! User identity definitions.
//!
//! Accounts and sessions are owned by an external authentication service,
//! so only the identity it vouches for is modeled here.

use common::define_kind;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

/// ID of a user.
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
    #[doc = "Role of an authenticated user."]
    enum Role {
        #[doc = "Publishes layouts and manages bookings of their plots."]
        #[str = "operator"]
        Operator = 1,

        #[doc = "Browses layouts and requests plot bookings."]
        #[str = "buyer"]
        Buyer = 2,
    }
}

/// Authenticated user performing an operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Identity {
    /// ID of the user.
    pub id: Id,

    /// [`Role`] of the user.
    pub role: Role,
}

impl Identity {
    /// Creates a new [`Identity`] of an operator.
    #[must_use]
    pub const fn operator(id: Id) -> Self {
        Self {
            id,
            role: Role::Operator,
        }
    }

    /// Creates a new [`Identity`] of a buyer.
    #[must_use]
    pub const fn buyer(id: Id) -> Self {
        Self {
            id,
            role: Role::Buyer,
        }
    }

    /// Indicates whether this [`Identity`] has the [`Role::Operator`].
    #[must_use]
    pub fn is_operator(&self) -> bool {
        self.role == Role::Operator
    }

    /// Indicates whether this [`Identity`] has the [`Role::Buyer`].
    #[must_use]
    pub fn is_buyer(&self) -> bool {
        self.role == Role::Buyer
    }
}
