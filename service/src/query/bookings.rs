//! [`Query`] collection related to the multiple [`Booking`]s.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Booking, Query};
use crate::read::booking::{Buyer, Entry, Owner};

use super::DatabaseQuery;

/// Queries [`Booking`]s on plots of the operator's layouts, newest first.
pub type OfOwner = DatabaseQuery<By<Vec<Entry>, Owner>>;

/// Queries [`Booking`]s made by the buyer, newest first.
pub type OfBuyer = DatabaseQuery<By<Vec<Entry>, Buyer>>;
