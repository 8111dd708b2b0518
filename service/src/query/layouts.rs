//! [`Query`] collection related to the multiple [`Layout`]s.

use common::operations::By;

use crate::domain::{user, Layout};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Layout`]s, newest first.
pub type All = DatabaseQuery<By<Vec<Layout>, ()>>;

/// Queries the [`Layout`]s owned by the operator, newest first.
pub type OfOwner = DatabaseQuery<By<Vec<Layout>, user::Id>>;
