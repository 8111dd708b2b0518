//! [`Query`] collection related to a single [`Layout`].

use common::operations::By;

use crate::domain::{layout, Layout};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Layout`] by its [`layout::Id`].
pub type ById = DatabaseQuery<By<Option<Layout>, layout::Id>>;
