//! [`Booking`] read models.

use derive_more::{Deref, From, Into};

use crate::domain::{layout, plot, user, Booking};

/// Wrapper around [`Booking`] indicating that it [`is_active()`].
///
/// [`is_active()`]: Booking::is_active
#[derive(Clone, Debug, Deref)]
pub struct Active<T>(pub T);

/// Selector of [`Entry`]s on all plots of an operator's layouts.
#[derive(Clone, Copy, Debug, Eq, From, Into, PartialEq)]
pub struct Owner(pub user::Id);

/// Selector of [`Entry`]s made by a buyer.
#[derive(Clone, Copy, Debug, Eq, From, Into, PartialEq)]
pub struct Buyer(pub user::Id);

/// [`Booking`] along with the plot details needed to list it.
#[derive(Clone, Debug)]
pub struct Entry {
    /// Listed [`Booking`].
    pub booking: Booking,

    /// [`plot::Number`] of the booked plot.
    pub plot_number: plot::Number,

    /// ID of the layout the booked plot is drawn on.
    pub layout_id: layout::Id,
}
