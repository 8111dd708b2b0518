//! Domain definitions.

pub mod booking;
pub mod layout;
pub mod plot;
pub mod user;

pub use self::{booking::Booking, layout::Layout, plot::Plot};
