//! [`Command`] definition.

pub mod advance_booking_status;
pub mod create_booking;
pub mod create_layout;
pub mod create_plot;
pub mod delete_layout;
pub mod update_layout;
pub mod upload_layout_image;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    advance_booking_status::AdvanceBookingStatus,
    create_booking::CreateBooking, create_layout::CreateLayout,
    create_plot::CreatePlot, delete_layout::DeleteLayout,
    update_layout::UpdateLayout, upload_layout_image::UploadLayoutImage,
};
