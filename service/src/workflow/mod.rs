//! Stateful controllers driving a single user session.
//!
//! Every controller keeps a cached view of the storage and takes `&mut self`
//! in its asynchronous operations, so a session cannot run two of them
//! concurrently. Conflicts with other sessions are decided by the storage;
//! a controller re-fetches its view whenever it loses one.

pub mod checkout;
pub mod desk;
pub mod drafting;
pub mod failure;

pub use self::{
    checkout::Checkout,
    desk::Desk,
    drafting::Drafting,
    failure::{AsFailure, Failure, Kind},
};
