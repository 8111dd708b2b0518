//! In-process [`Database`] implementation.
//!
//! Keeps everything in a single shared [`State`]. A transaction locks the
//! whole [`State`] for its lifetime and works on a staged copy of it, which
//! replaces the locked one on [`Commit`]. Dropping an uncommitted transaction
//! discards the staged copy.

mod impls;

use std::{future::Future, sync::Arc};

use common::operations::{Commit, Transact};
use derive_more::{Deref, Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{layout, Booking, Layout, Plot},
    infra::{
        database::{self, ACTIVE_BOOKING_CONSTRAINT, PLOT_NUMBER_CONSTRAINT},
        Database,
    },
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Default, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Non-transactional [`Memory`] client.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Shared committed [`State`].
    state: Arc<Mutex<State>>,
}

/// Transactional [`Memory`] client.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Staged`] changes of this transaction.
    staged: Arc<Mutex<Staged>>,
}

/// Changes of a [`Tx`] not yet committed.
#[derive(Debug)]
struct Staged {
    /// Lock over the committed [`State`], released once committed.
    origin: Option<OwnedMutexGuard<State>>,

    /// Working copy of the [`State`].
    state: State,
}

/// Stored entities, each collection in insertion order.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Layout`]s.
    layouts: Vec<Layout>,

    /// Stored [`layout::Image`]s.
    images: Vec<layout::Image>,

    /// Stored [`Plot`]s.
    plots: Vec<Plot>,

    /// Stored [`Booking`]s.
    bookings: Vec<Booking>,
}

impl State {
    /// Inserts the provided [`Plot`] or replaces the one with the same ID.
    fn upsert_plot(&mut self, plot: Plot) -> Result<(), Error> {
        let taken = self.plots.iter().any(|p| {
            p.layout_id == plot.layout_id
                && p.number == plot.number
                && p.id != plot.id
        });
        if taken {
            return Err(Error::UniqueViolation(PLOT_NUMBER_CONSTRAINT));
        }
        upsert(&mut self.plots, plot, |a, b| a.id == b.id);
        Ok(())
    }

    /// Inserts the provided [`Booking`] or replaces the one with the same
    /// ID.
    fn upsert_booking(&mut self, booking: Booking) -> Result<(), Error> {
        let taken = booking.is_active()
            && self.bookings.iter().any(|b| {
                b.plot_id == booking.plot_id && b.is_active() && b.id != booking.id
            });
        if taken {
            return Err(Error::UniqueViolation(ACTIVE_BOOKING_CONSTRAINT));
        }
        upsert(&mut self.bookings, booking, |a, b| a.id == b.id);
        Ok(())
    }
}

/// Replaces the item `same` as the provided one, or appends it.
fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    if let Some(existing) = items.iter_mut().find(|i| same(i, &item)) {
        *existing = item;
    } else {
        items.push(item);
    }
}

/// Access to a [`State`] of a [`Memory`] client.
pub trait Store {
    /// Runs the provided function over the [`State`] exclusively.
    fn with<R>(
        &self,
        f: impl FnOnce(&mut State) -> R,
    ) -> impl Future<Output = R>;
}

impl Store for NonTx {
    async fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut *self.state.lock().await)
    }
}

impl Store for Tx {
    async fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.staged.lock().await.state)
    }
}

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let origin = Arc::clone(&self.0.state).lock_owned().await;
        let state = (*origin).clone();
        Ok(Memory(Tx {
            staged: Arc::new(Mutex::new(Staged {
                origin: Some(origin),
                state,
            })),
        }))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let mut staged = self.0.staged.lock().await;
        let Staged { origin, state } = &mut *staged;
        if let Some(mut origin) = origin.take() {
            *origin = state.clone();
        }
        Ok(())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Write would break the named uniqueness constraint.
    #[display("unique constraint `{_0}` violated")]
    UniqueViolation(#[error(not(source))] &'static str),
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::UniqueViolation(c) => constraint.map_or(true, |x| x == *c),
        }
    }
}
