//! [`Failure`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use strum::{Display, EnumString};
use tracerr::{Trace, Traced};

use crate::{
    command::{
        advance_booking_status, create_booking, create_layout, create_plot,
        delete_layout, update_layout, upload_layout_image,
    },
    infra::database,
};

/// Category of a [`Failure`], deciding how a controller reacts to it.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum Kind {
    /// Input was rejected before reaching the storage.
    Validation,

    /// Storage state changed under the caller, so its view is stale.
    ///
    /// Controllers re-fetch after it.
    Conflict,

    /// Anything else, surfaced generically.
    Failure,
}

/// Error surfaced to a user of a workflow controller.
#[derive(Clone, Debug, StdError)]
pub struct Failure {
    /// [`Kind`] of this [`Failure`].
    pub kind: Kind,

    /// Human-readable message of this [`Failure`].
    pub message: String,

    /// [`Trace`] of the places this [`Failure`] was propagated through.
    pub trace: Option<Trace>,
}

impl Failure {
    /// Creates a new [`Kind::Validation`] [`Failure`].
    #[must_use]
    pub fn validation(msg: &impl ToString) -> Self {
        Self::new(Kind::Validation, msg)
    }

    /// Creates a new [`Kind::Conflict`] [`Failure`].
    #[must_use]
    pub fn conflict(msg: &impl ToString) -> Self {
        Self::new(Kind::Conflict, msg)
    }

    /// Creates a new [`Kind::Failure`] out of an unexpected error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self::new(Kind::Failure, msg)
    }

    /// Indicates whether this [`Failure`] is a [`Kind::Conflict`].
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind == Kind::Conflict
    }

    fn new(kind: Kind, msg: &impl ToString) -> Self {
        Self {
            kind,
            message: msg.to_string(),
            trace: None,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            kind,
            message,
            trace,
        } = self;

        write!(
            f,
            "[{kind}]: {message}{}",
            trace
                .iter()
                .format_with("", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// Helper trait for converting errors into [`Failure`]s.
pub trait AsFailure {
    /// Tries to convert the error into a [`Failure`].
    ///
    /// [`None`] is returned if the error is not meant to be shown to a user.
    fn try_as_failure(&self) -> Option<Failure>;

    /// Converts the error into a [`Failure`].
    fn as_failure(&self) -> Failure
    where
        Self: fmt::Display,
    {
        self.try_as_failure()
            .unwrap_or_else(|| Failure::internal(&self))
    }

    /// Converts the error into a [`Failure`] by consuming it.
    fn into_failure(self) -> Failure
    where
        Self: fmt::Display + Sized,
    {
        self.as_failure()
    }
}

impl<E: AsFailure + fmt::Display> AsFailure for Traced<E> {
    fn try_as_failure(&self) -> Option<Failure> {
        Some(self.as_failure())
    }

    fn as_failure(&self) -> Failure {
        let mut failure = self.as_ref().as_failure();
        failure.trace = Some(self.trace().clone());
        failure
    }
}

impl AsFailure for database::Error {
    fn try_as_failure(&self) -> Option<Failure> {
        None
    }
}

impl AsFailure for upload_layout_image::ExecutionError {
    fn try_as_failure(&self) -> Option<Failure> {
        use upload_layout_image::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_failure(),
            E::NotOperator(_)
            | E::TooLarge { .. }
            | E::UnsupportedFormat => Some(Failure::validation(self)),
        }
    }
}

impl AsFailure for create_layout::ExecutionError {
    fn try_as_failure(&self) -> Option<Failure> {
        use create_layout::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_failure(),
            E::NotOperator(_) => Some(Failure::validation(self)),
        }
    }
}

impl AsFailure for update_layout::ExecutionError {
    fn try_as_failure(&self) -> Option<Failure> {
        use update_layout::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_failure(),
            E::LayoutNotExists(_) => Some(Failure::conflict(self)),
            E::NotOwner(_) => Some(Failure::validation(self)),
        }
    }
}

impl AsFailure for delete_layout::ExecutionError {
    fn try_as_failure(&self) -> Option<Failure> {
        use delete_layout::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_failure(),
            E::LayoutNotExists(_) => Some(Failure::conflict(self)),
            E::NotOwner(_) => Some(Failure::validation(self)),
        }
    }
}

impl AsFailure for create_plot::ExecutionError {
    fn try_as_failure(&self) -> Option<Failure> {
        use create_plot::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_failure(),
            E::LayoutNotExists(_) | E::NumberTaken(_) => {
                Some(Failure::conflict(self))
            }
            E::NotOwner(_) => Some(Failure::validation(self)),
        }
    }
}

impl AsFailure for create_booking::ExecutionError {
    fn try_as_failure(&self) -> Option<Failure> {
        use create_booking::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_failure(),
            E::PlotNotAvailable(_) | E::PlotNotExists(_) => {
                Some(Failure::conflict(self))
            }
            E::NotBuyer(_) => Some(Failure::validation(self)),
        }
    }
}

impl AsFailure for advance_booking_status::ExecutionError {
    fn try_as_failure(&self) -> Option<Failure> {
        use advance_booking_status::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_failure(),
            E::BookingNotExists(_)
            | E::PlotTransition(_)
            | E::StaleStatus { .. } => Some(Failure::conflict(self)),
            E::InvalidTransition(_) | E::NotOwner(_) => {
                Some(Failure::validation(self))
            }
        }
    }
}
