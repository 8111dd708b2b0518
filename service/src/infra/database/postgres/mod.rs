//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;
use tracing as log;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
};

pub use deadpool_postgres::Config;

/// Postgres [`Database`] storing layouts, plots and bookings.
///
/// `T` is the client executing the statements: [`NonTx`] outside a
/// transaction or [`Tx`] inside one.
#[derive(Clone, Copy, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// No connection is opened until the first statement is executed.
    ///
    /// # Errors
    ///
    /// If failed to create a new [`connection::Pool`].
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        log::debug!(
            "Postgres pool created for `{}`",
            conf.dbname.as_deref().unwrap_or_default(),
        );
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`].
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreation(connection::PoolCreationError),

    /// Error of taking a connection from a [`connection::Pool`].
    #[display("`connection::Pool` error: {_0}")]
    Pool(connection::PoolError),
}

impl Error {
    /// Returns the name of the unique constraint violated by the statement,
    /// if that is what failed.
    #[must_use]
    pub fn violated_unique_constraint(&self) -> Option<&str> {
        match self {
            Self::Connection(e) => {
                let e = e.as_db_error()?;
                (e.code() == &SqlState::UNIQUE_VIOLATION)
                    .then(|| e.constraint())
                    .flatten()
            }
            Self::Pool(..) | Self::PoolCreation(..) => None,
        }
    }

    /// Checks if the error is a unique violation of the specified constraint.
    ///
    /// [`None`] matches any unique constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        self.violated_unique_constraint()
            .is_some_and(|c| constraint.map_or(true, |x| x == c))
    }
}
