//! [`Command`] for deleting a [`Layout`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{layout, user, Layout},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Layout`] along with its plots and their
/// bookings.
#[derive(Clone, Copy, Debug)]
pub struct DeleteLayout {
    /// Operator deleting the [`Layout`].
    pub initiator: user::Identity,

    /// ID of the [`Layout`] to delete.
    pub layout_id: layout::Id,
}

impl<Db> Command<DeleteLayout> for Service<Db>
where
    Db: Database<
            Select<By<Option<Layout>, layout::Id>>,
            Ok = Option<Layout>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Layout, layout::Id>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteLayout) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteLayout {
            initiator,
            layout_id,
        } = cmd;

        let layout = self
            .database()
            .execute(Select(By::<Option<Layout>, _>::new(layout_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LayoutNotExists(layout_id))
            .map_err(tracerr::wrap!())?;
        if layout.owner_id != initiator.id || !initiator.is_operator() {
            return Err(tracerr::new!(E::NotOwner(initiator.id)));
        }

        self.database()
            .execute(Delete(By::<Layout, _>::new(layout_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!("`Layout(id: {layout_id})` deleted");

        Ok(())
    }
}

/// Error of [`DeleteLayout`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Layout`] with the provided ID does not exist.
    #[display("`Layout(id: {_0})` does not exist")]
    LayoutNotExists(#[error(not(source))] layout::Id),

    /// Initiator does not own the [`Layout`].
    #[display("`User(id: {_0})` does not own the `Layout`")]
    NotOwner(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use super::{DeleteLayout, ExecutionError};
    use crate::{command::CreateBooking, fixture, query, Command as _};

    #[tokio::test]
    async fn cascades_to_plots_and_bookings() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let buyer = fixture::buyer();
        let layout = fixture::layout(&svc, owner).await;
        let plot = fixture::plot(&svc, &layout, "1", fixture::square()).await;
        _ = svc
            .execute(CreateBooking {
                buyer,
                plot_id: plot.id,
                contact: fixture::contact(),
            })
            .await
            .unwrap();

        svc.execute(DeleteLayout {
            initiator: owner,
            layout_id: layout.id,
        })
        .await
        .unwrap();

        assert!(svc
            .execute(query::layout::ById::by(layout.id))
            .await
            .unwrap()
            .is_none());
        assert!(svc
            .execute(query::plot::ById::by(plot.id))
            .await
            .unwrap()
            .is_none());
        assert!(svc
            .execute(query::bookings::OfBuyer::by(buyer.id.into()))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn only_owner_deletes() {
        let svc = fixture::service();
        let layout = fixture::layout(&svc, fixture::operator()).await;

        let err = svc
            .execute(DeleteLayout {
                initiator: fixture::operator(),
                layout_id: layout.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotOwner(_)));
    }
}
