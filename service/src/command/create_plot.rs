//! [`Command`] for creating a new [`Plot`].

use common::{
    operations::{By, Insert, Select},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{layout, plot, user, Layout, Plot},
    geometry::Polygon,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Plot`] from a completed [`Polygon`].
///
/// New [`Plot`]s are always [`plot::Status::Available`].
#[derive(Clone, Debug)]
pub struct CreatePlot {
    /// Operator drawing the [`Plot`].
    pub author: user::Identity,

    /// ID of the [`Layout`] the [`Plot`] is drawn on.
    pub layout_id: layout::Id,

    /// [`plot::Number`] of the new [`Plot`].
    pub number: plot::Number,

    /// Boundary of the new [`Plot`].
    pub polygon: Polygon,

    /// [`plot::Area`] of the new [`Plot`].
    pub area: plot::Area,

    /// Price of the new [`Plot`].
    pub price: Money,

    /// [`plot::Facing`] of the new [`Plot`].
    pub facing: plot::Facing,

    /// [`plot::Description`] of the new [`Plot`].
    pub description: Option<plot::Description>,
}

impl<Db> Command<CreatePlot> for Service<Db>
where
    Db: Database<
            Select<By<Option<Layout>, layout::Id>>,
            Ok = Option<Layout>,
            Err = Traced<database::Error>,
        > + Database<Insert<Plot>, Err = Traced<database::Error>>,
{
    type Ok = Plot;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreatePlot) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePlot {
            author,
            layout_id,
            number,
            polygon,
            area,
            price,
            facing,
            description,
        } = cmd;

        let layout = self
            .database()
            .execute(Select(By::<Option<Layout>, _>::new(layout_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LayoutNotExists(layout_id))
            .map_err(tracerr::wrap!())?;
        if layout.owner_id != author.id || !author.is_operator() {
            return Err(tracerr::new!(E::NotOwner(author.id)));
        }

        let plot = Plot {
            id: plot::Id::new(),
            layout_id,
            number,
            polygon,
            area,
            price,
            facing,
            description,
            status: plot::Status::Available,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(plot.clone()))
            .await
            .map_err(|e| {
                let c = Some(database::PLOT_NUMBER_CONSTRAINT);
                if e.as_ref().is_unique_violation(c) {
                    tracerr::new!(E::NumberTaken(plot.number.clone()))
                } else {
                    tracerr::map_from(e)
                }
            })?;

        log::info!(
            "`Plot(id: {}, number: {})` drawn on `Layout(id: {layout_id})`",
            plot.id,
            plot.number,
        );

        Ok(plot)
    }
}

/// Error of [`CreatePlot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Layout`] with the provided ID does not exist.
    #[display("`Layout(id: {_0})` does not exist")]
    LayoutNotExists(#[error(not(source))] layout::Id),

    /// Author does not own the [`Layout`].
    #[display("`User(id: {_0})` does not own the `Layout`")]
    NotOwner(#[error(not(source))] user::Id),

    /// Another [`Plot`] of the [`Layout`] has the same number.
    #[display("plot number `{_0}` is already taken on this layout")]
    NumberTaken(#[error(not(source))] plot::Number),
}

#[cfg(test)]
mod spec {
    use super::ExecutionError;
    use crate::{domain::plot, fixture, query, Command as _};

    #[tokio::test]
    async fn creates_available_plot() {
        let svc = fixture::service();
        let layout = fixture::layout(&svc, fixture::operator()).await;

        let created =
            fixture::plot(&svc, &layout, "A-1", fixture::square()).await;

        assert_eq!(created.status, plot::Status::Available);
        assert_eq!(created.polygon.to_string(), "10,10 100,10 100,100 10,100");

        let listed = svc
            .execute(query::plots::OfLayout::by(layout.id))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn rejects_duplicate_number() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let layout = fixture::layout(&svc, owner).await;
        _ = fixture::plot(&svc, &layout, "A-1", fixture::square()).await;

        let err = svc
            .execute(fixture::new_plot(
                layout.id,
                owner,
                "A-1",
                fixture::square(),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NumberTaken(_)));
    }

    #[tokio::test]
    async fn only_owner_draws() {
        let svc = fixture::service();
        let layout = fixture::layout(&svc, fixture::operator()).await;

        let err = svc
            .execute(fixture::new_plot(
                layout.id,
                fixture::operator(),
                "A-1",
                fixture::square(),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotOwner(_)));
    }
}
