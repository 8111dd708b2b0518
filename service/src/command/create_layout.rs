//! [`Command`] for creating a new [`Layout`].

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{layout, user, Layout},
    geometry::Dimensions,
    infra::{database, Database},
    query::MeasureImage,
    Query, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Layout`].
#[derive(Clone, Debug)]
pub struct CreateLayout {
    /// Operator owning the new [`Layout`].
    pub owner: user::Identity,

    /// [`layout::Title`] of the new [`Layout`].
    pub title: layout::Title,

    /// [`layout::Location`] of the new [`Layout`].
    pub location: Option<layout::Location>,

    /// [`layout::Description`] of the new [`Layout`].
    pub description: Option<layout::Description>,

    /// [`layout::ImageUrl`] of the new [`Layout`] image.
    pub image_url: layout::ImageUrl,
}

impl<Db> Command<CreateLayout> for Service<Db>
where
    Db: Database<Insert<Layout>, Err = Traced<database::Error>>,
    Self: Query<
        MeasureImage,
        Ok = Dimensions,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Layout;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateLayout) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateLayout {
            owner,
            title,
            location,
            description,
            image_url,
        } = cmd;

        if !owner.is_operator() {
            return Err(tracerr::new!(E::NotOperator(owner.id)));
        }

        let dimensions = self
            .execute(MeasureImage(image_url.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let layout = Layout {
            id: layout::Id::new(),
            owner_id: owner.id,
            title,
            location,
            description,
            image_url,
            dimensions,
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Insert(layout.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Layout(id: {})` of {dimensions} created by `User(id: {})`",
            layout.id,
            owner.id,
        );

        Ok(layout)
    }
}

/// Error of [`CreateLayout`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Creator is not an operator.
    #[display("`User(id: {_0})` is not an operator")]
    NotOperator(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use super::{CreateLayout, ExecutionError};
    use crate::{
        domain::layout,
        fixture,
        geometry::Dimensions,
        query, Command as _,
    };

    #[tokio::test]
    async fn measures_uploaded_image() {
        let svc = fixture::service();
        let owner = fixture::operator();

        let created = fixture::layout(&svc, owner).await;

        assert_eq!(created.dimensions, Dimensions::new(1, 1).unwrap());
        assert_eq!(created.owner_id, owner.id);

        let stored = svc
            .execute(query::layout::ById::by(created.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, created.title);
    }

    #[tokio::test]
    async fn falls_back_for_unknown_image() {
        let svc = fixture::service();

        let created = svc
            .execute(CreateLayout {
                owner: fixture::operator(),
                title: layout::Title::new("Sunrise Enclave").unwrap(),
                location: layout::Location::new("Hosur Road"),
                description: None,
                image_url: layout::ImageUrl::new("/uploads/missing.png")
                    .unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(created.dimensions, Dimensions::FALLBACK);
    }

    #[tokio::test]
    async fn rejects_buyers() {
        let err = fixture::service()
            .execute(CreateLayout {
                owner: fixture::buyer(),
                title: layout::Title::new("Sunrise Enclave").unwrap(),
                location: None,
                description: None,
                image_url: layout::ImageUrl::new("/uploads/a.png").unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotOperator(_)));
    }
}
