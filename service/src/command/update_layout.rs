//! [`Command`] for updating an existing [`Layout`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{layout, user, Layout},
    geometry::Dimensions,
    infra::{database, Database},
    query::MeasureImage,
    Query, Service,
};

use super::Command;

/// [`Command`] for updating descriptive fields or the image of a [`Layout`].
///
/// [`None`] fields are left untouched. Replacing the image re-derives the
/// [`Layout`] dimensions.
#[derive(Clone, Debug)]
pub struct UpdateLayout {
    /// Operator performing the update.
    pub editor: user::Identity,

    /// ID of the [`Layout`] to update.
    pub layout_id: layout::Id,

    /// New [`layout::Title`].
    pub title: Option<layout::Title>,

    /// New [`layout::Location`], [`Some`]`(`[`None`]`)` clears it.
    pub location: Option<Option<layout::Location>>,

    /// New [`layout::Description`], [`Some`]`(`[`None`]`)` clears it.
    pub description: Option<Option<layout::Description>>,

    /// New [`layout::ImageUrl`].
    pub image_url: Option<layout::ImageUrl>,
}

impl<Db> Command<UpdateLayout> for Service<Db>
where
    Db: Database<
            Select<By<Option<Layout>, layout::Id>>,
            Ok = Option<Layout>,
            Err = Traced<database::Error>,
        > + Database<Update<Layout>, Err = Traced<database::Error>>,
    Self: Query<
        MeasureImage,
        Ok = Dimensions,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Layout;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateLayout) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateLayout {
            editor,
            layout_id,
            title,
            location,
            description,
            image_url,
        } = cmd;

        let mut layout = self
            .database()
            .execute(Select(By::<Option<Layout>, _>::new(layout_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::LayoutNotExists(layout_id))
            .map_err(tracerr::wrap!())?;
        if layout.owner_id != editor.id || !editor.is_operator() {
            return Err(tracerr::new!(E::NotOwner(editor.id)));
        }

        if let Some(title) = title {
            layout.title = title;
        }
        if let Some(location) = location {
            layout.location = location;
        }
        if let Some(description) = description {
            layout.description = description;
        }
        if let Some(url) = image_url.filter(|u| *u != layout.image_url) {
            layout.dimensions = self
                .execute(MeasureImage(url.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            layout.image_url = url;
        }

        self.database()
            .execute(Update(layout.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(layout)
    }
}

/// Error of [`UpdateLayout`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Layout`] with the provided ID does not exist.
    #[display("`Layout(id: {_0})` does not exist")]
    LayoutNotExists(#[error(not(source))] layout::Id),

    /// Editor does not own the [`Layout`].
    #[display("`User(id: {_0})` does not own the `Layout`")]
    NotOwner(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use super::{ExecutionError, UpdateLayout};
    use crate::{domain::layout, fixture, geometry::Dimensions, Command as _};

    fn update(
        editor: crate::domain::user::Identity,
        layout_id: layout::Id,
    ) -> UpdateLayout {
        UpdateLayout {
            editor,
            layout_id,
            title: None,
            location: None,
            description: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn updates_descriptive_fields() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let created = fixture::layout(&svc, owner).await;

        let updated = svc
            .execute(UpdateLayout {
                title: Some(layout::Title::new("Phase II").unwrap()),
                location: Some(layout::Location::new("Sarjapur")),
                ..update(owner, created.id)
            })
            .await
            .unwrap();

        assert_eq!(updated.title.to_string(), "Phase II");
        assert_eq!(
            updated.location.map(|l| l.to_string()).as_deref(),
            Some("Sarjapur"),
        );
        assert_eq!(updated.image_url, created.image_url);
        assert_eq!(updated.dimensions, created.dimensions);
    }

    #[tokio::test]
    async fn replacing_image_re_derives_dimensions() {
        let svc = fixture::service();
        let owner = fixture::operator();
        let created = fixture::layout(&svc, owner).await;

        let updated = svc
            .execute(UpdateLayout {
                image_url: layout::ImageUrl::new("https://cdn.test/l.png"),
                ..update(owner, created.id)
            })
            .await
            .unwrap();

        assert_eq!(updated.dimensions, Dimensions::FALLBACK);
    }

    #[tokio::test]
    async fn only_owner_updates() {
        let svc = fixture::service();
        let created = fixture::layout(&svc, fixture::operator()).await;

        let err = svc
            .execute(update(fixture::operator(), created.id))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotOwner(_)));
    }
}
