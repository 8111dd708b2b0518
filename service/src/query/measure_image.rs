//! [`MeasureImage`] definition.

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::layout,
    geometry::Dimensions,
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] for the intrinsic [`Dimensions`] of a stored layout image.
///
/// Never fails on the image itself: a missing or unreadable image resolves to
/// [`Dimensions::FALLBACK`]. Only [`Database`] errors are propagated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MeasureImage(pub layout::ImageUrl);

impl<Db> Query<MeasureImage> for Service<Db>
where
    Db: Database<
        Select<By<Option<layout::Image>, layout::ImageUrl>>,
        Ok = Option<layout::Image>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Dimensions;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        MeasureImage(url): MeasureImage,
    ) -> Result<Self::Ok, Self::Err> {
        let image = self
            .database()
            .execute(Select(By::<Option<layout::Image>, _>::new(url.clone())))
            .await
            .map_err(tracerr::wrap!())?;

        let Some(image) = image else {
            log::warn!(
                "no stored image at `{url}`, using {} dimensions",
                Dimensions::FALLBACK,
            );
            return Ok(Dimensions::FALLBACK);
        };

        Ok(Dimensions::measure(&image.bytes).unwrap_or_else(|e| {
            log::warn!(
                "cannot measure image at `{url}`, using {} dimensions: {e}",
                Dimensions::FALLBACK,
            );
            Dimensions::FALLBACK
        }))
    }
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, DateTime};

    use super::MeasureImage;
    use crate::{
        command::UploadLayoutImage,
        domain::layout,
        fixture,
        geometry::Dimensions,
        Command as _,
    };

    #[tokio::test]
    async fn measures_stored_image() {
        let svc = fixture::service();
        let url = svc
            .execute(UploadLayoutImage {
                uploader: fixture::operator(),
                bytes: fixture::GIF_1X1.to_vec(),
            })
            .await
            .unwrap();

        let dims = svc.execute(MeasureImage(url)).await.unwrap();

        assert_eq!(dims, Dimensions::new(1, 1).unwrap());
    }

    #[tokio::test]
    async fn falls_back_for_missing_image() {
        let url = layout::ImageUrl::new("/uploads/missing.png").unwrap();

        let dims = fixture::service()
            .execute(MeasureImage(url))
            .await
            .unwrap();

        assert_eq!(dims, Dimensions::FALLBACK);
    }

    #[tokio::test]
    async fn falls_back_for_garbage() {
        let svc = fixture::service();
        let bytes = b"definitely not an image".to_vec();
        let url = layout::ImageUrl::for_content(&bytes, "png");
        svc.database()
            .execute(Insert(layout::Image {
                url: url.clone(),
                bytes,
                created_at: DateTime::now().coerce(),
            }))
            .await
            .unwrap();

        let dims = svc.execute(MeasureImage(url)).await.unwrap();

        assert_eq!(dims, Dimensions::FALLBACK);
    }
}
