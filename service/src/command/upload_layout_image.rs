//! [`Command`] for uploading a [`layout::Image`].

use common::{operations::Insert, DateTime};
use derive_more::{Debug, Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{layout, user},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for uploading a [`layout::Image`].
///
/// Identical content is stored once and always resolves to the same
/// [`layout::ImageUrl`].
#[derive(Clone, Debug)]
pub struct UploadLayoutImage {
    /// Operator uploading the image.
    pub uploader: user::Identity,

    /// Encoded image content.
    #[debug(skip)]
    pub bytes: Vec<u8>,
}

impl<Db> Command<UploadLayoutImage> for Service<Db>
where
    Db: Database<Insert<layout::Image>, Err = Traced<database::Error>>,
{
    type Ok = layout::ImageUrl;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UploadLayoutImage,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UploadLayoutImage { uploader, bytes } = cmd;

        if !uploader.is_operator() {
            return Err(tracerr::new!(E::NotOperator(uploader.id)));
        }

        let max = self.config().max_image_size;
        if bytes.len() > max {
            return Err(tracerr::new!(E::TooLarge {
                size: bytes.len(),
                max,
            }));
        }

        let format = image::guess_format(&bytes)
            .ok()
            .filter(|f| f.reading_enabled())
            .ok_or(E::UnsupportedFormat)
            .map_err(tracerr::wrap!())?;
        let extension =
            format.extensions_str().first().copied().unwrap_or("img");

        let image = layout::Image {
            url: layout::ImageUrl::for_content(&bytes, extension),
            bytes,
            created_at: DateTime::now().coerce(),
        };
        let url = image.url.clone();

        self.database()
            .execute(Insert(image))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "layout image `{url}` uploaded by `User(id: {})`",
            uploader.id,
        );

        Ok(url)
    }
}

/// Error of [`UploadLayoutImage`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Uploader is not an operator.
    #[display("`User(id: {_0})` is not an operator")]
    NotOperator(#[error(not(source))] user::Id),

    /// Image exceeds the configured size limit.
    #[display("image of {size} bytes exceeds the limit of {max} bytes")]
    TooLarge {
        /// Size of the image in bytes.
        size: usize,

        /// Maximum allowed size in bytes.
        max: usize,
    },

    /// Content is not an image in a supported format.
    #[display("image format is not supported")]
    UnsupportedFormat,
}

#[cfg(test)]
mod spec {
    use super::{ExecutionError, UploadLayoutImage};
    use crate::{
        fixture::{self, GIF_1X1},
        Command as _, Config, Service,
    };

    #[tokio::test]
    async fn stores_identical_content_once() {
        let svc = fixture::service();
        let uploader = fixture::operator();

        let first = svc
            .execute(UploadLayoutImage {
                uploader,
                bytes: GIF_1X1.to_vec(),
            })
            .await
            .unwrap();
        let second = svc
            .execute(UploadLayoutImage {
                uploader,
                bytes: GIF_1X1.to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(first.to_string().ends_with(".gif"));
    }

    #[tokio::test]
    async fn rejects_unknown_content() {
        let err = fixture::service()
            .execute(UploadLayoutImage {
                uploader: fixture::operator(),
                bytes: b"%PDF-1.7".to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::UnsupportedFormat));
    }

    #[tokio::test]
    async fn rejects_oversized_content() {
        let svc = Service::new(
            Config { max_image_size: 8 },
            crate::infra::Memory::new(),
        );

        let err = svc
            .execute(UploadLayoutImage {
                uploader: fixture::operator(),
                bytes: GIF_1X1.to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::TooLarge { .. }));
    }

    #[tokio::test]
    async fn rejects_buyers() {
        let err = fixture::service()
            .execute(UploadLayoutImage {
                uploader: fixture::buyer(),
                bytes: GIF_1X1.to_vec(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NotOperator(_)));
    }
}
