//! [`Layout`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Debug, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use url::Url;
use uuid::Uuid;
use xxhash_rust::xxh3;

use crate::{domain::user, geometry::Dimensions};

/// Scaled image of a subdivided land, published by an operator.
#[derive(Clone, Debug)]
pub struct Layout {
    /// ID of this [`Layout`].
    pub id: Id,

    /// ID of the operator owning this [`Layout`].
    pub owner_id: user::Id,

    /// [`Title`] of this [`Layout`].
    pub title: Title,

    /// [`Location`] of this [`Layout`], if any.
    pub location: Option<Location>,

    /// [`Description`] of this [`Layout`], if any.
    pub description: Option<Description>,

    /// [`ImageUrl`] of this [`Layout`] image.
    pub image_url: ImageUrl,

    /// Intrinsic [`Dimensions`] of this [`Layout`] image.
    ///
    /// Derived from the image once it is attached and never edited directly.
    pub dimensions: Dimensions,

    /// [`DateTime`] when this [`Layout`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Layout`].
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, FromStr, Hash, Into, PartialEq,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Title of a [`Layout`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= 256
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Location of a [`Layout`], like a village or a street address.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Location(String);

impl Location {
    /// Creates a new [`Location`] if the given `location` is valid.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Option<Self> {
        let location = location.into();
        Self::check(&location).then_some(Self(location))
    }

    /// Checks whether the given `location` is a valid [`Location`].
    fn check(location: impl AsRef<str>) -> bool {
        let location = location.as_ref();
        location.trim() == location
            && !location.is_empty()
            && location.len() <= 512
    }
}

impl FromStr for Location {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Location`")
    }
}

/// Free-form description of a [`Layout`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        (!text.trim().is_empty() && text.len() <= 4096).then_some(Self(text))
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Reference to a stored [`Image`], either a path relative to the public
/// image host or an absolute URL.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Prefix of [`ImageUrl`]s pointing to uploaded [`Image`]s.
    pub const UPLOADS: &'static str = "/uploads/";

    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Builds the [`ImageUrl`] addressing the provided image content.
    ///
    /// Identical content always yields the same [`ImageUrl`].
    #[must_use]
    pub fn for_content(bytes: &[u8], extension: &str) -> Self {
        Self(format!(
            "{}{:032x}.{extension}",
            Self::UPLOADS,
            xxh3::xxh3_128(bytes),
        ))
    }

    /// Resolves this [`ImageUrl`] against the public `base` of the image
    /// host.
    ///
    /// Absolute [`ImageUrl`]s are returned as they are.
    ///
    /// # Errors
    ///
    /// If the joined URL is malformed.
    pub fn resolve(&self, base: &Url) -> Result<Url, url::ParseError> {
        base.join(&self.0)
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        !url.is_empty()
            && url.len() <= 2048
            && !url.chars().any(char::is_whitespace)
            && (url.starts_with('/') || Url::parse(url).is_ok())
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

/// Uploaded [`Layout`] image content.
#[derive(Clone, Debug)]
pub struct Image {
    /// [`ImageUrl`] addressing this [`Image`].
    pub url: ImageUrl,

    /// Encoded image content.
    #[debug(skip)]
    pub bytes: Vec<u8>,

    /// [`DateTime`] when this [`Image`] was uploaded.
    pub created_at: ImageCreationDateTime,
}

/// [`DateTime`] when a [`Layout`] was created.
pub type CreationDateTime = DateTimeOf<(Layout, unit::Creation)>;

/// [`DateTime`] when an [`Image`] was uploaded.
pub type ImageCreationDateTime = DateTimeOf<(Image, unit::Creation)>;

#[cfg(test)]
mod spec {
    use url::Url;

    use super::{ImageUrl, Title};

    #[test]
    fn title_is_trimmed_and_non_empty() {
        assert!(Title::new("Green Meadows Phase II").is_some());
        assert!(Title::new("").is_none());
        assert!(Title::new(" padded ").is_none());
        assert!(Title::new("x".repeat(257)).is_none());
    }

    #[test]
    fn image_url_accepts_paths_and_absolute_urls() {
        assert!(ImageUrl::new("/uploads/a.png").is_some());
        assert!(ImageUrl::new("https://cdn.example.com/a.png").is_some());
        assert!(ImageUrl::new("a.png").is_none());
        assert!(ImageUrl::new("/with space.png").is_none());
        assert!(ImageUrl::new("").is_none());
    }

    #[test]
    fn content_addressed_urls_are_stable() {
        let a = ImageUrl::for_content(b"layout", "png");
        let b = ImageUrl::for_content(b"layout", "png");
        let c = ImageUrl::for_content(b"another", "png");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.to_string().starts_with(ImageUrl::UPLOADS));
        assert!(a.to_string().ends_with(".png"));
        assert!(ImageUrl::new(a.to_string()).is_some());
    }

    #[test]
    fn resolves_against_base() {
        let base = Url::parse("https://img.example.com/media/").unwrap();

        assert_eq!(
            ImageUrl::new("/uploads/a.png")
                .unwrap()
                .resolve(&base)
                .unwrap()
                .as_str(),
            "https://img.example.com/uploads/a.png",
        );
        assert_eq!(
            ImageUrl::new("https://cdn.example.com/b.png")
                .unwrap()
                .resolve(&base)
                .unwrap()
                .as_str(),
            "https://cdn.example.com/b.png",
        );
    }
}
