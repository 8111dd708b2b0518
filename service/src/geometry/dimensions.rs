//! [`Dimensions`] of layout images.

use std::io;

use derive_more::{Display, Error, From};
use image::ImageReader;

/// Natural pixel size of a layout image.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{width}x{height}")]
pub struct Dimensions {
    /// Width in pixels, never zero.
    width: u32,

    /// Height in pixels, never zero.
    height: u32,
}

impl Dimensions {
    /// [`Dimensions`] used whenever the real ones cannot be determined.
    pub const FALLBACK: Self = Self {
        width: 1000,
        height: 1000,
    };

    /// Creates new [`Dimensions`] if both sides are non-zero.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Reads [`Dimensions`] from the header of the encoded image `bytes`.
    ///
    /// The image is not decoded entirely.
    ///
    /// # Errors
    ///
    /// If the format cannot be recognized, the header is malformed or the
    /// image is zero-sized.
    pub fn measure(bytes: &[u8]) -> Result<Self, MeasureError> {
        let (width, height) = ImageReader::new(io::Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        Self::new(width, height).ok_or(MeasureError::ZeroSized)
    }

    /// Returns the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Error of [`Dimensions::measure()`].
#[derive(Debug, Display, Error, From)]
pub enum MeasureError {
    /// Reading the image header failed.
    #[display("cannot read image: {_0}")]
    Io(io::Error),

    /// Image format is unsupported or its header is malformed.
    #[display("cannot decode image header: {_0}")]
    Decode(image::ImageError),

    /// Image has no pixels.
    #[display("image is zero-sized")]
    #[from(ignore)]
    ZeroSized,
}

#[cfg(test)]
mod spec {
    use super::{Dimensions, MeasureError};

    /// Minimal 1x1 GIF.
    const GIF_1X1: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80,
        0x00, 0x00, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x21, 0xf9, 0x04,
        0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00, 0x00, 0x00, 0x01,
        0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
    ];

    #[test]
    fn rejects_zero_sides() {
        assert!(Dimensions::new(0, 10).is_none());
        assert!(Dimensions::new(10, 0).is_none());
        assert_eq!(Dimensions::new(3, 4).unwrap().to_string(), "3x4");
    }

    #[test]
    fn measures_image_header() {
        assert_eq!(
            Dimensions::measure(GIF_1X1).unwrap(),
            Dimensions::new(1, 1).unwrap(),
        );
    }

    #[test]
    fn fails_on_unknown_format() {
        assert!(matches!(
            Dimensions::measure(b"definitely not an image"),
            Err(MeasureError::Decode(_)),
        ));
    }
}
