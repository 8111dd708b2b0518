//! Colours of rendered plots.

use derive_more::Display;
use smart_default::SmartDefault;

use crate::domain::plot;

/// CSS colour in `#rrggbb` notation.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct Color(&'static str);

impl Color {
    /// Creates a new [`Color`] out of the provided `#rrggbb` hex notation.
    ///
    /// # Panics
    ///
    /// In `const` context, if the notation is malformed.
    #[must_use]
    pub const fn hex(s: &'static str) -> Self {
        let b = s.as_bytes();
        assert!(b.len() == 7 && b[0] == b'#', "malformed `Color`");
        let mut i = 1;
        while i < b.len() {
            assert!(b[i].is_ascii_hexdigit(), "malformed `Color`");
            i += 1;
        }
        Self(s)
    }
}

/// Fill and stroke [`Color`]s of a single plot shape.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Swatch {
    /// [`Color`] the shape is filled with, at [`Swatch::FILL_OPACITY`].
    pub fill: Color,

    /// [`Color`] of the shape outline.
    pub stroke: Color,
}

impl Swatch {
    /// Opacity of the shape fill, so the layout image stays visible.
    pub const FILL_OPACITY: f64 = 0.3;

    /// Opacity of the shape fill under the pointer.
    pub const HOVER_FILL_OPACITY: f64 = 0.5;
}

/// [`Swatch`]es of plot shapes per [`plot::Status`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct Palette {
    /// [`Swatch`] of [`plot::Status::Available`] plots.
    #[default(Swatch {
        fill: Color::hex("#22c55e"),
        stroke: Color::hex("#16a34a"),
    })]
    pub available: Swatch,

    /// [`Swatch`] of [`plot::Status::Booked`] plots.
    #[default(Swatch {
        fill: Color::hex("#eab308"),
        stroke: Color::hex("#ca8a04"),
    })]
    pub booked: Swatch,

    /// [`Swatch`] of [`plot::Status::Sold`] plots.
    #[default(Swatch {
        fill: Color::hex("#ef4444"),
        stroke: Color::hex("#dc2626"),
    })]
    pub sold: Swatch,
}

impl Palette {
    /// Returns the [`Swatch`] for the provided [`plot::Status`].
    #[must_use]
    pub const fn swatch(&self, status: plot::Status) -> Swatch {
        match status {
            plot::Status::Available => self.available,
            plot::Status::Booked => self.booked,
            plot::Status::Sold => self.sold,
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Palette;
    use crate::domain::plot;

    #[test]
    fn statuses_are_distinguishable() {
        let palette = Palette::default();

        let fills = plot::Status::ALL
            .iter()
            .map(|s| palette.swatch(*s).fill)
            .collect::<Vec<_>>();

        assert_eq!(fills.len(), 3);
        assert_ne!(fills[0], fills[1]);
        assert_ne!(fills[1], fills[2]);
        assert_ne!(fills[0], fills[2]);
        assert_eq!(fills[0].to_string(), "#22c55e");
    }
}
