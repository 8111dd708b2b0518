//! [`Plot`] read models.

use crate::domain::{plot, Plot};

/// Number of [`Plot`]s of a layout in each [`plot::Status`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of [`plot::Status::Available`] plots.
    pub available: usize,

    /// Number of [`plot::Status::Booked`] plots.
    pub booked: usize,

    /// Number of [`plot::Status::Sold`] plots.
    pub sold: usize,
}

impl Stats {
    /// Counts the provided [`Plot`]s by their [`plot::Status`].
    #[must_use]
    pub fn of<'a>(plots: impl IntoIterator<Item = &'a Plot>) -> Self {
        plots.into_iter().fold(Self::default(), |mut stats, p| {
            match p.status {
                plot::Status::Available => stats.available += 1,
                plot::Status::Booked => stats.booked += 1,
                plot::Status::Sold => stats.sold += 1,
            }
            stats
        })
    }

    /// Returns the total number of counted [`Plot`]s.
    #[must_use]
    pub fn total(&self) -> usize {
        self.available + self.booked + self.sold
    }
}
