//! [`Polygon`] definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

use derive_more::{Display, Error, From};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};

use super::{parse, serialize, ParseError, Point, Vertex};

/// Closed polygon of at least 3 [`Vertex`]es in intrinsic image space.
///
/// The last vertex is implicitly connected to the first one.
/// Self-intersecting shapes are accepted as is.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Polygon(Vec<Vertex>);

impl Polygon {
    /// Minimal number of [`Vertex`]es forming a [`Polygon`].
    pub const MIN_VERTICES: usize = 3;

    /// Creates a new [`Polygon`] if there are enough `vertices`.
    #[must_use]
    pub fn new(vertices: Vec<Vertex>) -> Option<Self> {
        (vertices.len() >= Self::MIN_VERTICES).then_some(Self(vertices))
    }

    /// Returns [`Vertex`]es of this [`Polygon`] in drawing order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.0
    }

    /// Checks whether the provided `point` lies inside this [`Polygon`].
    ///
    /// Uses the even-odd rule: a horizontal ray cast from the `point` must
    /// cross the boundary an odd number of times.
    #[must_use]
    pub fn contains(&self, point: impl Into<Point>) -> bool {
        let Point { x, y } = point.into();
        let mut inside = false;
        let mut j = self.0.len() - 1;
        for (i, vi) in self.0.iter().enumerate() {
            let (xi, yi) = (f64::from(vi.x), f64::from(vi.y));
            let (xj, yj) = (f64::from(self.0[j].x), f64::from(self.0[j].y));
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(&self.0))
    }
}

impl FromStr for Polygon {
    type Err = PolygonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vertices = parse(s)?;
        let count = vertices.len();
        Self::new(vertices).ok_or(PolygonError::TooFewVertices(count))
    }
}

/// Error of parsing a [`Polygon`].
#[derive(Clone, Debug, Display, Eq, Error, From, PartialEq)]
pub enum PolygonError {
    /// Text is not a valid vertex list.
    #[display("invalid vertex list: {_0}")]
    Parse(ParseError),

    /// Vertex list is too short to form a [`Polygon`].
    #[display("{_0} vertices cannot form a polygon")]
    #[from(ignore)]
    TooFewVertices(#[error(not(source))] usize),
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Polygon {
    accepts!(TEXT, VARCHAR);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        <&str>::from_sql(ty, raw)?.parse().map_err(Box::from)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Polygon {
    accepts!(TEXT, VARCHAR);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.to_string().to_sql(ty, w)
    }
}
