//! Geometry of plot layouts.
//!
//! Every coordinate persisted by the service lives in the intrinsic pixel
//! space of the layout image. Pointer positions arrive in display space and
//! are mapped through a [`DisplayTransform`] before becoming [`Vertex`]es.

mod dimensions;
mod polygon;
mod transform;

use std::str::FromStr;

use derive_more::{Display, Error};

pub use self::{
    dimensions::{Dimensions, MeasureError},
    polygon::{Polygon, PolygonError},
    transform::{DisplayTransform, Point, Viewport},
};

/// Integer pixel position in the intrinsic space of a layout image.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{x},{y}")]
pub struct Vertex {
    /// Horizontal offset from the left edge of the image.
    pub x: i32,

    /// Vertical offset from the top edge of the image.
    pub y: i32,
}

impl Vertex {
    /// Creates a new [`Vertex`].
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Vertex {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl FromStr for Vertex {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once(',').ok_or("missing `,` separator")?;
        let x = x.parse().map_err(|_| "invalid `x` coordinate")?;
        let y = y.parse().map_err(|_| "invalid `y` coordinate")?;
        Ok(Self { x, y })
    }
}

/// Serializes the provided [`Vertex`]es as `"x1,y1 x2,y2 …"`.
///
/// Order is preserved and no minimum length is enforced here, so a draft
/// with fewer than 3 vertices still serializes.
#[must_use]
pub fn serialize(vertices: &[Vertex]) -> String {
    let mut out = String::with_capacity(vertices.len() * 8);
    for (i, v) in vertices.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&v.to_string());
    }
    out
}

/// Parses [`Vertex`]es from the `"x1,y1 x2,y2 …"` format.
///
/// # Errors
///
/// If the input holds no pairs at all, or any pair is not two integers
/// joined by a comma.
pub fn parse(input: &str) -> Result<Vec<Vertex>, ParseError> {
    let vertices = input
        .split_whitespace()
        .enumerate()
        .map(|(index, pair)| {
            pair.parse().map_err(|reason| ParseError::MalformedPair {
                index,
                pair: pair.to_owned(),
                reason,
            })
        })
        .collect::<Result<Vec<Vertex>, _>>()?;
    if vertices.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(vertices)
}

/// Error of [`parse`]ing [`Vertex`]es.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Input contains no coordinate pairs.
    #[display("no coordinate pairs")]
    Empty,

    /// Coordinate pair cannot be parsed.
    #[display("malformed pair #{index} `{pair}`: {reason}")]
    MalformedPair {
        /// Position of the pair in the input.
        index: usize,

        /// Raw text of the pair.
        pair: String,

        /// Why the pair was rejected.
        reason: &'static str,
    },
}

#[cfg(test)]
mod spec {
    use proptest::prelude::*;

    use super::{parse, serialize, ParseError, Vertex};

    fn square() -> Vec<Vertex> {
        vec![
            Vertex::new(10, 10),
            Vertex::new(100, 10),
            Vertex::new(100, 100),
            Vertex::new(10, 100),
        ]
    }

    #[test]
    fn serializes_in_order() {
        assert_eq!(serialize(&square()), "10,10 100,10 100,100 10,100");
        assert_eq!(serialize(&[]), "");
        assert_eq!(serialize(&[Vertex::new(-3, 7)]), "-3,7");
    }

    #[test]
    fn parses_serialized_square() {
        assert_eq!(parse("10,10 100,10 100,100 10,100").unwrap(), square());
    }

    #[test]
    fn tolerates_extra_whitespace() {
        assert_eq!(
            parse("  10,10\n100,10   100,100 10,100 ").unwrap(),
            square(),
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   "), Err(ParseError::Empty));
    }

    #[test]
    fn rejects_malformed_pairs() {
        for input in ["10,10 100", "10;10", "10,10,10", "1.5,2", "a,b", ",3"] {
            assert!(
                matches!(parse(input), Err(ParseError::MalformedPair { .. })),
                "accepted `{input}`",
            );
        }
    }

    proptest! {
        #[test]
        fn parse_inverts_serialize(
            vertices in prop::collection::vec(
                (any::<i32>(), any::<i32>()).prop_map(Vertex::from),
                1..64,
            ),
        ) {
            prop_assert_eq!(parse(&serialize(&vertices)).unwrap(), vertices);
        }
    }
}
