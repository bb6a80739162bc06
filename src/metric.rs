use std::fmt;
use std::str::FromStr;

use crate::error::KdIndexError;
use crate::r#type::Coord;

/// The distance metrics supported by tree queries.
///
/// The metric is chosen once per query and carried through the traversal by
/// value; it is never re-resolved per point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Sum of absolute coordinate differences (L1).
    Manhattan,
    /// Sum of squared coordinate differences, with no square root. Callers
    /// comparing against true Euclidean thresholds must pre-square them.
    SquaredEuclidean,
}

impl Metric {
    /// Distance between two points of equal dimensionality.
    #[inline]
    pub fn distance<N: Coord>(self, a: &[N], b: &[N]) -> N {
        debug_assert_eq!(a.len(), b.len());
        match self {
            Metric::Manhattan => a
                .iter()
                .zip(b)
                .fold(N::zero(), |acc, (&x, &y)| acc + (x - y).abs()),
            Metric::SquaredEuclidean => a.iter().zip(b).fold(N::zero(), |acc, (&x, &y)| {
                let d = x - y;
                acc + d * d
            }),
        }
    }

    /// The metric's contribution of a single-axis offset, used to compare a
    /// split plane against an accumulated distance during pruning.
    #[inline]
    pub(crate) fn plane_distance<N: Coord>(self, delta: N) -> N {
        match self {
            Metric::Manhattan => delta.abs(),
            Metric::SquaredEuclidean => delta * delta,
        }
    }

    /// The label this metric parses from.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Manhattan => "manhattan",
            Metric::SquaredEuclidean => "squared_euclidean",
        }
    }
}

impl FromStr for Metric {
    type Err = KdIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manhattan" => Ok(Metric::Manhattan),
            "squared_euclidean" => Ok(Metric::SquaredEuclidean),
            other => Err(KdIndexError::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
