use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a measured value is compared against a band's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    AtLeast,
    Above,
    AtMost,
    Below,
}

impl Comparison {
    pub fn holds(self, value: Decimal, bound: Decimal) -> bool {
        match self {
            Comparison::AtLeast => value >= bound,
            Comparison::Above => value > bound,
            Comparison::AtMost => value <= bound,
            Comparison::Below => value < bound,
        }
    }
}

/// One row of a threshold table: award `points` when the comparison holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub comparison: Comparison,
    pub bound: Decimal,
    pub points: i16,
}

impl Band {
    pub fn at_least(bound: Decimal, points: i16) -> Self {
        Self {
            comparison: Comparison::AtLeast,
            bound,
            points,
        }
    }

    pub fn above(bound: Decimal, points: i16) -> Self {
        Self {
            comparison: Comparison::Above,
            bound,
            points,
        }
    }

    pub fn at_most(bound: Decimal, points: i16) -> Self {
        Self {
            comparison: Comparison::AtMost,
            bound,
            points,
        }
    }

    pub fn below(bound: Decimal, points: i16) -> Self {
        Self {
            comparison: Comparison::Below,
            bound,
            points,
        }
    }
}

/// Ordered ratio-to-points table, evaluated top-down with the first matching band winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandTable {
    pub bands: Vec<Band>,
    /// Score used when no band matches.
    #[serde(default)]
    pub fallback: i16,
}

impl BandTable {
    pub fn new(bands: Vec<Band>, fallback: i16) -> Self {
        Self { bands, fallback }
    }

    pub fn points_for(&self, value: Decimal) -> i16 {
        self.bands
            .iter()
            .find(|band| band.comparison.holds(value, band.bound))
            .map(|band| band.points)
            .unwrap_or(self.fallback)
    }

    pub fn max_points(&self) -> i16 {
        self.bands
            .iter()
            .map(|band| band.points)
            .fold(self.fallback, i16::max)
    }

    pub fn min_points(&self) -> i16 {
        self.bands
            .iter()
            .map(|band| band.points)
            .fold(self.fallback, i16::min)
    }
}
