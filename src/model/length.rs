//! Length units used by the word-processing format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

const EMU_PER_CM: f64 = 360_000.0;
const EMU_PER_PT: f64 = 12_700.0;
const EMU_PER_TWIP: f64 = 635.0;

/// A length stored in English Metric Units (914400 per inch).
///
/// Twentieths of a point ("twips", the `dxa` unit) are what paragraph
/// indents, table grids and row heights are written in; font sizes are
/// written in half-points.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Length(i64);

impl Length {
    /// Zero length.
    pub const ZERO: Length = Length(0);

    /// Create from raw EMU.
    pub const fn from_emu(emu: i64) -> Self {
        Self(emu)
    }

    /// Create from centimeters, rounded to the nearest EMU.
    pub fn from_cm(cm: f64) -> Self {
        Self((cm * EMU_PER_CM).round() as i64)
    }

    /// Create from points.
    pub fn from_pt(pt: f64) -> Self {
        Self((pt * EMU_PER_PT).round() as i64)
    }

    /// Create from twentieths of a point.
    pub const fn from_twips(twips: i64) -> Self {
        Self(twips * 635)
    }

    /// Raw EMU value.
    pub const fn emu(self) -> i64 {
        self.0
    }

    /// Value in centimeters.
    pub fn cm(self) -> f64 {
        self.0 as f64 / EMU_PER_CM
    }

    /// Value in points.
    pub fn pt(self) -> f64 {
        self.0 as f64 / EMU_PER_PT
    }

    /// Value in twentieths of a point, rounded.
    pub fn twips(self) -> i64 {
        (self.0 as f64 / EMU_PER_TWIP).round() as i64
    }

    /// Absolute value.
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Check whether two lengths differ by less than `tolerance_cm`.
    pub fn approx_eq(self, other: Length, tolerance_cm: f64) -> bool {
        (self.cm() - other.cm()).abs() < tolerance_cm
    }
}

impl Neg for Length {
    type Output = Length;

    fn neg(self) -> Self::Output {
        Length(-self.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}cm", self.cm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        assert_eq!(Length::from_cm(1.0).emu(), 360_000);
        assert_eq!(Length::from_pt(9.0).emu(), 114_300);
        assert_eq!(Length::from_twips(20).pt(), 1.0);
    }

    #[test]
    fn test_house_geometry_in_twips() {
        assert_eq!(Length::from_cm(0.37).twips(), 210);
        assert_eq!(Length::from_cm(0.63).twips(), 357);
        assert_eq!(Length::from_cm(11.99).twips(), 6797);
        assert_eq!(Length::from_cm(1.20).twips(), 680);
        assert_eq!(Length::from_cm(2.30).twips(), 1304);
    }

    #[test]
    fn test_twips_round_trip_within_tolerance() {
        let width = Length::from_cm(2.30);
        let stored = Length::from_twips(width.twips());
        assert!(stored.approx_eq(width, 0.1));
        assert!(Length::from_twips(210) >= Length::from_cm(0.37));
    }

    #[test]
    fn test_negative_lengths() {
        let hanging = -Length::from_cm(0.63);
        assert!(hanging.cm() < 0.0);
        assert_eq!(hanging.abs(), Length::from_cm(0.63));
        assert_eq!(hanging.to_string(), "-0.63cm");
    }
}
