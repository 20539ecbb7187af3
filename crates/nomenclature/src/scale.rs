//! Standard map scales and their natural sheet sizes.

use std::fmt;
use std::str::FromStr;

use aerosurvey_core::format::group_thousands;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Map scale governing sheet size and nomenclature depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StandardScale {
    /// Free grid spacing, cells are not named.
    Custom,
    Scale1M,
    Scale500K,
    Scale300K,
    Scale200K,
    Scale100K,
    Scale50K,
    Scale25K,
    Scale10K,
    Scale5K,
    Scale2K,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown map scale '{0}' (expected 'Custom' or e.g. '1:100 000')")]
pub struct ScaleParseError(pub String);

impl StandardScale {
    /// Every scale, from the custom grid down to the most detailed sheet.
    pub const ALL: [StandardScale; 11] = [
        StandardScale::Custom,
        StandardScale::Scale1M,
        StandardScale::Scale500K,
        StandardScale::Scale300K,
        StandardScale::Scale200K,
        StandardScale::Scale100K,
        StandardScale::Scale50K,
        StandardScale::Scale25K,
        StandardScale::Scale10K,
        StandardScale::Scale5K,
        StandardScale::Scale2K,
    ];

    /// Scale denominator, `None` for custom grids.
    pub fn denominator(self) -> Option<u32> {
        match self {
            StandardScale::Custom => None,
            StandardScale::Scale1M => Some(1_000_000),
            StandardScale::Scale500K => Some(500_000),
            StandardScale::Scale300K => Some(300_000),
            StandardScale::Scale200K => Some(200_000),
            StandardScale::Scale100K => Some(100_000),
            StandardScale::Scale50K => Some(50_000),
            StandardScale::Scale25K => Some(25_000),
            StandardScale::Scale10K => Some(10_000),
            StandardScale::Scale5K => Some(5_000),
            StandardScale::Scale2K => Some(2_000),
        }
    }

    pub fn from_denominator(denominator: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scale| scale.denominator() == Some(denominator))
    }

    pub fn is_standard(self) -> bool {
        self != StandardScale::Custom
    }

    /// Size of one sheet of this scale as `(lat_degrees, lng_degrees)`.
    pub fn sheet_size(self) -> Option<(f64, f64)> {
        let size = match self {
            StandardScale::Custom => return None,
            StandardScale::Scale1M => (4.0, 6.0),
            StandardScale::Scale500K => (2.0, 3.0),
            StandardScale::Scale300K => (4.0 / 3.0, 2.0),
            StandardScale::Scale200K => (2.0 / 3.0, 1.0),
            StandardScale::Scale100K => (1.0 / 3.0, 0.5),
            StandardScale::Scale50K => (1.0 / 6.0, 0.25),
            StandardScale::Scale25K => (1.0 / 12.0, 0.125),
            StandardScale::Scale10K => (1.0 / 24.0, 0.0625),
            StandardScale::Scale5K => ((1.0 + 15.0 / 60.0) / 60.0, (1.0 + 52.5 / 60.0) / 60.0),
            StandardScale::Scale2K => (25.0 / 3600.0, 37.5 / 3600.0),
        };
        Some(size)
    }
}

impl fmt::Display for StandardScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.denominator() {
            None => f.write_str("Custom"),
            Some(denominator) => write!(f, "1:{}", group_thousands(u64::from(denominator))),
        }
    }
}

impl FromStr for StandardScale {
    type Err = ScaleParseError;

    /// Accepts `Custom`, `1:100 000`, `1:100000` and a bare `100000`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("custom") {
            return Ok(StandardScale::Custom);
        }
        let digits: String = trimmed
            .strip_prefix("1:")
            .unwrap_or(trimmed)
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '_' && *ch != ',')
            .collect();
        digits
            .parse::<u32>()
            .ok()
            .and_then(StandardScale::from_denominator)
            .ok_or_else(|| ScaleParseError(s.to_string()))
    }
}

impl TryFrom<String> for StandardScale {
    type Error = ScaleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StandardScale> for String {
    fn from(value: StandardScale) -> Self {
        value.to_string()
    }
}
