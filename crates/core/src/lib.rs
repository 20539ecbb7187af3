//! Core units, constants, and shared primitives for the aerial survey planner workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Mean earth radius used for angle/length conversions on the grid (m).
    pub const EARTH_RADIUS_M: f64 = 6_371_008.8;
    /// Sphere radius for flight path lengths before the flight height is added (m).
    pub const PATH_EARTH_RADIUS_M: f64 = 6_371_000.0;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
    /// Number of decimals kept for displayed and exported scalars.
    pub const DISPLAY_DECIMALS: i32 = 5;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::EARTH_RADIUS_M;

    /// Convert degrees to radians.
    #[inline]
    pub fn degrees_to_radians(deg: f64) -> f64 {
        deg.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn radians_to_degrees(rad: f64) -> f64 {
        rad.to_degrees()
    }

    /// Great-circle length (m) of an arc of `rad` radians on the mean earth sphere.
    #[inline]
    pub fn radians_to_length(rad: f64) -> f64 {
        rad * EARTH_RADIUS_M
    }

    /// Arc angle (rad) covered by `meters` on the mean earth sphere.
    #[inline]
    pub fn length_to_radians(meters: f64) -> f64 {
        meters / EARTH_RADIUS_M
    }

    /// Arc angle (deg) covered by `meters` on the mean earth sphere.
    #[inline]
    pub fn length_to_degrees(meters: f64) -> f64 {
        radians_to_degrees(length_to_radians(meters))
    }

    /// Convert micrometres to metres.
    #[inline]
    pub fn um_to_m(v: f64) -> f64 {
        v * 1e-6
    }

    /// Convert millimetres to metres.
    #[inline]
    pub fn mm_to_m(v: f64) -> f64 {
        v * 1e-3
    }

    /// Convert kilometres per hour to metres per second.
    #[inline]
    pub fn kmh_to_ms(v: f64) -> f64 {
        v / 3.6
    }
}

/// Decimal rounding used before values reach a display or an export.
pub mod rounding {
    use super::constants::DISPLAY_DECIMALS;

    /// Round `value` to `decimals` places after the point.
    #[inline]
    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let factor = 10f64.powi(decimals);
        (value * factor).round() / factor
    }

    /// Round to the display precision (5 decimals).
    #[inline]
    pub fn round5(value: f64) -> f64 {
        round_to(value, DISPLAY_DECIMALS)
    }
}

/// Text formatting of numbers for labels.
pub mod format {
    /// Digits of `value` grouped by thousands with spaces, e.g. `1 000 000`.
    pub fn group_thousands(value: u64) -> String {
        let digits = value.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }
        grouped
    }
}

/// Geodetic point type shared by every crate.
pub mod latlng {
    use std::fmt;

    use geo_types::{Coord, Point};
    use serde::{Deserialize, Serialize};

    /// Latitude/longitude pair in degrees.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct LatLng {
        pub lat: f64,
        pub lng: f64,
    }

    impl LatLng {
        pub const fn new(lat: f64, lng: f64) -> Self {
            Self { lat, lng }
        }
    }

    impl fmt::Display for LatLng {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "({:.5}, {:.5})", self.lat, self.lng)
        }
    }

    // geo types are x = longitude, y = latitude
    impl From<LatLng> for Coord<f64> {
        fn from(p: LatLng) -> Self {
            Coord { x: p.lng, y: p.lat }
        }
    }

    impl From<Coord<f64>> for LatLng {
        fn from(c: Coord<f64>) -> Self {
            LatLng::new(c.y, c.x)
        }
    }

    impl From<LatLng> for Point<f64> {
        fn from(p: LatLng) -> Self {
            Point::new(p.lng, p.lat)
        }
    }
}

pub use latlng::LatLng;
