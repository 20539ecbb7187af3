//! Topographic sheet nomenclature for the standard map scales.
//!
//! A sheet name starts with the 1:1 000 000 sheet (`N-37`) and grows one
//! label per subdivision step of the requested scale (`N-37-4-C-c`).

pub mod roman;
pub mod scale;
pub mod sheet;

pub use scale::{ScaleParseError, StandardScale};
pub use sheet::{
    NOT_IN_STANDARD_SCALE, OUT_OF_NOMENCLATURE_RANGE, closest_greater, closest_less, name_for,
    sheet_number,
};

use aerosurvey_core::LatLng;

/// Sheet name of the sheet containing `point` at `scale`.
pub fn name_for_point(point: LatLng, scale: StandardScale) -> String {
    name_for(point.lat, point.lng, scale)
}
