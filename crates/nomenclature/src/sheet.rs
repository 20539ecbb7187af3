//! Sheet naming by recursive subdivision of the 1:1 000 000 sheet.
//!
//! Every standard scale below 1:1 000 000 is described by a fixed list of
//! subdivision steps. A step splits an enclosing sheet of a given size into
//! `parts × parts` sub-sheets, numbers them left to right and top to bottom,
//! and renders the number of the sub-sheet containing the point.

use aerosurvey_core::rounding::round5;

use crate::roman::to_roman;
use crate::scale::StandardScale;

/// Name used for cells of a custom grid.
pub const NOT_IN_STANDARD_SCALE: &str = "Not in standard scale system";
/// Name used when the latitude row runs past the end of the alphabet.
pub const OUT_OF_NOMENCLATURE_RANGE: &str = "Out of nomenclature range";
/// Marker appended to sheets of the southern hemisphere.
pub const SOUTHERN_SUFFIX: &str = " (S)";

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE_SHEET_LAT: f64 = 4.0;
const BASE_SHEET_LNG: f64 = 6.0;
const BASE_COLUMN_OFFSET: i64 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Arabic,
    Roman,
    Upper,
    Lower,
    /// Lowercase letter after shifting the index by `+3` below 6 and `-6` otherwise.
    RotatedLower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    /// `name-label`
    Suffix,
    /// `label-name`
    Prefix,
    /// `name(label`, closed after the last step.
    OpenGroup,
}

#[derive(Debug, Clone, Copy)]
struct Step {
    parts: u32,
    sheet_lat: f64,
    sheet_lng: f64,
    numbering: Numbering,
    join: Join,
}

const fn step(
    parts: u32,
    sheet_lat: f64,
    sheet_lng: f64,
    numbering: Numbering,
    join: Join,
) -> Step {
    Step {
        parts,
        sheet_lat,
        sheet_lng,
        numbering,
        join,
    }
}

const S500K: Step = step(2, BASE_SHEET_LAT, BASE_SHEET_LNG, Numbering::Arabic, Join::Suffix);
const S300K: Step = step(3, BASE_SHEET_LAT, BASE_SHEET_LNG, Numbering::Roman, Join::Prefix);
const S200K: Step = step(6, BASE_SHEET_LAT, BASE_SHEET_LNG, Numbering::Roman, Join::Suffix);
const S100K: Step = step(12, BASE_SHEET_LAT, BASE_SHEET_LNG, Numbering::Arabic, Join::Suffix);
const S50K: Step = step(2, 2.0 / 6.0, 3.0 / 6.0, Numbering::Upper, Join::Suffix);
const S25K: Step = step(2, 1.0 / 6.0, 15.0 / 60.0, Numbering::Lower, Join::Suffix);
const S10K: Step = step(2, 5.0 / 60.0, 7.5 / 60.0, Numbering::Arabic, Join::Suffix);
const S5K: Step = step(16, 2.0 / 6.0, 3.0 / 6.0, Numbering::Arabic, Join::OpenGroup);
const S2K: Step = step(
    3,
    (1.0 + 15.0 / 60.0) / 60.0,
    (1.0 + 52.5 / 60.0) / 60.0,
    Numbering::RotatedLower,
    Join::Suffix,
);

fn steps(scale: StandardScale) -> &'static [Step] {
    match scale {
        StandardScale::Custom | StandardScale::Scale1M => &[],
        StandardScale::Scale500K => &[S500K],
        StandardScale::Scale300K => &[S300K],
        StandardScale::Scale200K => &[S200K],
        StandardScale::Scale100K => &[S100K],
        StandardScale::Scale50K => &[S100K, S50K],
        StandardScale::Scale25K => &[S100K, S50K, S25K],
        StandardScale::Scale10K => &[S100K, S50K, S25K, S10K],
        StandardScale::Scale5K => &[S100K, S5K],
        StandardScale::Scale2K => &[S100K, S5K, S2K],
    }
}

impl Numbering {
    fn render(self, number: u32) -> Option<String> {
        let index = number.checked_sub(1)? as usize;
        match self {
            Numbering::Arabic => Some(number.to_string()),
            Numbering::Roman => Some(to_roman(number)),
            Numbering::Upper => letter(index),
            Numbering::Lower => letter(index).map(|s| s.to_ascii_lowercase()),
            Numbering::RotatedLower => {
                let rotated = if index >= 6 { index - 6 } else { index + 3 };
                letter(rotated).map(|s| s.to_ascii_lowercase())
            }
        }
    }
}

fn letter(index: usize) -> Option<String> {
    ALPHABET.get(index).map(|b| char::from(*b).to_string())
}

/// Floor-multiple of `divider` at or below `value`.
#[inline]
pub fn closest_less(value: f64, divider: f64) -> f64 {
    (value / divider).floor() * divider
}

/// Ceil-multiple of `divider` at or above `value`.
#[inline]
pub fn closest_greater(value: f64, divider: f64) -> f64 {
    (value / divider).ceil() * divider
}

/// Number (1-based) of the sub-sheet containing the point when the enclosing
/// sheet of `sheet_lat × sheet_lng` degrees is split into `parts × parts`.
///
/// Sub-sheets are counted left to right, top to bottom, so the result lies in
/// `[1, parts²]`. The enclosing sheet is found by snapping the point down to a
/// multiple of the sheet size; borders belong to the sheet north/east of them.
pub fn sheet_number(lat: f64, lng: f64, parts: u32, sheet_lat: f64, sheet_lng: f64) -> u32 {
    let lat = round5(lat);
    let lng = round5(lng);
    let lat_size = round5(sheet_lat);
    let lng_size = round5(sheet_lng);

    let bottom = round5(closest_less(lat, lat_size));
    let left = round5(closest_less(lng, lng_size));

    let max_index = parts.saturating_sub(1) as f64;
    let row_from_bottom = ((lat - bottom) / (lat_size / parts as f64))
        .floor()
        .clamp(0.0, max_index) as u32;
    let col_from_left = ((lng - left) / (lng_size / parts as f64))
        .floor()
        .clamp(0.0, max_index) as u32;

    let row = parts - row_from_bottom;
    let col = col_from_left + 1;
    parts * (row - 1) + col
}

/// Standard sheet name of the sheet containing `(lat, lng)` at `scale`.
///
/// Grid cells are named by their centre so that the point never lies on a
/// sheet border.
pub fn name_for(lat: f64, lng: f64, scale: StandardScale) -> String {
    if !scale.is_standard() {
        return NOT_IN_STANDARD_SCALE.to_string();
    }

    let lat = round5(lat);
    let lng = round5(lng);

    let row = (lat.abs() / BASE_SHEET_LAT).floor() as usize;
    let Some(row_letter) = letter(row) else {
        return OUT_OF_NOMENCLATURE_RANGE.to_string();
    };
    let column = (lng / BASE_SHEET_LNG).floor() as i64 + BASE_COLUMN_OFFSET;
    let mut name = format!("{row_letter}-{column}");

    let mut group_open = false;
    for step in steps(scale) {
        let number = sheet_number(lat, lng, step.parts, step.sheet_lat, step.sheet_lng);
        let Some(label) = step.numbering.render(number) else {
            return OUT_OF_NOMENCLATURE_RANGE.to_string();
        };
        match step.join {
            Join::Suffix => {
                name.push('-');
                name.push_str(&label);
            }
            Join::Prefix => name = format!("{label}-{name}"),
            Join::OpenGroup => {
                name.push('(');
                name.push_str(&label);
                group_open = true;
            }
        }
    }
    if group_open {
        name.push(')');
    }

    if lat < 0.0 {
        name.push_str(SOUTHERN_SUFFIX);
    }
    name
}
