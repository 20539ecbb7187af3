use aerosurvey_core::rounding::round5;
use aerosurvey_nomenclature::{StandardScale, name_for, sheet_number};
use proptest::prelude::*;

const SHEET_LAT: f64 = 4.0;
const SHEET_LNG: f64 = 6.0;

proptest! {
    #[test]
    fn sheet_number_stays_in_range(
        lat in -89.9f64..89.9,
        lng in -179.9f64..179.9,
        parts in 1u32..=16,
    ) {
        let n = sheet_number(lat, lng, parts, SHEET_LAT, SHEET_LNG);
        prop_assert!((1..=parts * parts).contains(&n), "n = {} for {} parts", n, parts);
    }

    #[test]
    fn every_point_lands_in_the_sub_sheet_it_names(
        lat in -89.9f64..89.9,
        lng in -179.9f64..179.9,
        parts in 1u32..=12,
    ) {
        let n = sheet_number(lat, lng, parts, SHEET_LAT, SHEET_LNG);
        let lat = round5(lat);
        let lng = round5(lng);

        let bottom = (lat / SHEET_LAT).floor() * SHEET_LAT;
        let left = (lng / SHEET_LNG).floor() * SHEET_LNG;
        let h = SHEET_LAT / parts as f64;
        let w = SHEET_LNG / parts as f64;
        let row = ((n - 1) / parts) as f64;
        let col = ((n - 1) % parts) as f64;

        let sub_top = bottom + SHEET_LAT - row * h;
        let sub_bottom = sub_top - h;
        let sub_left = left + col * w;
        let sub_right = sub_left + w;

        prop_assert!(lat >= sub_bottom - 1e-9 && lat <= sub_top + 1e-9);
        prop_assert!(lng >= sub_left - 1e-9 && lng <= sub_right + 1e-9);
    }

    #[test]
    fn names_are_deterministic_and_stable_under_rounding(
        lat in -89.9f64..89.9,
        lng in -179.9f64..179.9,
        scale_index in 0usize..StandardScale::ALL.len(),
    ) {
        let scale = StandardScale::ALL[scale_index];
        let first = name_for(lat, lng, scale);
        prop_assert_eq!(&first, &name_for(lat, lng, scale));
        prop_assert_eq!(&first, &name_for(round5(lat), round5(lng), scale));
    }
}

#[test]
fn hundred_k_sheet_numbers_cover_the_whole_million_sheet() {
    // centres of the 144 sub-sheets of N-37 map onto 1..=144 exactly once
    let mut seen = vec![false; 144];
    let h = SHEET_LAT / 12.0;
    let w = SHEET_LNG / 12.0;
    for r in 0..12 {
        for c in 0..12 {
            let lat = 52.0 + (r as f64 + 0.5) * h;
            let lng = 36.0 + (c as f64 + 0.5) * w;
            let n = sheet_number(lat, lng, 12, SHEET_LAT, SHEET_LNG) as usize;
            assert!(!seen[n - 1], "sheet {n} produced twice");
            seen[n - 1] = true;
        }
    }
    assert!(seen.iter().all(|s| *s));
}
