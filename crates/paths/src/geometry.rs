//! Planar helpers in lon/lat coordinates used by the sweep.

use geo::{BooleanOps, BoundingRect, Coord, Line, LineString, MultiLineString, Polygon, Rect};

pub fn bounding_box(polygon: &Polygon<f64>) -> Option<Rect<f64>> {
    polygon.bounding_rect()
}

/// Part of `line` covered by `polygon`, as a single chord running in the
/// direction of `line` from the first entry into the polygon to the last exit.
///
/// Returns `None` when the line misses the polygon or only touches it in a point.
pub fn clip_line_by_polygon(line: &Line<f64>, polygon: &Polygon<f64>) -> Option<Line<f64>> {
    let sweep = MultiLineString::new(vec![LineString::from(vec![line.start, line.end])]);
    let inside = polygon.clip(&sweep, false);

    let dir = line.delta();
    let len2 = dir.x * dir.x + dir.y * dir.y;
    if len2 == 0.0 {
        return None;
    }
    let param =
        |c: &Coord<f64>| ((c.x - line.start.x) * dir.x + (c.y - line.start.y) * dir.y) / len2;

    let (lo, hi) = inside
        .iter()
        .flat_map(|piece| piece.coords())
        .map(param)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        });
    if lo.is_infinite() || hi <= lo {
        return None;
    }
    let at = |t: f64| Coord {
        x: line.start.x + dir.x * t,
        y: line.start.y + dir.y * t,
    };
    Some(Line::new(at(lo), at(hi)))
}
