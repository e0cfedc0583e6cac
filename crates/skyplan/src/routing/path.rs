use std::fmt::Write;

use skyplan_core::geometry::Point;

/// Builds SVG path data for a polyline, rounding every interior corner with a
/// quadratic curve.
///
/// The radius at each corner is limited to half of each adjacent segment so
/// consecutive curves never overlap.
pub(super) fn rounded_path_data(points: &[Point], radius: f32) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };

    let mut data = format!("M {} {}", first.x(), first.y());
    for (index, &current) in points.iter().enumerate().skip(1) {
        let next = points.get(index + 1).copied();
        let previous = points[index - 1];

        if let Some(next) = next {
            let r = radius
                .min(previous.distance(current) / 2.0)
                .min(current.distance(next) / 2.0);
            if r > 0.0 {
                let before = towards(current, previous, r);
                let after = towards(current, next, r);
                let _ = write!(
                    data,
                    " L {} {} Q {} {} {} {}",
                    before.x(),
                    before.y(),
                    current.x(),
                    current.y(),
                    after.x(),
                    after.y()
                );
                continue;
            }
        }

        let _ = write!(data, " L {} {}", current.x(), current.y());
    }
    data
}

/// Point at `distance` from `from` in the direction of `to`.
fn towards(from: Point, to: Point, distance: f32) -> Point {
    let length = from.distance(to);
    if length == 0.0 {
        return from;
    }
    let ratio = distance / length;
    Point::new(
        from.x() + (to.x() - from.x()) * ratio,
        from.y() + (to.y() - from.y()) * ratio,
    )
}

/// Drops consecutive duplicate points.
pub(super) fn dedup_points(points: Vec<Point>) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len());
    for point in points {
        if result.last() != Some(&point) {
            result.push(point);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line() {
        let data = rounded_path_data(&[Point::new(0.0, 10.0), Point::new(300.0, 10.0)], 8.0);
        assert_eq!(data, "M 0 10 L 300 10");
    }

    #[test]
    fn test_corner_is_rounded() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
        ];
        let data = rounded_path_data(&points, 10.0);
        assert_eq!(data, "M 0 0 L 0 90 Q 0 100 10 100 L 100 100");
    }

    #[test]
    fn test_radius_limited_by_short_segment() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 8.0),
            Point::new(100.0, 8.0),
        ];
        let data = rounded_path_data(&points, 12.0);
        assert_eq!(data, "M 0 0 L 0 4 Q 0 8 4 8 L 100 8");
    }

    #[test]
    fn test_empty_and_duplicates() {
        assert_eq!(rounded_path_data(&[], 4.0), "");
        let points = dedup_points(vec![
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
        ]);
        assert_eq!(points.len(), 2);
    }
}
