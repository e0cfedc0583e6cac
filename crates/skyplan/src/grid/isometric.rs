use skyplan_core::geometry::{Point, Size};

use super::{Snapper, round_to};
use crate::config::GridConfig;

/// Diamond lattice used by the isometric view.
///
/// Vertices sit at `(k * step, j * step / 2)` for integers `k` and `j` with
/// `k + j` even. Neighbouring vertices are joined by lines of slope ±0.5,
/// which is the projection of the ground plane.
#[derive(Debug, Clone, Copy)]
pub struct IsometricGrid {
    step: f32,
    group_step: f32,
    min_group_width: f32,
}

impl IsometricGrid {
    pub fn new(step: f32, group_step: f32, min_group_width: f32) -> Self {
        Self {
            step,
            group_step,
            min_group_width,
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(
            config.isometric_step(),
            config.isometric_group_step(),
            config.isometric_min_group_width(),
        )
    }

    /// Returns `true` if the point lies on a lattice vertex.
    pub fn is_vertex(&self, point: Point) -> bool {
        let k = point.x() / self.step;
        let j = point.y() / (self.step / 2.0);
        k.fract() == 0.0 && j.fract() == 0.0 && (k as i64 + j as i64).rem_euclid(2) == 0
    }

    fn vertex(&self, k: i64, j: i64) -> Point {
        Point::new(k as f32 * self.step, j as f32 * self.step / 2.0)
    }
}

impl Default for IsometricGrid {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

impl Snapper for IsometricGrid {
    fn snap_point(&self, point: Point) -> Point {
        let k = (point.x() / self.step).floor() as i64;
        let j = (point.y() / (self.step / 2.0)).floor() as i64;

        // Exactly two corners of the enclosing cell pass the parity rule and
        // one of them is the nearest vertex overall. Ties keep the first.
        let mut best: Option<(Point, f32)> = None;
        for (ck, cj) in [(k, j), (k, j + 1), (k + 1, j), (k + 1, j + 1)] {
            if (ck + cj).rem_euclid(2) != 0 {
                continue;
            }
            let candidate = self.vertex(ck, cj);
            let distance = candidate.distance(point);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((candidate, distance)),
            }
        }

        best.map_or(point, |(vertex, _)| vertex)
    }

    /// Anchors the bottom vertex of the service footprint.
    fn snap_service(&self, position: Point, size: Size) -> Point {
        let offset = Point::new(size.width() / 2.0, size.height());
        self.snap_point(position.add_point(offset)).sub_point(offset)
    }

    /// Anchors the top vertex of the group diamond.
    fn snap_group(&self, position: Point, size: Size) -> Point {
        let offset = Point::new(size.width() / 2.0, 0.0);
        self.snap_point(position.add_point(offset)).sub_point(offset)
    }

    /// Groups are drawn as 2:1 diamonds. The width grows until the diamond is
    /// at least as tall as the raw box, then rounds to the group step.
    fn snap_group_dimensions(&self, raw: Size) -> Size {
        let basis = raw.width().max(raw.height() * 2.0);
        let width = round_to(basis, self.group_step).max(self.min_group_width);
        Size::new(width, width / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_point_respects_parity() {
        let grid = IsometricGrid::default();

        assert_eq!(grid.snap_point(Point::new(0.0, 0.0)), Point::new(0.0, 0.0));
        // (1, 0) is odd; the nearest even vertices are (0, 0) and (1, 1).
        assert_eq!(grid.snap_point(Point::new(38.0, 2.0)), Point::new(40.0, 20.0));
        assert_eq!(grid.snap_point(Point::new(3.0, 2.0)), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_snap_point_negative_coordinates() {
        let grid = IsometricGrid::default();
        let snapped = grid.snap_point(Point::new(-41.0, -19.0));

        assert!(grid.is_vertex(snapped));
        assert_eq!(snapped, Point::new(-40.0, -20.0));
    }

    #[test]
    fn test_snap_service_anchors_bottom_vertex() {
        let grid = IsometricGrid::default();
        let size = Size::new(120.0, 80.0);

        let position = grid.snap_service(Point::new(33.0, 47.0), size);
        let anchor = Point::new(position.x() + 60.0, position.y() + 80.0);
        assert!(grid.is_vertex(anchor));
    }

    #[test]
    fn test_snap_group_anchors_top_vertex() {
        let grid = IsometricGrid::default();
        let size = Size::new(240.0, 120.0);

        let position = grid.snap_group(Point::new(13.0, 27.0), size);
        assert!(grid.is_vertex(Point::new(position.x() + 120.0, position.y())));
    }

    #[test]
    fn test_group_dimensions() {
        let grid = IsometricGrid::default();

        assert_eq!(
            grid.snap_group_dimensions(Size::new(10.0, 10.0)),
            Size::new(160.0, 80.0)
        );
        assert_eq!(
            grid.snap_group_dimensions(Size::new(500.0, 100.0)),
            Size::new(480.0, 240.0)
        );
        // Tall content widens the diamond.
        assert_eq!(
            grid.snap_group_dimensions(Size::new(200.0, 300.0)),
            Size::new(640.0, 320.0)
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn check_snapped_point_is_vertex(x: f32, y: f32) {
        let grid = IsometricGrid::default();
        let snapped = grid.snap_point(Point::new(x, y));

        let k = (snapped.x() / 40.0).round() as i64;
        let j = (snapped.y() / 20.0).round() as i64;
        assert_eq!((k + j).rem_euclid(2), 0, "{snapped:?} breaks the parity rule");
    }

    fn check_snapped_point_is_nearest(x: f32, y: f32) {
        let grid = IsometricGrid::default();
        let point = Point::new(x, y);
        let snapped = grid.snap_point(point);
        let chosen = snapped.distance(point);

        let k0 = (x / 40.0).floor() as i64;
        let j0 = (y / 20.0).floor() as i64;
        for k in k0 - 2..=k0 + 2 {
            for j in j0 - 2..=j0 + 2 {
                if (k + j).rem_euclid(2) != 0 {
                    continue;
                }
                let other = grid.vertex(k, j).distance(point);
                assert!(
                    chosen <= other + 1e-3,
                    "{snapped:?} ({chosen}) is farther than vertex ({k}, {j}) ({other})"
                );
            }
        }
    }

    fn check_group_dimensions(width: f32, height: f32) {
        let grid = IsometricGrid::default();
        let size = grid.snap_group_dimensions(Size::new(width, height));

        assert_eq!(size.height(), size.width() / 2.0);
        assert_eq!(size.width() % 80.0, 0.0);
        assert!(size.width() >= 160.0);
    }

    proptest! {
        #[test]
        fn snapped_point_is_vertex(x in -4000.0f32..4000.0, y in -4000.0f32..4000.0) {
            check_snapped_point_is_vertex(x, y);
        }

        #[test]
        fn snapped_point_is_nearest(x in -4000.0f32..4000.0, y in -4000.0f32..4000.0) {
            check_snapped_point_is_nearest(x, y);
        }

        #[test]
        fn group_dimensions_keep_two_to_one(width in 0.0f32..4000.0, height in 0.0f32..4000.0) {
            check_group_dimensions(width, height);
        }
    }
}
