use skyplan_core::geometry::{Point, Size};

use super::{Snapper, round_to};
use crate::config::GridConfig;

/// Square lattice used by the cartesian view.
#[derive(Debug, Clone, Copy)]
pub struct CartesianGrid {
    step: f32,
    group_step: f32,
    min_group_size: Size,
}

impl CartesianGrid {
    pub fn new(step: f32, group_step: f32, min_group_size: Size) -> Self {
        Self {
            step,
            group_step,
            min_group_size,
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(
            config.cartesian_step(),
            config.cartesian_group_step(),
            config.cartesian_min_group_size(),
        )
    }
}

impl Default for CartesianGrid {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

impl Snapper for CartesianGrid {
    fn snap_point(&self, point: Point) -> Point {
        Point::new(round_to(point.x(), self.step), round_to(point.y(), self.step))
    }

    fn snap_service(&self, position: Point, _size: Size) -> Point {
        self.snap_point(position)
    }

    fn snap_group(&self, position: Point, _size: Size) -> Point {
        self.snap_point(position)
    }

    fn snap_group_dimensions(&self, raw: Size) -> Size {
        Size::new(
            round_to(raw.width(), self.group_step).max(self.min_group_size.width()),
            round_to(raw.height(), self.group_step).max(self.min_group_size.height()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_point_rounds_each_axis() {
        let grid = CartesianGrid::default();

        assert_eq!(grid.snap_point(Point::new(0.0, 0.0)), Point::new(0.0, 0.0));
        assert_eq!(grid.snap_point(Point::new(9.0, 11.0)), Point::new(0.0, 20.0));
        assert_eq!(
            grid.snap_point(Point::new(-29.0, 151.0)),
            Point::new(-20.0, 160.0)
        );
    }

    #[test]
    fn test_group_dimensions_enforce_minimum() {
        let grid = CartesianGrid::default();

        assert_eq!(
            grid.snap_group_dimensions(Size::new(10.0, 10.0)),
            Size::new(160.0, 120.0)
        );
        assert_eq!(
            grid.snap_group_dimensions(Size::new(419.0, 221.0)),
            Size::new(400.0, 240.0)
        );
    }
}
