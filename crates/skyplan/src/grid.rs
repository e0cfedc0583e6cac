//! Grid snapping for both canvas projections.
//!
//! Every coordinate the engine produces is aligned to a lattice. The
//! cartesian lattice is a square grid; the isometric lattice is a diamond
//! grid whose vertices satisfy an even-parity rule (see [`IsometricGrid`]).
//!
//! Services snap by their bottom vertex in isometric mode and by their
//! top-left corner in cartesian mode; groups snap by their top vertex or
//! top-left corner. The [`Snapper`] trait hides the difference from the
//! layout engine.

mod cartesian;
mod isometric;

pub use cartesian::CartesianGrid;
pub use isometric::IsometricGrid;

use skyplan_core::{
    diagram::ViewMode,
    geometry::{Point, Size},
};

use crate::config::GridConfig;

/// Trait defining the interface for lattice snapping.
pub trait Snapper {
    /// Snaps a free point to the nearest lattice vertex.
    fn snap_point(&self, point: Point) -> Point;

    /// Snaps the top-left position of a service node with the given size.
    ///
    /// Returns the adjusted top-left position.
    fn snap_service(&self, position: Point, size: Size) -> Point;

    /// Snaps the top-left position of a group box with the given size.
    fn snap_group(&self, position: Point, size: Size) -> Point;

    /// Rounds raw group dimensions to the lattice, enforcing the minimums.
    fn snap_group_dimensions(&self, raw: Size) -> Size;
}

/// Creates the snapper for a view mode.
pub fn snapper_for(view_mode: ViewMode, config: &GridConfig) -> Box<dyn Snapper> {
    match view_mode {
        ViewMode::Cartesian => Box::new(CartesianGrid::from_config(config)),
        ViewMode::Isometric => Box::new(IsometricGrid::from_config(config)),
    }
}

/// Rounds `value` to the nearest multiple of `step`.
fn round_to(value: f32, step: f32) -> f32 {
    (value / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapper_for_view_mode() {
        let config = GridConfig::default();

        let cartesian = snapper_for(ViewMode::Cartesian, &config);
        assert_eq!(
            cartesian.snap_point(Point::new(47.0, 13.0)),
            Point::new(40.0, 20.0)
        );

        let isometric = snapper_for(ViewMode::Isometric, &config);
        let snapped = isometric.snap_point(Point::new(47.0, 13.0));
        assert_eq!(snapped, Point::new(40.0, 20.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(29.0, 20.0), 20.0);
        assert_eq!(round_to(31.0, 20.0), 40.0);
        assert_eq!(round_to(-31.0, 20.0), -40.0);
    }
}
