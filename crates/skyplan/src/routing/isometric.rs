use skyplan_core::geometry::{Bounds, Point};

use super::{EdgePath, RouteStrategy};
use crate::config::RoutingConfig;

/// Minimum half-width of the window a slope corner must fall inside.
const MIN_CORNER_WINDOW: f32 = 80.0;

/// Vertex of a node's diamond footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
}

impl Anchor {
    /// Location of the anchor on a node rectangle.
    pub fn point(self, bounds: Bounds) -> Point {
        let center = bounds.center();
        match self {
            Self::Top => Point::new(center.x(), bounds.min_y()),
            Self::Right => Point::new(bounds.max_x(), center.y()),
            Self::Bottom => Point::new(center.x(), bounds.max_y()),
            Self::Left => Point::new(bounds.min_x(), center.y()),
        }
    }

    /// Exit and entry anchors for a connector heading in direction
    /// `(dx, dy)` from source center to target center.
    pub fn pair_for(dx: f32, dy: f32) -> (Self, Self) {
        match (dx >= 0.0, dy >= 0.0) {
            (true, true) => (Self::Right, Self::Top),
            (true, false) => (Self::Top, Self::Left),
            (false, true) => (Self::Left, Self::Top),
            (false, false) => (Self::Top, Self::Right),
        }
    }
}

/// Router for the isometric view.
///
/// A connector leaves the source along a line of slope +0.5 and reaches the
/// target along a line of slope -0.5; the corner is where the two lines
/// meet. When that corner lands far outside the box spanned by the two
/// anchors the connector bends at the anchors' midpoint instead.
pub struct IsometricRouter {
    config: RoutingConfig,
}

impl IsometricRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    pub fn route(&self, source: Bounds, target: Bounds) -> EdgePath {
        let s = source.center();
        let t = target.center();
        let (exit, entry) = Anchor::pair_for(t.x() - s.x(), t.y() - s.y());
        let start = exit.point(source);
        let end = entry.point(target);
        let (radius, _) = self.config.corner_radius_bounds();

        let corner = slope_corner(start, end);
        let window = ((end.x() - start.x()).abs() * 0.5).max(MIN_CORNER_WINDOW);
        let inside = corner.x() >= start.x().min(end.x()) - window
            && corner.x() <= start.x().max(end.x()) + window
            && corner.y() >= start.y().min(end.y()) - window
            && corner.y() <= start.y().max(end.y()) + window;

        if inside {
            EdgePath::new(RouteStrategy::Isometric, vec![start, corner, end], radius, None)
        } else {
            EdgePath::new(
                RouteStrategy::IsometricFallback,
                vec![start, start.midpoint(end), end],
                radius,
                None,
            )
        }
    }
}

/// Intersection of the +0.5 slope line through `start` with the -0.5 slope
/// line through `end`.
fn slope_corner(start: Point, end: Point) -> Point {
    let x = end.y() - start.y() + 0.5 * start.x() + 0.5 * end.x();
    let y = start.y() + 0.5 * (x - start.x());
    Point::new(x, y)
}
