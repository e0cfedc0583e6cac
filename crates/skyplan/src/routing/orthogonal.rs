use log::trace;

use skyplan_core::{
    geometry::{Bounds, Insets, Point},
    identifier::Id,
};

use super::{EdgePath, RouteStrategy};
use crate::config::RoutingConfig;

/// Offsets applied around the midpoint channel, as fractions of the span.
const INNER_OFFSETS: [f32; 2] = [-0.25, 0.25];
/// Distance of the outer channels beyond the boxes, as a fraction of the span.
const OUTER_OFFSET: f32 = 0.3;
/// Number of bundling slots; slot `n` shifts the channel by `(n - 2) * step`.
const BUNDLE_SLOTS: u32 = 5;

/// A scored channel candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    channel: f32,
    collisions: usize,
    length: f32,
    score: f32,
}

/// Router for the cartesian view.
///
/// Connectors between nodes that are nearly level run straight from side to
/// side. All other connectors leave the source vertically, run horizontally
/// along a channel, and enter the target vertically. The channel is picked
/// from five candidates: the vertical midpoint, two points a quarter span
/// either side of it, and one channel above and one below both nodes.
///
/// Candidates are compared by obstacle collisions first and score second, so
/// a collision-free channel is always preferred when one exists. The score
/// is the path length with a penalty per collision, a bonus for channels
/// well clear of both nodes, and a small pull towards the midpoint.
pub struct OrthogonalRouter {
    config: RoutingConfig,
}

impl OrthogonalRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    pub fn route(&self, edge_id: Id, source: Bounds, target: Bounds, obstacles: &[Bounds]) -> EdgePath {
        let s = source.center();
        let t = target.center();

        if (t.y() - s.y()).abs() < self.config.level_threshold() {
            return level_route(source, target);
        }

        let margin = self.clearance_margin(obstacles.len());
        let candidates = self.candidates(source, target, obstacles, margin);

        // Candidates are never empty; the midpoint is always first.
        let midpoint = candidates[0];
        let best = candidates
            .iter()
            .copied()
            .min_by(|a, b| {
                a.collisions
                    .cmp(&b.collisions)
                    .then(a.score.total_cmp(&b.score))
            })
            .unwrap_or(midpoint);

        let chosen = if midpoint.collisions == 0
            && midpoint.length <= best.length * (1.0 + self.config.direct_tolerance())
        {
            midpoint
        } else {
            best
        };

        let offset = bundle_offset(edge_id, self.config.bundle_step());
        let channel = if offset == 0.0 {
            chosen.channel
        } else {
            let shifted = self.evaluate(source, target, chosen.channel + offset, obstacles, margin);
            if shifted.collisions > chosen.collisions {
                chosen.channel
            } else {
                shifted.channel
            }
        };
        trace!(
            edge = edge_id.to_text(),
            channel = channel,
            collisions = chosen.collisions;
            "Selected routing channel"
        );

        let (min_radius, max_radius) = self.config.corner_radius_bounds();
        let radius = ((t.y() - s.y()).abs() * 0.1).clamp(min_radius, max_radius);

        EdgePath::new(
            RouteStrategy::Channel,
            channel_points(source, target, channel),
            radius,
            Some(channel),
        )
    }

    /// Clearance margin shrinks as the diagram gets denser.
    fn clearance_margin(&self, obstacle_count: usize) -> f32 {
        let scaled = self.config.clearance() * 10.0 / (10.0 + obstacle_count as f32);
        scaled.max(self.config.min_clearance())
    }

    fn candidates(
        &self,
        source: Bounds,
        target: Bounds,
        obstacles: &[Bounds],
        margin: f32,
    ) -> Vec<Candidate> {
        let (upper, lower) = if source.center().y() <= target.center().y() {
            (source, target)
        } else {
            (target, source)
        };
        // Channel space is the gap between the boxes, or the band between
        // their centers when they overlap vertically.
        let (top, bottom) = if upper.max_y() < lower.min_y() {
            (upper.max_y(), lower.min_y())
        } else {
            (upper.center().y(), lower.center().y())
        };
        let span = bottom - top;
        let mid = (top + bottom) / 2.0;

        let mut channels = vec![mid];
        channels.extend(INNER_OFFSETS.iter().map(|factor| mid + factor * span));
        channels.push(upper.min_y().min(lower.min_y()) - margin - OUTER_OFFSET * span);
        channels.push(upper.max_y().max(lower.max_y()) + margin + OUTER_OFFSET * span);

        channels
            .into_iter()
            .map(|channel| {
                let candidate = self.evaluate(source, target, channel, obstacles, margin);
                let pull = (channel - mid).abs() * self.config.midpoint_bias();
                Candidate {
                    score: candidate.score + pull,
                    ..candidate
                }
            })
            .collect()
    }

    fn evaluate(
        &self,
        source: Bounds,
        target: Bounds,
        channel: f32,
        obstacles: &[Bounds],
        margin: f32,
    ) -> Candidate {
        let points = channel_points(source, target, channel);
        let collisions = count_collisions(&points, obstacles, margin);
        let length: f32 = points.windows(2).map(|pair| pair[0].distance(pair[1])).sum();

        let clear = is_clear_of(source, channel, margin) && is_clear_of(target, channel, margin);
        let bonus = if clear {
            self.config.clear_channel_bonus()
        } else {
            0.0
        };

        Candidate {
            channel,
            collisions,
            length,
            score: length + collisions as f32 * self.config.collision_penalty() - bonus,
        }
    }
}

/// Straight horizontal connector at the vertical midpoint of two level nodes.
fn level_route(source: Bounds, target: Bounds) -> EdgePath {
    let y = (source.center().y() + target.center().y()) / 2.0;
    let (start_x, end_x) = if target.center().x() >= source.center().x() {
        (source.max_x(), target.min_x())
    } else {
        (source.min_x(), target.max_x())
    };

    EdgePath::new(
        RouteStrategy::Direct,
        vec![Point::new(start_x, y), Point::new(end_x, y)],
        0.0,
        Some(y),
    )
}

/// Vertical, horizontal, vertical polyline through `channel`.
///
/// Each vertical leg leaves from the side of its box facing the channel.
fn channel_points(source: Bounds, target: Bounds, channel: f32) -> Vec<Point> {
    let s = source.center();
    let t = target.center();
    let start_y = if channel >= s.y() {
        source.max_y()
    } else {
        source.min_y()
    };
    let end_y = if channel >= t.y() {
        target.max_y()
    } else {
        target.min_y()
    };

    vec![
        Point::new(s.x(), start_y),
        Point::new(s.x(), channel),
        Point::new(t.x(), channel),
        Point::new(t.x(), end_y),
    ]
}

/// Number of obstacles touched by any segment of the polyline, with each
/// segment widened by `margin` on every side.
fn count_collisions(points: &[Point], obstacles: &[Bounds], margin: f32) -> usize {
    let segments: Vec<Bounds> = points
        .windows(2)
        .map(|pair| {
            Bounds::new(pair[0].x(), pair[0].y(), pair[1].x(), pair[1].y())
                .add_padding(Insets::uniform(margin))
        })
        .collect();

    obstacles
        .iter()
        .filter(|obstacle| segments.iter().any(|segment| segment.intersects(obstacle)))
        .count()
}

fn is_clear_of(bounds: Bounds, channel: f32, margin: f32) -> bool {
    channel < bounds.min_y() - margin || channel > bounds.max_y() + margin
}

/// Deterministic per-edge offset that separates parallel connectors.
fn bundle_offset(edge_id: Id, step: f32) -> f32 {
    let slot = (edge_id.stable_hash() % BUNDLE_SLOTS) as f32;
    (slot - 2.0) * step
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn obstacle_strategy() -> impl Strategy<Value = Vec<Bounds>> {
        prop::collection::vec(
            (-200.0f32..700.0, -200.0f32..600.0, 10.0f32..150.0, 10.0f32..100.0)
                .prop_map(|(x, y, w, h)| Bounds::new(x, y, x + w, y + h)),
            0..6,
        )
    }

    fn check_collision_free_channel_preferred(
        source: Bounds,
        target: Bounds,
        obstacles: &[Bounds],
        edge: &str,
    ) {
        let router = OrthogonalRouter::new(RoutingConfig::default());
        let obstacles: Vec<Bounds> = obstacles
            .iter()
            .copied()
            .filter(|o| !o.intersects(&source) && !o.intersects(&target))
            .collect();
        if (target.center().y() - source.center().y()).abs() < 12.0 {
            return;
        }

        let margin = router.clearance_margin(obstacles.len());
        let candidates = router.candidates(source, target, &obstacles, margin);
        let path = router.route(Id::new(edge), source, target, &obstacles);
        let collisions = count_collisions(path.points(), &obstacles, margin);

        let min_collisions = candidates.iter().map(|c| c.collisions).min().unwrap_or(0);
        assert!(
            collisions <= min_collisions,
            "route has {collisions} collisions, a candidate had {min_collisions}"
        );
    }

    fn check_route_connects_endpoints(source: Bounds, target: Bounds, edge: &str) {
        let router = OrthogonalRouter::new(RoutingConfig::default());
        let path = router.route(Id::new(edge), source, target, &[]);

        let start = path.start().expect("start");
        let end = path.end().expect("end");
        assert!(source.contains_point(start), "{start:?} not on {source:?}");
        assert!(target.contains_point(end), "{end:?} not on {target:?}");
        assert!(path.corner_radius() <= 12.0);
    }

    proptest! {
        #[test]
        fn collision_free_channel_preferred(
            sx in 0.0f32..600.0, sy in 0.0f32..500.0,
            tx in 0.0f32..600.0, ty in 0.0f32..500.0,
            obstacles in obstacle_strategy(),
            edge in "[a-z]{1,6}",
        ) {
            let source = Bounds::new(sx, sy, sx + 120.0, sy + 80.0);
            let target = Bounds::new(tx, ty, tx + 120.0, ty + 80.0);
            prop_assume!(!source.intersects(&target));
            check_collision_free_channel_preferred(source, target, &obstacles, &edge);
        }

        #[test]
        fn route_connects_endpoints(
            sx in 0.0f32..600.0, sy in 0.0f32..500.0,
            tx in 0.0f32..600.0, ty in 0.0f32..500.0,
            edge in "[a-z]{1,6}",
        ) {
            let source = Bounds::new(sx, sy, sx + 120.0, sy + 80.0);
            let target = Bounds::new(tx, ty, tx + 120.0, ty + 80.0);
            check_route_connects_endpoints(source, target, &edge);
        }
    }
}
