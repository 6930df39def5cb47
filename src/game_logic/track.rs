use crate::game_logic::{ARC_LENGTH_DIVISIONS, CURVE_TENSION, ROAD_WIDTH, TRACK_SAMPLES};
use bevy::prelude::*;

/// Control points of the circuit on the ground plane (x, z).
const WAYPOINTS: [(f32, f32); 25] = [
    (0.0, -140.0),
    (40.0, -145.0),
    (80.0, -135.0),
    (120.0, -110.0),
    (145.0, -75.0),
    (155.0, -35.0),
    (155.0, 10.0),
    (150.0, 50.0),
    (135.0, 85.0),
    (110.0, 110.0),
    (80.0, 125.0),
    (45.0, 135.0),
    (5.0, 140.0),
    (-35.0, 138.0),
    (-70.0, 128.0),
    (-100.0, 108.0),
    (-125.0, 80.0),
    (-140.0, 48.0),
    (-148.0, 10.0),
    (-148.0, -30.0),
    (-140.0, -65.0),
    (-125.0, -95.0),
    (-100.0, -115.0),
    (-70.0, -128.0),
    (-35.0, -138.0),
];

/// Result of projecting a ground position onto the centreline.
#[derive(Clone, Copy, Debug)]
pub struct TrackProjection {
    pub t: f32,
    pub nearest: Vec2,
    pub distance: f32,
    /// Unit vector from the queried position towards `nearest` (zero when on it).
    pub push: Vec2,
}

/// One cross-section of the road ribbon.
#[derive(Clone, Copy, Debug)]
pub struct RoadSlice {
    pub t: f32,
    pub center: Vec2,
    pub left: Vec2,
    pub right: Vec2,
}

/// Closed Catmull-Rom circuit, parameterised by normalised arc length.
///
/// `t` in `[0, 1)` maps to a point along the loop; `t = 0` and `t -> 1`
/// coincide at the start/finish line.
#[derive(Resource, Clone)]
pub struct TrackCurve {
    control_points: Vec<Vec2>,
    arc_lengths: Vec<f32>,
    samples: Vec<Vec2>,
}

impl TrackCurve {
    // needs at least four control points to form a closed spline
    fn new(control_points: Vec<Vec2>) -> Self {
        let mut curve = Self {
            control_points,
            arc_lengths: Vec::new(),
            samples: Vec::new(),
        };

        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut sum = 0.0;
        let mut last = curve.spline_point(0.0);
        lengths.push(0.0);
        for i in 1..=ARC_LENGTH_DIVISIONS {
            let current = curve.spline_point(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        curve.arc_lengths = lengths;

        curve.samples = (0..TRACK_SAMPLES)
            .map(|i| curve.point_at(i as f32 / TRACK_SAMPLES as f32))
            .collect();
        curve
    }

    /// The fixed race circuit.
    pub fn circuit() -> Self {
        Self::new(WAYPOINTS.iter().map(|&(x, z)| Vec2::new(x, z)).collect())
    }

    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at normalised arc length `t` (wrapped into `[0, 1)`).
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.spline_point(self.arc_to_spline(t.rem_euclid(1.0)))
    }

    /// Unit tangent at normalised arc length `t`.
    pub fn tangent_at(&self, t: f32) -> Vec2 {
        const DELTA: f32 = 1e-4;
        let ahead = self.point_at(t + DELTA);
        let behind = self.point_at(t - DELTA);
        (ahead - behind).normalize_or(Vec2::Y)
    }

    /// Unit normal on the ground plane, the tangent turned a quarter clockwise.
    pub fn normal_at(&self, t: f32) -> Vec2 {
        let tangent = self.tangent_at(t);
        Vec2::new(-tangent.y, tangent.x)
    }

    /// Heading (0 faces +Z) of a car driving along the track at `t`.
    pub fn heading_at(&self, t: f32) -> f32 {
        let tangent = self.tangent_at(t);
        tangent.x.atan2(tangent.y)
    }

    /// Nearest sampled centreline point to `position`.
    ///
    /// Linear scan over `TRACK_SAMPLES` evenly spaced samples; the returned
    /// `t` is always one of `i / TRACK_SAMPLES`.
    pub fn nearest(&self, position: Vec2) -> TrackProjection {
        let mut best_index = 0;
        let mut best_distance = f32::INFINITY;
        for (i, sample) in self.samples.iter().enumerate() {
            let distance = position.distance(*sample);
            if distance < best_distance {
                best_distance = distance;
                best_index = i;
            }
        }

        let nearest = self.samples[best_index];
        TrackProjection {
            t: best_index as f32 / TRACK_SAMPLES as f32,
            nearest,
            distance: best_distance,
            push: (nearest - position).normalize_or_zero(),
        }
    }

    /// Cross-sections of the road surface, `segments + 1` slices closing the loop.
    pub fn road_ribbon(&self, segments: usize) -> Vec<RoadSlice> {
        self.offset_slices(segments, ROAD_WIDTH / 2.0)
    }

    /// Slices whose edges sit `half_width` either side of the centreline.
    pub fn offset_slices(&self, segments: usize, half_width: f32) -> Vec<RoadSlice> {
        (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let center = self.point_at(t);
                let normal = self.normal_at(t);
                RoadSlice {
                    t,
                    center,
                    left: center + normal * half_width,
                    right: center - normal * half_width,
                }
            })
            .collect()
    }

    // raw spline parameter -> position, uniform over control-point segments
    fn spline_point(&self, u: f32) -> Vec2 {
        let count = self.control_points.len();
        let p = count as f32 * u.rem_euclid(1.0);
        let index = p.floor() as usize % count;
        let weight = p - p.floor();

        let p0 = self.control_points[(index + count - 1) % count];
        let p1 = self.control_points[index];
        let p2 = self.control_points[(index + 1) % count];
        let p3 = self.control_points[(index + 2) % count];

        let t0 = (p2 - p0) * CURVE_TENSION;
        let t1 = (p3 - p1) * CURVE_TENSION;
        let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * t0 - t1;
        let c3 = 2.0 * p1 - 2.0 * p2 + t0 + t1;
        p1 + t0 * weight + c2 * weight * weight + c3 * weight * weight * weight
    }

    // normalised arc length -> raw spline parameter
    fn arc_to_spline(&self, t: f32) -> f32 {
        let last = self.arc_lengths.len() - 1;
        let target = t * self.arc_lengths[last];

        let upper = self.arc_lengths.partition_point(|&len| len <= target);
        let i = upper.saturating_sub(1).min(last - 1);

        let before = self.arc_lengths[i];
        let segment = self.arc_lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            ((target - before) / segment).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (i as f32 + fraction) / last as f32
    }
}

impl Default for TrackCurve {
    fn default() -> Self {
        Self::circuit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_is_closed() {
        let track = TrackCurve::circuit();
        let start = track.point_at(0.0);
        let end = track.point_at(0.99999);
        assert!(start.distance(end) < 0.1);
        assert!(start.distance(Vec2::new(0.0, -140.0)) < 1e-3);
    }

    #[test]
    fn test_tangent_is_unit_length() {
        let track = TrackCurve::circuit();
        for i in 0..20 {
            let tangent = track.tangent_at(i as f32 / 20.0);
            assert!((tangent.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_points_are_evenly_spaced_by_arc_length() {
        let track = TrackCurve::circuit();
        let step = track.length() / 100.0;
        for i in 0..100 {
            let a = track.point_at(i as f32 / 100.0);
            let b = track.point_at((i + 1) as f32 / 100.0);
            // chord is never longer than the arc, and only slightly shorter
            assert!(a.distance(b) <= step * 1.01);
            assert!(a.distance(b) >= step * 0.95);
        }
    }

    #[test]
    fn test_nearest_on_centreline() {
        let track = TrackCurve::circuit();
        let t = 150.0 / TRACK_SAMPLES as f32;
        let projection = track.nearest(track.point_at(t));
        assert!((projection.t - t).abs() < 1e-5);
        assert!(projection.distance < 1e-3);
        assert_eq!(projection.push, Vec2::ZERO);
    }

    #[test]
    fn test_nearest_push_points_back_to_centreline() {
        let track = TrackCurve::circuit();
        let t = 300.0 / TRACK_SAMPLES as f32;
        let center = track.point_at(t);
        let outside = center + track.normal_at(t) * 12.0;

        let projection = track.nearest(outside);
        assert!((projection.distance - 12.0).abs() < 0.5);
        assert!((projection.push.length() - 1.0).abs() < 1e-4);
        assert!(projection.push.dot(-track.normal_at(t)) > 0.99);
        assert!(projection.t >= 0.0 && projection.t < 1.0);
    }

    #[test]
    fn test_road_ribbon_spans_road_width() {
        let track = TrackCurve::circuit();
        let ribbon = track.road_ribbon(60);
        assert_eq!(ribbon.len(), 61);
        for slice in &ribbon {
            assert!((slice.left.distance(slice.right) - ROAD_WIDTH).abs() < 1e-3);
        }
        assert!(ribbon[0].center.distance(ribbon[60].center) < 0.1);
    }
}
