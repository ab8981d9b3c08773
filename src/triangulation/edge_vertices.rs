use bevy::prelude::Vec3;

use crate::metrics;

/// Five points along one cell edge, from its first to its second corner.
///
/// The subdivision lets rivers cut a channel through the middle point while
/// the rest of the edge stays at cell height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeVertices {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
    pub v4: Vec3,
    pub v5: Vec3,
}

impl EdgeVertices {
    /// Evenly spaced points at 0, ¼, ½, ¾ and 1.
    pub fn new(corner1: Vec3, corner2: Vec3) -> Self {
        Self::with_outer_step(corner1, corner2, 0.25)
    }

    /// Points at 0, `outer_step`, ½, `1 - outer_step` and 1.
    pub fn with_outer_step(corner1: Vec3, corner2: Vec3, outer_step: f32) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, outer_step),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 1.0 - outer_step),
            v5: corner2,
        }
    }

    /// Terrace interpolation applied to every point pair.
    pub fn terrace_lerp(a: EdgeVertices, b: EdgeVertices, step: i32) -> Self {
        Self {
            v1: metrics::terrace_lerp(a.v1, b.v1, step),
            v2: metrics::terrace_lerp(a.v2, b.v2, step),
            v3: metrics::terrace_lerp(a.v3, b.v3, step),
            v4: metrics::terrace_lerp(a.v4, b.v4, step),
            v5: metrics::terrace_lerp(a.v5, b.v5, step),
        }
    }

    /// The four consecutive segments `(v1, v2)` .. `(v4, v5)`.
    pub fn segments(&self) -> [(Vec3, Vec3); 4] {
        [
            (self.v1, self.v2),
            (self.v2, self.v3),
            (self.v3, self.v4),
            (self.v4, self.v5),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spacing_is_quarters() {
        let e = EdgeVertices::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0));
        let xs = [e.v1.x, e.v2.x, e.v3.x, e.v4.x, e.v5.x];
        assert_eq!(xs, [0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn outer_step_moves_inner_points_only() {
        let e = EdgeVertices::with_outer_step(Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0), 1.0 / 6.0);
        assert!((e.v2.x - 1.0).abs() < 1e-6);
        assert!((e.v3.x - 3.0).abs() < 1e-6);
        assert!((e.v4.x - 5.0).abs() < 1e-6);
        assert_eq!(e.v5.x, 6.0);
    }

    #[test]
    fn segments_chain_end_to_start() {
        let e = EdgeVertices::new(Vec3::ZERO, Vec3::ONE);
        let segments = e.segments();
        for pair in segments.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(segments[0].0, e.v1);
        assert_eq!(segments[3].1, e.v5);
    }

    #[test]
    fn terrace_lerp_endpoints() {
        let a = EdgeVertices::new(Vec3::ZERO, Vec3::X);
        let b = EdgeVertices::new(Vec3::new(0.0, 3.0, 2.0), Vec3::new(1.0, 3.0, 2.0));
        assert_eq!(EdgeVertices::terrace_lerp(a, b, 0), a);
        let end = EdgeVertices::terrace_lerp(a, b, metrics::TERRACE_STEPS);
        assert!((end.v3 - b.v3).length() < 1e-5);
    }
}
