//! Hexagon geometry constants and the pure helpers built on them.
//!
//! Everything here is stateless except [`perturb`] and
//! [`elevation_perturbation`], which read from an injected [`NoiseSampler`].

use bevy::color::{LinearRgba, Mix};
use bevy::prelude::Vec3;

use crate::coordinates::HexDirection;
use crate::math;
use crate::noise_source::NoiseSampler;

/// Distance from a cell center to any of its corners.
pub const OUTER_RADIUS: f32 = 10.0;
/// `√3 / 2`, the ratio between inner and outer radius.
pub const OUTER_TO_INNER: f32 = 0.866_025_4;
pub const INNER_TO_OUTER: f32 = 1.0 / OUTER_TO_INNER;
/// Distance from a cell center to the middle of any edge.
pub const INNER_RADIUS: f32 = OUTER_RADIUS * OUTER_TO_INNER;

/// Share of the hexagon drawn in the cell's own solid color.
pub const SOLID_FACTOR: f32 = 0.8;
/// Share of the hexagon used to blend into neighbors.
pub const BLEND_FACTOR: f32 = 1.0 - SOLID_FACTOR;

/// World height of one elevation level.
pub const ELEVATION_STEP: f32 = 3.0;

pub const TERRACES_PER_SLOPE: i32 = 2;
pub const TERRACE_STEPS: i32 = TERRACES_PER_SLOPE * 2 + 1;
pub const HORIZONTAL_TERRACE_STEP_SIZE: f32 = 1.0 / TERRACE_STEPS as f32;
pub const VERTICAL_TERRACE_STEP_SIZE: f32 = 1.0 / (TERRACES_PER_SLOPE + 1) as f32;

/// Planar displacement applied to every emitted vertex.
pub const CELL_PERTURB_STRENGTH: f32 = 4.0;
/// Vertical displacement applied to a cell center when its elevation is set.
pub const ELEVATION_PERTURB_STRENGTH: f32 = 1.5;
/// World-to-texture scale of the noise lookup.
pub const NOISE_SCALE: f32 = 0.003;

/// Stream bed depth, in elevation levels, relative to the cell.
pub const STREAM_BED_ELEVATION_OFFSET: f32 = -1.75;
/// River surface height, in elevation levels, relative to the cell.
pub const RIVER_SURFACE_ELEVATION_OFFSET: f32 = -0.5;

pub const CHUNK_SIZE_X: usize = 5;
pub const CHUNK_SIZE_Z: usize = 5;

/// Corner offsets of a pointy-top hexagon, clockwise from north.
///
/// The seventh entry repeats the first so `second_corner(NW)` needs no modulo.
const CORNERS: [Vec3; 7] = [
    Vec3::new(0.0, 0.0, OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(0.0, 0.0, -OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
    Vec3::new(0.0, 0.0, OUTER_RADIUS),
];

/// Height difference class between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexEdgeType {
    Flat,
    Slope,
    Cliff,
}

pub fn first_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index()]
}

pub fn second_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index() + 1]
}

pub fn first_solid_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index()] * SOLID_FACTOR
}

pub fn second_solid_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index() + 1] * SOLID_FACTOR
}

/// Midpoint of the solid edge facing `direction`, at inner-radius distance.
pub fn solid_edge_middle(direction: HexDirection) -> Vec3 {
    (CORNERS[direction.index()] + CORNERS[direction.index() + 1]) * (0.5 * SOLID_FACTOR)
}

/// Offset from a cell's solid edge to its neighbor's solid edge.
pub fn bridge(direction: HexDirection) -> Vec3 {
    (CORNERS[direction.index()] + CORNERS[direction.index() + 1]) * BLEND_FACTOR
}

/// Classifies the connection between two elevations.
pub fn edge_type(elevation1: i32, elevation2: i32) -> HexEdgeType {
    match (elevation2 - elevation1).abs() {
        0 => HexEdgeType::Flat,
        1 => HexEdgeType::Slope,
        _ => HexEdgeType::Cliff,
    }
}

/// Point on a terraced slope from `a` to `b`.
///
/// Horizontal progress is linear in `step`; height only changes on odd steps,
/// which turns the slope into alternating treads and risers.
pub fn terrace_lerp(a: Vec3, b: Vec3, step: i32) -> Vec3 {
    let h = step as f32 * HORIZONTAL_TERRACE_STEP_SIZE;
    let v = ((step + 1) / 2) as f32 * VERTICAL_TERRACE_STEP_SIZE;
    Vec3::new(
        a.x + (b.x - a.x) * h,
        a.y + (b.y - a.y) * v,
        a.z + (b.z - a.z) * h,
    )
}

/// Color on a terraced slope; blends on the horizontal factor only.
pub fn terrace_lerp_color(a: LinearRgba, b: LinearRgba, step: i32) -> LinearRgba {
    a.mix(&b, step as f32 * HORIZONTAL_TERRACE_STEP_SIZE)
}

/// Displaces a point in the XZ plane by the noise field. Height is untouched.
pub fn perturb(noise: &dyn NoiseSampler, position: Vec3) -> Vec3 {
    let sample = noise.sample(position);
    Vec3::new(
        position.x + math::unit_to_signed(sample.x) * CELL_PERTURB_STRENGTH,
        position.y,
        position.z + math::unit_to_signed(sample.z) * CELL_PERTURB_STRENGTH,
    )
}

/// Height offset added to a cell center at `position`.
pub fn elevation_perturbation(noise: &dyn NoiseSampler, position: Vec3) -> f32 {
    math::unit_to_signed(noise.sample(position).y) * ELEVATION_PERTURB_STRENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_source::UniformNoise;
    use bevy::prelude::Vec4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    // ── Corners ─────────────────────────────────────────────────────

    #[test]
    fn corners_lie_on_outer_radius() {
        for c in CORNERS {
            assert!((c.length() - OUTER_RADIUS).abs() < 1e-3);
        }
    }

    #[test]
    fn second_corner_is_next_first_corner() {
        for dir in HexDirection::ALL {
            assert!(approx(second_corner(dir), first_corner(dir.next())));
        }
    }

    #[test]
    fn solid_corners_are_scaled() {
        for dir in HexDirection::ALL {
            assert!(approx(first_solid_corner(dir), first_corner(dir) * 0.8));
            assert!(approx(second_solid_corner(dir), second_corner(dir) * 0.8));
        }
    }

    #[test]
    fn solid_edge_middle_sits_on_scaled_inner_radius() {
        for dir in HexDirection::ALL {
            let m = solid_edge_middle(dir);
            assert!((m.length() - INNER_RADIUS * SOLID_FACTOR).abs() < 1e-3);
        }
    }

    #[test]
    fn bridges_of_opposite_directions_cancel() {
        for dir in HexDirection::ALL {
            assert!(approx(bridge(dir) + bridge(dir.opposite()), Vec3::ZERO));
        }
    }

    #[test]
    fn two_bridges_span_the_gap_between_neighbors() {
        // Neighbor centers are two inner radii apart; both solid regions plus
        // the bridge make up that distance.
        let e = bridge(HexDirection::E).length();
        let solid = INNER_RADIUS * SOLID_FACTOR;
        assert!((2.0 * solid + e - 2.0 * INNER_RADIUS).abs() < 1e-3);
    }

    // ── Edge type ───────────────────────────────────────────────────

    #[test]
    fn edge_type_by_delta() {
        assert_eq!(edge_type(3, 3), HexEdgeType::Flat);
        assert_eq!(edge_type(3, 4), HexEdgeType::Slope);
        assert_eq!(edge_type(3, 5), HexEdgeType::Cliff);
        assert_eq!(edge_type(0, -7), HexEdgeType::Cliff);
    }

    #[test]
    fn edge_type_is_symmetric() {
        for a in -3..6 {
            for b in -3..6 {
                assert_eq!(edge_type(a, b), edge_type(b, a));
            }
        }
    }

    // ── Terraces ────────────────────────────────────────────────────

    #[test]
    fn terrace_endpoints_are_exact() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-4.0, 8.0, 6.5);
        assert!(approx(terrace_lerp(a, b, 0), a));
        assert!(approx(terrace_lerp(a, b, TERRACE_STEPS), b));
    }

    #[test]
    fn terrace_height_changes_only_on_odd_steps() {
        let a = Vec3::ZERO;
        let b = Vec3::new(5.0, 3.0, 0.0);
        let heights: Vec<f32> = (0..=TERRACE_STEPS).map(|s| terrace_lerp(a, b, s).y).collect();
        assert!((heights[1] - 1.0).abs() < 1e-5);
        assert!((heights[2] - heights[1]).abs() < 1e-6, "step 2 is a tread");
        assert!((heights[3] - 2.0).abs() < 1e-5);
        assert!((heights[4] - heights[3]).abs() < 1e-6, "step 4 is a tread");
    }

    #[test]
    fn terrace_horizontal_progress_is_linear() {
        let a = Vec3::ZERO;
        let b = Vec3::new(5.0, 3.0, 10.0);
        for s in 0..=TERRACE_STEPS {
            let p = terrace_lerp(a, b, s);
            assert!((p.x - s as f32).abs() < 1e-5);
            assert!((p.z - 2.0 * s as f32).abs() < 1e-5);
        }
    }

    #[test]
    fn terrace_color_endpoints_and_midpoints() {
        let a = LinearRgba::rgb(0.0, 0.0, 0.0);
        let b = LinearRgba::rgb(1.0, 0.5, 0.25);
        assert_eq!(terrace_lerp_color(a, b, 0), a);
        let end = terrace_lerp_color(a, b, TERRACE_STEPS);
        assert!((end.red - 1.0).abs() < 1e-6 && (end.blue - 0.25).abs() < 1e-6);
        let second = terrace_lerp_color(a, b, 2);
        assert!((second.red - 0.4).abs() < 1e-6, "colors follow the horizontal factor");
    }

    // ── Perturbation ────────────────────────────────────────────────

    #[test]
    fn neutral_noise_leaves_points_in_place() {
        let noise = UniformNoise::neutral();
        let p = Vec3::new(12.0, 7.0, -3.0);
        assert!(approx(perturb(&noise, p), p));
        assert_eq!(elevation_perturbation(&noise, p), 0.0);
    }

    #[test]
    fn perturb_never_changes_height() {
        let noise = UniformNoise(Vec4::new(1.0, 0.0, 0.0, 1.0));
        let p = Vec3::new(1.0, 9.0, 2.0);
        let q = perturb(&noise, p);
        assert_eq!(q.y, 9.0);
        assert!((q.x - (1.0 + CELL_PERTURB_STRENGTH)).abs() < 1e-6);
        assert!((q.z - (2.0 - CELL_PERTURB_STRENGTH)).abs() < 1e-6);
    }

    #[test]
    fn elevation_perturbation_uses_y_channel() {
        let noise = UniformNoise(Vec4::new(0.5, 1.0, 0.5, 0.5));
        assert!((elevation_perturbation(&noise, Vec3::ZERO) - ELEVATION_PERTURB_STRENGTH).abs() < 1e-6);
    }
}
