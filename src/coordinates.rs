//! Cube coordinates and the six edge directions of a pointy-top hex grid.
//!
//! Cells are addressed in three ways: offset `(col, row)` for dense storage,
//! cube `(x, y, z)` for neighbor arithmetic and display, and planar world
//! position for picking. Cube coordinates are stored as an axial [`Hex`]
//! (`hex.x` = cube x, `hex.y` = cube z); the cube y axis is always derived.

use std::fmt;

use bevy::prelude::{Vec2, Vec3};
use hexx::{Hex, HexLayout, HexOrientation, OffsetHexMode};

use crate::metrics::OUTER_RADIUS;

/// Largest absolute cube axis that offset and world conversions accept.
pub const MAX_AXIS: i32 = 1 << 29;

/// Pointy-top layout with the cell corner radius as hex size.
const LAYOUT: HexLayout = HexLayout::pointy().with_hex_size(OUTER_RADIUS);

/// One of the six edges of a hexagon, clockwise from north-east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexDirection {
    NE,
    E,
    SE,
    SW,
    W,
    NW,
}

impl HexDirection {
    /// All directions in triangulation order.
    pub const ALL: [HexDirection; 6] = [
        HexDirection::NE,
        HexDirection::E,
        HexDirection::SE,
        HexDirection::SW,
        HexDirection::W,
        HexDirection::NW,
    ];

    /// Slot of this direction in neighbor and corner tables (0..5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for a slot, wrapping modulo 6.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// The direction pointing back across the same edge.
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Next direction clockwise.
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// One step counter-clockwise.
    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    /// Two steps clockwise.
    pub const fn next2(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Two steps counter-clockwise.
    pub const fn previous2(self) -> Self {
        Self::from_index(self.index() + 4)
    }
}

/// Cube coordinate of a cell. Invariant: `x + y + z == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexCoordinates(Hex);

impl HexCoordinates {
    /// Builds a coordinate from the two stored cube axes.
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Hex::new(x, z))
    }

    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// Derived axis, always `-x - z`. Wraps for coordinates that are not
    /// addressable.
    pub const fn y(self) -> i32 {
        self.0.x.wrapping_neg().wrapping_sub(self.0.y)
    }

    pub const fn z(self) -> i32 {
        self.0.y
    }

    /// Converts offset `(col, row)` into cube coordinates.
    ///
    /// Odd rows are shifted half a cell to the right, so every second row
    /// moves the cube x origin one step left.
    pub const fn from_offset(col: i32, row: i32) -> Self {
        Self(Hex::from_offset_coordinates(
            [col, row],
            OffsetHexMode::Odd,
            HexOrientation::Pointy,
        ))
    }

    /// Inverse of [`HexCoordinates::from_offset`], returning `(col, row)`.
    ///
    /// `None` when an axis lies beyond [`MAX_AXIS`], where the row shift
    /// could overflow.
    pub const fn to_offset(self) -> Option<(i32, i32)> {
        if !self.is_addressable() {
            return None;
        }
        let [col, row] = self
            .0
            .to_offset_coordinates(OffsetHexMode::Odd, HexOrientation::Pointy);
        Some((col, row))
    }

    /// Both stored axes lie within `±MAX_AXIS`.
    pub const fn is_addressable(self) -> bool {
        self.0.x.unsigned_abs() <= MAX_AXIS as u32 && self.0.y.unsigned_abs() <= MAX_AXIS as u32
    }

    /// Planar world position of the cell center (`y` is always zero).
    pub fn to_position(self) -> Vec3 {
        let p = LAYOUT.hex_to_world_pos(self.0);
        Vec3::new(p.x, 0.0, p.y)
    }

    /// Finds the cell containing a planar world position.
    ///
    /// Fractional coordinates are cube-rounded by `hexx`. Returns `None` for
    /// non-finite positions and positions too far out to address.
    pub fn from_position(position: Vec3) -> Option<Self> {
        let fract = LAYOUT.world_pos_to_fract_hex(Vec2::new(position.x, position.z));
        if !fract.is_finite() || fract.abs().max_element() > MAX_AXIS as f32 {
            return None;
        }
        Some(Self(Hex::round(fract.to_array())))
    }

    /// Label text with one axis per line.
    pub fn to_string_on_separate_lines(self) -> String {
        format!("{}\n{}\n{}", self.x(), self.y(), self.z())
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}

impl From<HexCoordinates> for Hex {
    fn from(coordinates: HexCoordinates) -> Self {
        coordinates.0
    }
}

impl From<Hex> for HexCoordinates {
    fn from(hex: Hex) -> Self {
        Self(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::INNER_RADIUS;

    // ── HexDirection ────────────────────────────────────────────────

    #[test]
    fn opposite_is_three_steps_away() {
        assert_eq!(HexDirection::NE.opposite(), HexDirection::SW);
        assert_eq!(HexDirection::E.opposite(), HexDirection::W);
        assert_eq!(HexDirection::NW.opposite(), HexDirection::SE);
        for dir in HexDirection::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn next_and_previous_wrap_around() {
        assert_eq!(HexDirection::NW.next(), HexDirection::NE);
        assert_eq!(HexDirection::NE.previous(), HexDirection::NW);
        for dir in HexDirection::ALL {
            assert_eq!(dir.next().previous(), dir);
        }
    }

    #[test]
    fn double_steps_wrap_around() {
        assert_eq!(HexDirection::W.next2(), HexDirection::NE);
        assert_eq!(HexDirection::E.previous2(), HexDirection::W);
        for dir in HexDirection::ALL {
            assert_eq!(dir.next2(), dir.next().next());
            assert_eq!(dir.previous2(), dir.previous().previous());
        }
    }

    // ── Offset / cube conversion ────────────────────────────────────

    #[test]
    fn cube_axes_sum_to_zero() {
        for row in -6..6 {
            for col in -6..6 {
                let c = HexCoordinates::from_offset(col, row);
                assert_eq!(c.x() + c.y() + c.z(), 0, "invariant broken for {c}");
            }
        }
    }

    #[test]
    fn offset_roundtrip() {
        for row in 0..12 {
            for col in 0..12 {
                let c = HexCoordinates::from_offset(col, row);
                assert_eq!(c.to_offset(), Some((col, row)));
            }
        }
    }

    #[test]
    fn odd_rows_shift_cube_x() {
        assert_eq!(HexCoordinates::from_offset(3, 0), HexCoordinates::new(3, 0));
        assert_eq!(HexCoordinates::from_offset(3, 1), HexCoordinates::new(3, 1));
        assert_eq!(HexCoordinates::from_offset(3, 2), HexCoordinates::new(2, 2));
        assert_eq!(HexCoordinates::from_offset(3, 5), HexCoordinates::new(1, 5));
    }

    // ── World position ──────────────────────────────────────────────

    #[test]
    fn position_roundtrip() {
        for row in 0..10 {
            for col in 0..10 {
                let c = HexCoordinates::from_offset(col, row);
                assert_eq!(HexCoordinates::from_position(c.to_position()), Some(c));
            }
        }
    }

    #[test]
    fn points_inside_the_inner_circle_resolve_to_the_cell() {
        let c = HexCoordinates::from_offset(4, 3);
        let center = c.to_position();
        let r = INNER_RADIUS * 0.95;
        for i in 0..12 {
            let angle = i as f32 * std::f32::consts::TAU / 12.0;
            let p = center + Vec3::new(angle.cos() * r, 0.0, angle.sin() * r);
            assert_eq!(HexCoordinates::from_position(p), Some(c), "sample {i} escaped");
        }
    }

    #[test]
    fn rounding_fix_preserves_invariant() {
        // Points near a three-cell vertex produce inconsistent per-axis rounding.
        let p = Vec3::new(INNER_RADIUS, 0.0, OUTER_RADIUS * 0.5 - 0.01);
        let c = HexCoordinates::from_position(p).unwrap();
        assert_eq!(c.x() + c.y() + c.z(), 0);
    }

    #[test]
    fn centers_follow_the_pointy_row_spacing() {
        let step = HexCoordinates::new(1, 0).to_position();
        assert!((step.x - 2.0 * INNER_RADIUS).abs() < 1e-4);
        assert!(step.z.abs() < 1e-6);

        let row = HexCoordinates::new(0, 1).to_position();
        assert!((row.x - INNER_RADIUS).abs() < 1e-4);
        assert!((row.z - 1.5 * OUTER_RADIUS).abs() < 1e-4);
    }

    // ── Range limits ────────────────────────────────────────────────

    #[test]
    fn extreme_coordinates_have_no_offset() {
        assert_eq!(HexCoordinates::new(i32::MAX, 3).to_offset(), None);
        assert_eq!(HexCoordinates::new(3, i32::MIN).to_offset(), None);
        assert_eq!(HexCoordinates::new(MAX_AXIS + 1, 0).to_offset(), None);
        assert!(HexCoordinates::new(MAX_AXIS, -MAX_AXIS).to_offset().is_some());
    }

    #[test]
    fn extreme_coordinates_still_display() {
        let c = HexCoordinates::new(i32::MAX, 3);
        assert!(!c.is_addressable());
        assert!(!c.to_string().is_empty());
    }

    #[test]
    fn far_or_non_finite_positions_have_no_coordinates() {
        assert_eq!(HexCoordinates::from_position(Vec3::new(1e12, 0.0, 1e12)), None);
        assert_eq!(HexCoordinates::from_position(Vec3::new(-1e12, 0.0, 5.0)), None);
        assert_eq!(HexCoordinates::from_position(Vec3::new(f32::NAN, 0.0, 0.0)), None);
        assert_eq!(
            HexCoordinates::from_position(Vec3::new(0.0, 0.0, f32::INFINITY)),
            None
        );
    }

    // ── Display ─────────────────────────────────────────────────────

    #[test]
    fn display_lists_all_three_axes() {
        let c = HexCoordinates::new(2, -3);
        assert_eq!(c.to_string(), "(2, 1, -3)");
        assert_eq!(c.to_string_on_separate_lines(), "2\n1\n-3");
    }

    #[test]
    fn hex_conversion_roundtrip() {
        let c = HexCoordinates::new(-4, 7);
        let hex: Hex = c.into();
        assert_eq!(HexCoordinates::from(hex), c);
    }
}
