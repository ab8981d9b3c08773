//! Triangles filling the gap where three cells meet.

use bevy::color::{LinearRgba, Mix};
use bevy::prelude::Vec3;

use super::{CornerVertex, Triangulator};
use crate::hex_grid::HexCell;
use crate::metrics::{self, HexEdgeType, TERRACE_STEPS};

impl Triangulator<'_> {
    /// `bottom` is the lowest of the three cells; `left` and `right` follow
    /// it clockwise.
    pub(super) fn triangulate_corner(
        &mut self,
        bottom: CornerVertex<'_>,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
    ) {
        let left_edge = bottom.cell.edge_type_to(left.cell);
        let right_edge = bottom.cell.edge_type_to(right.cell);

        match (left_edge, right_edge) {
            (HexEdgeType::Slope, HexEdgeType::Slope) => {
                self.triangulate_corner_terraces(bottom, left, right)
            }
            (HexEdgeType::Slope, HexEdgeType::Flat) => {
                self.triangulate_corner_terraces(left, right, bottom)
            }
            (HexEdgeType::Slope, HexEdgeType::Cliff) => {
                self.triangulate_corner_terraces_cliff(bottom, left, right)
            }
            (HexEdgeType::Flat, HexEdgeType::Slope) => {
                self.triangulate_corner_terraces(right, bottom, left)
            }
            (HexEdgeType::Cliff, HexEdgeType::Slope) => {
                self.triangulate_corner_cliff_terraces(bottom, left, right)
            }
            _ if left.cell.edge_type_to(right.cell) == HexEdgeType::Slope => {
                if left.cell.elevation() < right.cell.elevation() {
                    self.triangulate_corner_cliff_terraces(right, bottom, left);
                } else {
                    self.triangulate_corner_terraces_cliff(left, right, bottom);
                }
            }
            _ => {
                self.add_terrain_triangle(bottom.point, left.point, right.point);
                self.terrain
                    .add_triangle_colors(bottom.cell.color(), left.cell.color(), right.cell.color());
                self.stats.flat_corners += 1;
            }
        }
    }

    /// Terraces running from `begin` up to both `left` and `right`.
    fn triangulate_corner_terraces(
        &mut self,
        begin: CornerVertex<'_>,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
    ) {
        let mut v3 = metrics::terrace_lerp(begin.point, left.point, 1);
        let mut v4 = metrics::terrace_lerp(begin.point, right.point, 1);
        let mut c3 = metrics::terrace_lerp_color(begin.cell.color(), left.cell.color(), 1);
        let mut c4 = metrics::terrace_lerp_color(begin.cell.color(), right.cell.color(), 1);

        self.add_terrain_triangle(begin.point, v3, v4);
        self.terrain.add_triangle_colors(begin.cell.color(), c3, c4);

        for step in 2..TERRACE_STEPS {
            let (v1, v2, c1, c2) = (v3, v4, c3, c4);
            v3 = metrics::terrace_lerp(begin.point, left.point, step);
            v4 = metrics::terrace_lerp(begin.point, right.point, step);
            c3 = metrics::terrace_lerp_color(begin.cell.color(), left.cell.color(), step);
            c4 = metrics::terrace_lerp_color(begin.cell.color(), right.cell.color(), step);
            self.add_terrain_quad(v1, v2, v3, v4);
            self.terrain.add_quad_colors(c1, c2, c3, c4);
        }

        self.add_terrain_quad(v3, v4, left.point, right.point);
        self.terrain
            .add_quad_colors(c3, c4, left.cell.color(), right.cell.color());
        self.stats.terraced_corners += 1;
    }

    /// Terraces from `begin` to `left`, a cliff from `begin` to `right`.
    fn triangulate_corner_terraces_cliff(
        &mut self,
        begin: CornerVertex<'_>,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
    ) {
        let b = cliff_boundary_factor(begin.cell, right.cell);
        let boundary = self.perturb(begin.point).lerp(self.perturb(right.point), b);
        let boundary_color = begin.cell.color().mix(&right.cell.color(), b);

        self.triangulate_boundary_triangle(begin, left, boundary, boundary_color);
        self.close_cliff_corner(left, right, boundary, boundary_color);
    }

    /// Mirror of [`Self::triangulate_corner_terraces_cliff`]: the cliff is on
    /// the left side and the terraces on the right.
    fn triangulate_corner_cliff_terraces(
        &mut self,
        begin: CornerVertex<'_>,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
    ) {
        let b = cliff_boundary_factor(begin.cell, left.cell);
        let boundary = self.perturb(begin.point).lerp(self.perturb(left.point), b);
        let boundary_color = begin.cell.color().mix(&left.cell.color(), b);

        self.triangulate_boundary_triangle(right, begin, boundary, boundary_color);
        self.close_cliff_corner(left, right, boundary, boundary_color);
    }

    /// Fills the top of a cliff corner, between `left`, `right` and the
    /// boundary point.
    fn close_cliff_corner(
        &mut self,
        left: CornerVertex<'_>,
        right: CornerVertex<'_>,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        if left.cell.edge_type_to(right.cell) == HexEdgeType::Slope {
            self.triangulate_boundary_triangle(left, right, boundary, boundary_color);
        } else {
            let (l, r) = (self.perturb(left.point), self.perturb(right.point));
            self.add_terrain_triangle_unperturbed(l, r, boundary);
            self.terrain
                .add_triangle_colors(left.cell.color(), right.cell.color(), boundary_color);
        }
        self.stats.boundary_points.push(boundary);
        self.stats.cliff_corners += 1;
    }

    /// Terraced fan from the `begin`-`left` slope collapsing onto `boundary`.
    ///
    /// The slope points are perturbed here and the boundary point is used as
    /// is, so the fan lines up with the straight cliff edge.
    fn triangulate_boundary_triangle(
        &mut self,
        begin: CornerVertex<'_>,
        left: CornerVertex<'_>,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        let mut v2 = self.perturb(metrics::terrace_lerp(begin.point, left.point, 1));
        let mut c2 = metrics::terrace_lerp_color(begin.cell.color(), left.cell.color(), 1);

        let start = self.perturb(begin.point);
        self.add_terrain_triangle_unperturbed(start, v2, boundary);
        self.terrain.add_triangle_colors(begin.cell.color(), c2, boundary_color);

        for step in 2..TERRACE_STEPS {
            let (v1, c1) = (v2, c2);
            v2 = self.perturb(metrics::terrace_lerp(begin.point, left.point, step));
            c2 = metrics::terrace_lerp_color(begin.cell.color(), left.cell.color(), step);
            self.add_terrain_triangle_unperturbed(v1, v2, boundary);
            self.terrain.add_triangle_colors(c1, c2, boundary_color);
        }

        let end = self.perturb(left.point);
        self.add_terrain_triangle_unperturbed(v2, end, boundary);
        self.terrain.add_triangle_colors(c2, left.cell.color(), boundary_color);
    }
}

/// Fraction of the way up a cliff where the terraces of the slope beside it
/// converge.
fn cliff_boundary_factor(low: &HexCell, high: &HexCell) -> f32 {
    let delta = (high.elevation() - low.elevation()).abs();
    assert!(delta != 0, "cliff boundary between cells of equal elevation");
    1.0 / delta as f32
}
