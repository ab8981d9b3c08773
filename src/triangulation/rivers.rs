//! Cell interiors of river cells and the water surface above them.

use bevy::prelude::{Vec2, Vec3};

use super::{EdgeVertices, Triangulator};
use crate::coordinates::HexDirection;
use crate::hex_grid::HexCell;
use crate::metrics::{self, INNER_TO_OUTER};

impl Triangulator<'_> {
    /// Interior wedge of a cell the river flows straight or around through.
    ///
    /// The center is split into a left and a right point whose placement
    /// depends on where the other river edge lies, which bends the channel
    /// through the cell.
    pub(super) fn triangulate_with_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: EdgeVertices,
    ) {
        let through = |d: HexDirection| cell.has_river_through_edge(d);
        let (center_l, center_r) = if through(direction.opposite()) {
            (
                center + metrics::first_solid_corner(direction.previous()) * 0.25,
                center + metrics::second_solid_corner(direction.next()) * 0.25,
            )
        } else if through(direction.next()) {
            (center, center.lerp(e.v5, 2.0 / 3.0))
        } else if through(direction.previous()) {
            (center.lerp(e.v1, 2.0 / 3.0), center)
        } else if through(direction.next2()) {
            (
                center,
                center + metrics::solid_edge_middle(direction.next()) * (0.5 * INNER_TO_OUTER),
            )
        } else if through(direction.previous2()) {
            (
                center + metrics::solid_edge_middle(direction.previous()) * (0.5 * INNER_TO_OUTER),
                center,
            )
        } else {
            (center, center)
        };

        let mut center = center_l.lerp(center_r, 0.5);
        let mut m = EdgeVertices::with_outer_step(
            center_l.lerp(e.v1, 0.5),
            center_r.lerp(e.v5, 0.5),
            1.0 / 6.0,
        );
        m.v3.y = e.v3.y;
        center.y = e.v3.y;

        let color = cell.color();
        self.triangulate_edge_strip(m, color, e, color);

        self.add_terrain_triangle(center_l, m.v1, m.v2);
        self.terrain.add_triangle_color(color);
        self.add_terrain_quad(center_l, center, m.v2, m.v3);
        self.terrain.add_quad_color(color, color);
        self.add_terrain_quad(center, center_r, m.v3, m.v4);
        self.terrain.add_quad_color(color, color);
        self.add_terrain_triangle(center_r, m.v4, m.v5);
        self.terrain.add_triangle_color(color);

        let reversed = cell.incoming_river() == Some(direction);
        let y = cell.river_surface_y();
        self.triangulate_river_quad([center_l, center_r, m.v2, m.v4], y, y, 0.4, reversed);
        self.triangulate_river_quad([m.v2, m.v4, e.v2, e.v4], y, y, 0.6, reversed);
    }

    /// Interior wedge of a river source or mouth, ending the water in a
    /// rounded cap at the cell center.
    pub(super) fn triangulate_with_river_begin_or_end(
        &mut self,
        cell: &HexCell,
        center: Vec3,
        e: EdgeVertices,
    ) {
        let mut m = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        m.v3.y = e.v3.y;

        let color = cell.color();
        self.triangulate_edge_strip(m, color, e, color);
        self.triangulate_edge_fan(center, m, color);

        let reversed = cell.has_incoming_river();
        let y = cell.river_surface_y();
        self.triangulate_river_quad([m.v2, m.v4, e.v2, e.v4], y, y, 0.6, reversed);

        let at_surface = |v: Vec3| Vec3::new(v.x, y, v.z);
        self.add_river_triangle(at_surface(center), at_surface(m.v2), at_surface(m.v4));
        if reversed {
            self.river
                .add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(1.0, 0.2), Vec2::new(0.0, 0.2));
        } else {
            self.river
                .add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(0.0, 0.6), Vec2::new(1.0, 0.6));
        }
    }

    /// Interior wedge of a river cell on an edge without water. The wedge
    /// center is pulled away from the channel so the banks stay clear of it.
    pub(super) fn triangulate_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        mut center: Vec3,
        e: EdgeVertices,
    ) {
        let through = |d: HexDirection| cell.has_river_through_edge(d);
        if through(direction.next()) {
            if through(direction.previous()) {
                center += metrics::solid_edge_middle(direction) * (INNER_TO_OUTER * 0.5);
            } else if through(direction.previous2()) {
                center += metrics::first_solid_corner(direction) * 0.25;
            }
        } else if through(direction.previous()) && through(direction.next2()) {
            center += metrics::second_solid_corner(direction) * 0.25;
        }

        let m = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        let color = cell.color();
        self.triangulate_edge_strip(m, color, e, color);
        self.triangulate_edge_fan(center, m, color);
    }

    /// Water quad whose near edge sits at `y1` and far edge at `y2`.
    ///
    /// UV `v` runs along the flow; `reversed` flips both axes for segments
    /// emitted against the flow direction.
    pub(super) fn triangulate_river_quad(
        &mut self,
        [mut v1, mut v2, mut v3, mut v4]: [Vec3; 4],
        y1: f32,
        y2: f32,
        v: f32,
        reversed: bool,
    ) {
        v1.y = y1;
        v2.y = y1;
        v3.y = y2;
        v4.y = y2;
        self.add_river_quad(v1, v2, v3, v4);
        if reversed {
            self.river.add_quad_uv(1.0, 0.0, 0.8 - v, 0.6 - v);
        } else {
            self.river.add_quad_uv(0.0, 1.0, v, v + 0.2);
        }
    }
}
