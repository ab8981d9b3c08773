//! Turns the cell graph of one chunk into terrain and river geometry.
//!
//! Every cell is walked direction by direction. Each direction emits the
//! solid interior wedge of the cell; the `NE`, `E` and `SE` directions also
//! emit the bridge to the neighbor, and `NE` and `E` the triangular corner
//! between three cells. The other three directions belong to the neighbors,
//! so every shared region is emitted exactly once.

mod corners;
mod edge_vertices;
mod rivers;

pub use edge_vertices::EdgeVertices;

use bevy::color::LinearRgba;
use bevy::prelude::Vec3;

use crate::coordinates::HexDirection;
use crate::hex_grid::{CellId, ChunkId, HexCell, HexGrid};
use crate::mesh_buffer::HexMeshBuffer;
use crate::metrics::{self, HexEdgeType, TERRACE_STEPS};

/// Summary of one chunk rebuild.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangulationStats {
    pub cells: usize,
    /// Corners between three cells drawn as a single flat triangle.
    pub flat_corners: usize,
    /// Corners filled with terraces on both sides.
    pub terraced_corners: usize,
    /// Corners where terraces meet a cliff.
    pub cliff_corners: usize,
    /// Cliff boundary points, in emission order.
    pub boundary_points: Vec<Vec3>,
}

/// A corner point together with the cell it belongs to.
#[derive(Clone, Copy)]
struct CornerVertex<'c> {
    point: Vec3,
    cell: &'c HexCell,
}

/// Writes the geometry of a chunk into a terrain and a river buffer.
pub struct Triangulator<'a> {
    grid: &'a HexGrid,
    terrain: &'a mut HexMeshBuffer,
    river: &'a mut HexMeshBuffer,
    stats: TriangulationStats,
}

impl<'a> Triangulator<'a> {
    pub fn new(grid: &'a HexGrid, terrain: &'a mut HexMeshBuffer, river: &'a mut HexMeshBuffer) -> Self {
        Self {
            grid,
            terrain,
            river,
            stats: TriangulationStats::default(),
        }
    }

    /// Clears both buffers and fills them with every cell of `chunk`.
    ///
    /// Unknown chunk ids leave the buffers empty.
    pub fn triangulate_chunk(mut self, chunk: ChunkId) -> TriangulationStats {
        self.terrain.clear();
        self.river.clear();

        let grid = self.grid;
        if let Some(chunk) = grid.chunk(chunk) {
            for &cell in chunk.cells() {
                self.triangulate_cell(cell);
            }
        }
        self.stats
    }

    fn triangulate_cell(&mut self, id: CellId) {
        for direction in HexDirection::ALL {
            self.triangulate_direction(direction, id);
        }
        self.stats.cells += 1;
    }

    fn triangulate_direction(&mut self, direction: HexDirection, id: CellId) {
        let grid = self.grid;
        let cell = grid.cell(id);
        let center = grid.cell_position(id);
        let mut e = EdgeVertices::new(
            center + metrics::first_solid_corner(direction),
            center + metrics::second_solid_corner(direction),
        );

        if cell.has_river() {
            if cell.has_river_through_edge(direction) {
                e.v3.y = cell.stream_bed_y();
                if cell.has_river_begin_or_end() {
                    self.triangulate_with_river_begin_or_end(cell, center, e);
                } else {
                    self.triangulate_with_river(direction, cell, center, e);
                }
            } else {
                self.triangulate_adjacent_to_river(direction, cell, center, e);
            }
        } else {
            self.triangulate_edge_fan(center, e, cell.color());
        }

        if matches!(direction, HexDirection::NE | HexDirection::E | HexDirection::SE)
            && let Some(neighbor) = cell.neighbor(direction)
        {
            self.triangulate_connection(direction, cell, grid.cell(neighbor), e);
        }
    }

    /// Bridge between `cell` and `neighbor`, then the corner shared with the
    /// next neighbor clockwise.
    fn triangulate_connection(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        neighbor: &HexCell,
        e1: EdgeVertices,
    ) {
        let mut bridge = metrics::bridge(direction);
        bridge.y = neighbor.height() - cell.height();
        let mut e2 = EdgeVertices::new(e1.v1 + bridge, e1.v5 + bridge);

        if cell.has_river_through_edge(direction) {
            e2.v3.y = neighbor.stream_bed_y();
            self.triangulate_river_quad(
                [e1.v2, e1.v4, e2.v2, e2.v4],
                cell.river_surface_y(),
                neighbor.river_surface_y(),
                0.8,
                cell.incoming_river() == Some(direction),
            );
        }

        if cell.edge_type_to(neighbor) == HexEdgeType::Slope {
            self.triangulate_edge_terraces(e1, cell, e2, neighbor);
        } else {
            self.triangulate_edge_strip(e1, cell.color(), e2, neighbor.color());
        }

        if !matches!(direction, HexDirection::NE | HexDirection::E) {
            return;
        }
        let grid = self.grid;
        let Some(next) = cell.neighbor(direction.next()).map(|id| grid.cell(id)) else {
            return;
        };

        let mut v5 = e1.v5 + metrics::bridge(direction.next());
        v5.y = next.height();

        let this = CornerVertex { point: e1.v5, cell };
        let across = CornerVertex { point: e2.v5, cell: neighbor };
        let next = CornerVertex { point: v5, cell: next };

        // Rotate so the lowest cell comes first, keeping clockwise order.
        if cell.elevation() <= neighbor.elevation() {
            if cell.elevation() <= next.cell.elevation() {
                self.triangulate_corner(this, across, next);
            } else {
                self.triangulate_corner(next, this, across);
            }
        } else if neighbor.elevation() <= next.cell.elevation() {
            self.triangulate_corner(across, next, this);
        } else {
            self.triangulate_corner(next, this, across);
        }
    }

    // ── Shared strips ──────────────────────────────────────────────

    fn triangulate_edge_fan(&mut self, center: Vec3, edge: EdgeVertices, color: LinearRgba) {
        for (a, b) in edge.segments() {
            self.add_terrain_triangle(center, a, b);
            self.terrain.add_triangle_color(color);
        }
    }

    fn triangulate_edge_strip(
        &mut self,
        e1: EdgeVertices,
        c1: LinearRgba,
        e2: EdgeVertices,
        c2: LinearRgba,
    ) {
        for ((a1, a2), (b1, b2)) in e1.segments().into_iter().zip(e2.segments()) {
            self.add_terrain_quad(a1, a2, b1, b2);
            self.terrain.add_quad_color(c1, c2);
        }
    }

    fn triangulate_edge_terraces(
        &mut self,
        begin: EdgeVertices,
        begin_cell: &HexCell,
        end: EdgeVertices,
        end_cell: &HexCell,
    ) {
        let mut e2 = EdgeVertices::terrace_lerp(begin, end, 1);
        let mut c2 = metrics::terrace_lerp_color(begin_cell.color(), end_cell.color(), 1);
        self.triangulate_edge_strip(begin, begin_cell.color(), e2, c2);

        for step in 2..TERRACE_STEPS {
            let (e1, c1) = (e2, c2);
            e2 = EdgeVertices::terrace_lerp(begin, end, step);
            c2 = metrics::terrace_lerp_color(begin_cell.color(), end_cell.color(), step);
            self.triangulate_edge_strip(e1, c1, e2, c2);
        }

        self.triangulate_edge_strip(e2, c2, end, end_cell.color());
    }

    // ── Emission ───────────────────────────────────────────────────

    fn perturb(&self, position: Vec3) -> Vec3 {
        metrics::perturb(self.grid.noise(), position)
    }

    fn add_terrain_triangle(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let noise = self.grid.noise();
        self.terrain.add_triangle(
            metrics::perturb(noise, v1),
            metrics::perturb(noise, v2),
            metrics::perturb(noise, v3),
        );
    }

    /// Adds points exactly as given; callers perturb them first.
    fn add_terrain_triangle_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        self.terrain.add_triangle(v1, v2, v3);
    }

    fn add_terrain_quad(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let noise = self.grid.noise();
        self.terrain.add_quad(
            metrics::perturb(noise, v1),
            metrics::perturb(noise, v2),
            metrics::perturb(noise, v3),
            metrics::perturb(noise, v4),
        );
    }

    fn add_river_triangle(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let noise = self.grid.noise();
        self.river.add_triangle(
            metrics::perturb(noise, v1),
            metrics::perturb(noise, v2),
            metrics::perturb(noise, v3),
        );
    }

    fn add_river_quad(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let noise = self.grid.noise();
        self.river.add_quad(
            metrics::perturb(noise, v1),
            metrics::perturb(noise, v2),
            metrics::perturb(noise, v3),
            metrics::perturb(noise, v4),
        );
    }
}
