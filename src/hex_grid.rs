//! Cell graph: elevation, color, neighbor links and rivers for every cell.
//!
//! The grid owns all cells in one dense array and is the only writer of cell
//! state. Every mutation marks the chunks whose geometry it invalidates; the
//! triangulator reads the graph and never writes to it.

mod cell;
mod chunk;

pub use cell::{CellId, ChunkId, HexCell, RiverState, UNSET_ELEVATION};
pub use chunk::{DirtyChunks, HexGridChunk};

use bevy::color::LinearRgba;
use bevy::log::{debug, info};
use bevy::prelude::{Color, Reflect, Resource, Vec2, Vec3};

use crate::coordinates::{HexCoordinates, HexDirection};
use crate::metrics::{self, ELEVATION_STEP, HexEdgeType};
use crate::noise_source::NoiseSampler;

/// Grid dimensions and initial cell state.
#[derive(Clone, Debug, Reflect)]
pub struct GridSettings {
    /// Number of chunks along the x (column) axis.
    pub chunk_count_x: usize,
    /// Number of chunks along the z (row) axis.
    pub chunk_count_z: usize,
    /// Cells per chunk along x.
    pub chunk_size_x: usize,
    /// Cells per chunk along z.
    pub chunk_size_z: usize,
    /// Color every cell starts with.
    pub default_color: Color,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            chunk_count_x: 4,
            chunk_count_z: 3,
            chunk_size_x: metrics::CHUNK_SIZE_X,
            chunk_size_z: metrics::CHUNK_SIZE_Z,
            default_color: Color::WHITE,
        }
    }
}

/// Text overlay anchor published by each cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLabel {
    /// Planar `(x, z)` position of the cell center.
    pub anchor: Vec2,
    /// World height of the cell center.
    pub height: f32,
    /// Cube coordinates, one axis per line.
    pub text: String,
}

/// The whole map: cells, chunks, pending rebuilds and the noise source.
#[derive(Resource)]
pub struct HexGrid {
    cell_count_x: usize,
    cell_count_z: usize,
    chunk_count_x: usize,
    chunk_size_x: usize,
    chunk_size_z: usize,
    cells: Vec<HexCell>,
    chunks: Vec<HexGridChunk>,
    dirty: DirtyChunks,
    noise: Box<dyn NoiseSampler>,
}

impl HexGrid {
    /// Builds every chunk and cell, links neighbors and initializes each cell
    /// to elevation 0. All chunks start dirty.
    pub fn new(settings: &GridSettings, noise: Box<dyn NoiseSampler>) -> Self {
        let chunk_size_x = settings.chunk_size_x.max(1);
        let chunk_size_z = settings.chunk_size_z.max(1);
        let mut grid = Self {
            cell_count_x: settings.chunk_count_x * chunk_size_x,
            cell_count_z: settings.chunk_count_z * chunk_size_z,
            chunk_count_x: settings.chunk_count_x,
            chunk_size_x,
            chunk_size_z,
            cells: Vec::new(),
            chunks: Vec::new(),
            dirty: DirtyChunks::default(),
            noise,
        };

        for z in 0..settings.chunk_count_z {
            for x in 0..settings.chunk_count_x {
                grid.chunks
                    .push(HexGridChunk::new((x, z), chunk_size_x * chunk_size_z));
            }
        }

        let default_color = settings.default_color.to_linear();
        grid.cells.reserve(grid.cell_count_x * grid.cell_count_z);
        for z in 0..grid.cell_count_z {
            for x in 0..grid.cell_count_x {
                grid.create_cell(x, z, default_color);
            }
        }

        info!(
            "built hex grid: {}x{} cells in {} chunks",
            grid.cell_count_x,
            grid.cell_count_z,
            grid.chunks.len()
        );
        grid
    }

    fn create_cell(&mut self, x: usize, z: usize, color: LinearRgba) {
        let id = self.cells.len();
        let chunk = (x / self.chunk_size_x) + (z / self.chunk_size_z) * self.chunk_count_x;
        let coordinates = HexCoordinates::from_offset(x as i32, z as i32);
        self.cells.push(HexCell::new(coordinates, chunk, color));
        self.chunks[chunk].cells.push(id);

        let row = self.cell_count_x;
        if x > 0 {
            self.set_neighbor(id, HexDirection::W, id - 1);
        }
        if z > 0 {
            if z % 2 == 0 {
                self.set_neighbor(id, HexDirection::SE, id - row);
                if x > 0 {
                    self.set_neighbor(id, HexDirection::SW, id - row - 1);
                }
            } else {
                self.set_neighbor(id, HexDirection::SW, id - row);
                if x + 1 < self.cell_count_x {
                    self.set_neighbor(id, HexDirection::SE, id - row + 1);
                }
            }
        }

        self.set_elevation(id, 0);
    }

    // ── Lookup ─────────────────────────────────────────────────────

    pub fn cell_count_x(&self) -> usize {
        self.cell_count_x
    }

    pub fn cell_count_z(&self) -> usize {
        self.cell_count_z
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Cell by id. Ids come from this grid, so out-of-range ids panic.
    pub fn cell(&self, id: CellId) -> &HexCell {
        &self.cells[id]
    }

    pub fn neighbor(&self, id: CellId, direction: HexDirection) -> Option<CellId> {
        self.cells[id].neighbor(direction)
    }

    pub fn chunks(&self) -> &[HexGridChunk] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&HexGridChunk> {
        self.chunks.get(id)
    }

    pub fn noise(&self) -> &dyn NoiseSampler {
        self.noise.as_ref()
    }

    /// Cell at offset `(col, row)`, or `None` outside the grid.
    pub fn cell_at_offset(&self, col: i32, row: i32) -> Option<CellId> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.cell_count_x && row < self.cell_count_z).then_some(col + row * self.cell_count_x)
    }

    /// Cell with the given cube coordinates, or `None` outside the grid.
    pub fn cell_at_coordinates(&self, coordinates: HexCoordinates) -> Option<CellId> {
        let (col, row) = coordinates.to_offset()?;
        self.cell_at_offset(col, row)
    }

    /// Cell under a world position (only `x` and `z` are used).
    pub fn cell_at_position(&self, position: Vec3) -> Option<CellId> {
        self.cell_at_coordinates(HexCoordinates::from_position(position)?)
    }

    /// World position of a cell center: planar position at the cell height.
    pub fn cell_position(&self, id: CellId) -> Vec3 {
        let cell = &self.cells[id];
        let mut position = cell.coordinates.to_position();
        position.y = cell.height;
        position
    }

    pub fn cell_label(&self, id: CellId) -> CellLabel {
        let position = self.cell_position(id);
        CellLabel {
            anchor: Vec2::new(position.x, position.z),
            height: position.y,
            text: self.cells[id].coordinates.to_string_on_separate_lines(),
        }
    }

    pub fn edge_type(&self, a: CellId, b: CellId) -> HexEdgeType {
        self.cells[a].edge_type_to(&self.cells[b])
    }

    // ── Dirty tracking ─────────────────────────────────────────────

    pub fn is_dirty(&self, chunk: ChunkId) -> bool {
        self.dirty.contains(chunk)
    }

    pub fn dirty_chunk_count(&self) -> usize {
        self.dirty.len()
    }

    /// Drains the dirty set; each chunk appears at most once.
    pub fn take_dirty_chunks(&mut self) -> Vec<ChunkId> {
        self.dirty.drain()
    }

    /// Marks the cell's chunk and every neighbor chunk that differs from it.
    fn refresh(&mut self, id: CellId) {
        let chunk = self.cells[id].chunk;
        self.dirty.mark(chunk);
        for neighbor in self.cells[id].neighbors.into_iter().flatten() {
            let neighbor_chunk = self.cells[neighbor].chunk;
            if neighbor_chunk != chunk {
                self.dirty.mark(neighbor_chunk);
            }
        }
    }

    fn refresh_self_only(&mut self, id: CellId) {
        self.dirty.mark(self.cells[id].chunk);
    }

    // ── Mutation ───────────────────────────────────────────────────

    /// Links `id` and `other` across `direction` in both directions.
    ///
    /// # Panics
    ///
    /// If either cell is already linked to a different cell across that edge.
    pub fn set_neighbor(&mut self, id: CellId, direction: HexDirection, other: CellId) {
        assert!(
            self.cells[id].neighbor(direction).is_none_or(|n| n == other),
            "cell {id} already has a different {direction:?} neighbor"
        );
        assert!(
            self.cells[other]
                .neighbor(direction.opposite())
                .is_none_or(|n| n == id),
            "cell {other} already has a different {:?} neighbor",
            direction.opposite()
        );
        self.cells[id].neighbors[direction.index()] = Some(other);
        self.cells[other].neighbors[direction.opposite().index()] = Some(id);
    }

    /// Changes a cell's elevation and drops rivers that would now flow uphill.
    pub fn set_elevation(&mut self, id: CellId, elevation: i32) {
        if self.cells[id].elevation == elevation {
            return;
        }

        let planar = self.cells[id].coordinates.to_position();
        let perturbation = metrics::elevation_perturbation(self.noise.as_ref(), planar);
        let cell = &mut self.cells[id];
        cell.elevation = elevation;
        cell.height = elevation as f32 * ELEVATION_STEP + perturbation;

        if let Some(direction) = self.cells[id].outgoing_river()
            && let Some(downstream) = self.neighbor(id, direction)
            && elevation < self.cells[downstream].elevation
        {
            self.remove_outgoing_river(id);
        }
        if let Some(direction) = self.cells[id].incoming_river()
            && let Some(upstream) = self.neighbor(id, direction)
            && elevation > self.cells[upstream].elevation
        {
            self.remove_incoming_river(id);
        }

        self.refresh(id);
    }

    pub fn set_color(&mut self, id: CellId, color: LinearRgba) {
        if self.cells[id].color == color {
            return;
        }
        self.cells[id].color = color;
        self.refresh(id);
    }

    /// Removes the river leaving `id` and the matching incoming end downstream.
    pub fn remove_outgoing_river(&mut self, id: CellId) {
        let Some(direction) = self.cells[id].river.outgoing.take() else {
            return;
        };
        self.refresh_self_only(id);

        if let Some(downstream) = self.neighbor(id, direction) {
            self.cells[downstream].river.incoming = None;
            self.refresh_self_only(downstream);
        }
    }

    /// Removes the river entering `id` and the matching outgoing end upstream.
    pub fn remove_incoming_river(&mut self, id: CellId) {
        let Some(direction) = self.cells[id].river.incoming.take() else {
            return;
        };
        self.refresh_self_only(id);

        if let Some(upstream) = self.neighbor(id, direction) {
            self.cells[upstream].river.outgoing = None;
            self.refresh_self_only(upstream);
        }
    }

    pub fn remove_river(&mut self, id: CellId) {
        self.remove_outgoing_river(id);
        self.remove_incoming_river(id);
    }

    /// Starts a river flowing out of `id` through `direction`.
    ///
    /// Does nothing when there is no neighbor in that direction or the
    /// neighbor is higher. Existing rivers that conflict with the new one are
    /// removed first, on both cells.
    pub fn set_outgoing_river(&mut self, id: CellId, direction: HexDirection) {
        if self.cells[id].outgoing_river() == Some(direction) {
            return;
        }

        let Some(neighbor) = self.neighbor(id, direction) else {
            debug!("river from cell {id} rejected: no {direction:?} neighbor");
            return;
        };
        if self.cells[id].elevation < self.cells[neighbor].elevation {
            debug!("river from cell {id} rejected: {direction:?} neighbor {neighbor} is higher");
            return;
        }

        self.remove_outgoing_river(id);
        if self.cells[id].incoming_river() == Some(direction) {
            self.remove_incoming_river(id);
        }
        self.cells[id].river.outgoing = Some(direction);
        self.refresh_self_only(id);

        self.remove_incoming_river(neighbor);
        self.cells[neighbor].river.incoming = Some(direction.opposite());
        self.refresh_self_only(neighbor);
    }
}
