use bevy::color::LinearRgba;

use crate::coordinates::HexDirection;
use crate::coordinates::HexCoordinates;
use crate::metrics::{self, ELEVATION_STEP, HexEdgeType};

/// Dense index of a cell inside [`super::HexGrid`].
pub type CellId = usize;

/// Dense index of a chunk inside [`super::HexGrid`].
pub type ChunkId = usize;

/// Elevation of a cell that has not been initialized yet.
pub const UNSET_ELEVATION: i32 = i32::MIN;

/// River flow through a cell: at most one edge in, at most one edge out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiverState {
    /// Edge the river enters through.
    pub incoming: Option<HexDirection>,
    /// Edge the river leaves through.
    pub outgoing: Option<HexDirection>,
}

/// One node of the cell graph.
///
/// Neighbor and chunk links are plain indices into the owning grid; the grid
/// owns every cell and is the only writer.
#[derive(Debug, Clone)]
pub struct HexCell {
    pub(super) coordinates: HexCoordinates,
    pub(super) elevation: i32,
    pub(super) height: f32,
    pub(super) color: LinearRgba,
    pub(super) neighbors: [Option<CellId>; 6],
    pub(super) river: RiverState,
    pub(super) chunk: ChunkId,
}

impl HexCell {
    pub(super) fn new(coordinates: HexCoordinates, chunk: ChunkId, color: LinearRgba) -> Self {
        Self {
            coordinates,
            elevation: UNSET_ELEVATION,
            height: 0.0,
            color,
            neighbors: [None; 6],
            river: RiverState::default(),
            chunk,
        }
    }

    pub fn coordinates(&self) -> HexCoordinates {
        self.coordinates
    }

    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    /// World height of the cell center, including elevation perturbation.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn color(&self) -> LinearRgba {
        self.color
    }

    pub fn chunk(&self) -> ChunkId {
        self.chunk
    }

    pub fn neighbor(&self, direction: HexDirection) -> Option<CellId> {
        self.neighbors[direction.index()]
    }

    pub fn river(&self) -> RiverState {
        self.river
    }

    pub fn has_incoming_river(&self) -> bool {
        self.river.incoming.is_some()
    }

    pub fn has_outgoing_river(&self) -> bool {
        self.river.outgoing.is_some()
    }

    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.river.incoming
    }

    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.river.outgoing
    }

    pub fn has_river(&self) -> bool {
        self.has_incoming_river() || self.has_outgoing_river()
    }

    /// True for a river source or mouth: exactly one end of the river is here.
    pub fn has_river_begin_or_end(&self) -> bool {
        self.has_incoming_river() != self.has_outgoing_river()
    }

    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.river.incoming == Some(direction) || self.river.outgoing == Some(direction)
    }

    /// Height of the channel floor carved under a river.
    pub fn stream_bed_y(&self) -> f32 {
        (self.elevation as f32 + metrics::STREAM_BED_ELEVATION_OFFSET) * ELEVATION_STEP
    }

    /// Height of the water surface, between the stream bed and the cell top.
    pub fn river_surface_y(&self) -> f32 {
        (self.elevation as f32 + metrics::RIVER_SURFACE_ELEVATION_OFFSET) * ELEVATION_STEP
    }

    pub fn edge_type_to(&self, other: &HexCell) -> HexEdgeType {
        metrics::edge_type(self.elevation, other.elevation)
    }
}
