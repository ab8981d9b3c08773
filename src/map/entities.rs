use bevy::prelude::*;

use crate::coordinates::{HexCoordinates, HexDirection};
use crate::hex_grid::ChunkId;
use crate::mesh_buffer::MeshKind;

/// One of the two mesh entities of a chunk. `Mesh3d` is inserted on each
/// rebuild and removed while the chunk has no geometry of this kind.
#[derive(Component, Reflect, Debug, Clone, Copy)]
pub struct ChunkMesh {
    /// Chunk this mesh belongs to.
    pub chunk: ChunkId,
    /// Terrain or river.
    pub kind: MeshKind,
}

/// Shared material handles for chunk meshes.
#[derive(Resource)]
pub struct MapMaterials {
    /// Vertex-colored land surface.
    pub terrain: Handle<StandardMaterial>,
    /// Translucent water surface.
    pub river: Handle<StandardMaterial>,
}

/// Change requested for a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditAction {
    /// Repaint the cell.
    SetColor(Color),
    /// Move the cell to a new elevation level.
    SetElevation(i32),
    /// Start a river leaving the cell through the given edge.
    SetOutgoingRiver(HexDirection),
    /// Remove both river ends of the cell.
    RemoveRivers,
}

/// Edit message for external editor tools; applied once per frame before
/// dirty chunks are rebuilt.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CellEdit {
    /// Target cell.
    pub coordinates: HexCoordinates,
    /// What to change.
    pub action: EditAction,
}
