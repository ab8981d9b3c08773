use bevy::log::debug;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use bevy_egui::egui;

use super::entities::{CellEdit, ChunkMesh, EditAction};
use crate::hex_grid::{ChunkId, HexGrid};
use crate::mesh_buffer::{MeshBufferPool, MeshKind};
use crate::triangulation::Triangulator;
use crate::visuals::MapCamera;

/// Labels farther than this from the camera are skipped.
const LABEL_DISTANCE: f32 = 120.0;

// ── Editing ────────────────────────────────────────────────────────

/// Applies every pending [`CellEdit`] to the grid.
pub fn apply_cell_edits(mut edits: MessageReader<CellEdit>, grid: Option<ResMut<HexGrid>>) {
    let Some(mut grid) = grid else {
        return;
    };
    for edit in edits.read() {
        apply_edit(&mut grid, edit);
    }
}

/// Applies one edit. Returns `false` when the target cell is outside the grid.
pub fn apply_edit(grid: &mut HexGrid, edit: &CellEdit) -> bool {
    let Some(id) = grid.cell_at_coordinates(edit.coordinates) else {
        debug!("edit ignored: no cell at {}", edit.coordinates);
        return false;
    };
    match edit.action {
        EditAction::SetColor(color) => grid.set_color(id, color.to_linear()),
        EditAction::SetElevation(elevation) => grid.set_elevation(id, elevation),
        EditAction::SetOutgoingRiver(direction) => grid.set_outgoing_river(id, direction),
        EditAction::RemoveRivers => grid.remove_river(id),
    }
    true
}

// ── Chunk rebuild ──────────────────────────────────────────────────

/// Drains the dirty set, triangulates each dirty chunk once and publishes the
/// results on the chunk's mesh entities.
pub fn refresh_dirty_chunks(
    mut commands: Commands,
    grid: Option<ResMut<HexGrid>>,
    mut pool: ResMut<MeshBufferPool>,
    mut meshes: ResMut<Assets<Mesh>>,
    chunk_meshes: Query<(Entity, &ChunkMesh)>,
) {
    let Some(mut grid) = grid else {
        return;
    };
    if grid.dirty_chunk_count() == 0 {
        return;
    }

    let dirty = grid.take_dirty_chunks();
    let mut published: HashMap<(ChunkId, MeshKind), Option<Handle<Mesh>>> = HashMap::new();

    for chunk in dirty {
        let mut terrain = pool.checkout(MeshKind::Terrain);
        let mut river = pool.checkout(MeshKind::River);
        let stats = Triangulator::new(&grid, &mut terrain, &mut river).triangulate_chunk(chunk);
        debug!(
            "rebuilt chunk {chunk}: {} terrain / {} river triangles, corners {} flat {} terraced {} cliff",
            terrain.triangle_count(),
            river.triangle_count(),
            stats.flat_corners,
            stats.terraced_corners,
            stats.cliff_corners,
        );

        for buffer in [terrain, river] {
            let handle = (!buffer.is_empty()).then(|| meshes.add(buffer.to_mesh()));
            published.insert((chunk, buffer.kind()), handle);
            pool.give_back(buffer);
        }
    }

    for (entity, chunk_mesh) in &chunk_meshes {
        let Some(handle) = published.remove(&(chunk_mesh.chunk, chunk_mesh.kind)) else {
            continue;
        };
        match handle {
            Some(handle) => {
                commands.entity(entity).insert(Mesh3d(handle));
            }
            None => {
                commands.entity(entity).remove::<Mesh3d>();
            }
        }
    }
}

// ── Labels ─────────────────────────────────────────────────────────

/// Draws the cube coordinates of each cell near the camera as a
/// screen-projected egui label.
pub fn draw_hex_labels(
    mut egui_ctx: Query<&mut bevy_egui::EguiContext>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
    grid: Option<Res<HexGrid>>,
    mut ready: Local<bool>,
) {
    if !*ready {
        *ready = true;
        return;
    }
    let Some(grid) = grid else {
        return;
    };
    let Ok((camera, cam_gt)) = camera_q.single() else {
        return;
    };
    let Ok(mut ctx) = egui_ctx.single_mut() else {
        return;
    };
    let cam_pos = cam_gt.translation();

    let painter = ctx.get_mut().layer_painter(egui::LayerId::background());

    for id in 0..grid.cells().len() {
        let label = grid.cell_label(id);
        let world_pos = Vec3::new(label.anchor.x, label.height, label.anchor.y);
        if cam_pos.distance(world_pos) > LABEL_DISTANCE {
            continue;
        }
        if let Ok(viewport) = camera.world_to_viewport(cam_gt, world_pos) {
            painter.text(
                egui::pos2(viewport.x, viewport.y),
                egui::Align2::CENTER_CENTER,
                label.text,
                egui::FontId::proportional(10.0),
                egui::Color32::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::{HexCoordinates, HexDirection};
    use crate::hex_grid::GridSettings;
    use crate::noise_source::UniformNoise;

    fn grid() -> HexGrid {
        let settings = GridSettings {
            chunk_count_x: 2,
            chunk_count_z: 1,
            chunk_size_x: 3,
            chunk_size_z: 3,
            ..GridSettings::default()
        };
        let mut grid = HexGrid::new(&settings, Box::new(UniformNoise::neutral()));
        grid.take_dirty_chunks();
        grid
    }

    fn edit(col: i32, row: i32, action: EditAction) -> CellEdit {
        CellEdit {
            coordinates: HexCoordinates::from_offset(col, row),
            action,
        }
    }

    #[test]
    fn elevation_edit_marks_chunk() {
        let mut g = grid();
        assert!(apply_edit(&mut g, &edit(1, 1, EditAction::SetElevation(2))));
        assert_eq!(g.cell(g.cell_at_offset(1, 1).unwrap()).elevation(), 2);
        assert_eq!(g.take_dirty_chunks(), vec![0]);
    }

    #[test]
    fn color_edit_converts_to_linear() {
        let mut g = grid();
        let color = Color::srgb(0.5, 0.25, 0.0);
        apply_edit(&mut g, &edit(4, 0, EditAction::SetColor(color)));
        let id = g.cell_at_offset(4, 0).unwrap();
        assert_eq!(g.cell(id).color(), color.to_linear());
    }

    #[test]
    fn river_edits_set_and_remove() {
        let mut g = grid();
        apply_edit(&mut g, &edit(1, 1, EditAction::SetOutgoingRiver(HexDirection::E)));
        let id = g.cell_at_offset(1, 1).unwrap();
        assert_eq!(g.cell(id).outgoing_river(), Some(HexDirection::E));

        apply_edit(&mut g, &edit(1, 1, EditAction::RemoveRivers));
        assert!(!g.cell(id).has_river());
    }

    #[test]
    fn edit_outside_grid_is_ignored() {
        let mut g = grid();
        assert!(!apply_edit(&mut g, &edit(40, 0, EditAction::SetElevation(1))));
        assert_eq!(g.dirty_chunk_count(), 0);
    }
}
