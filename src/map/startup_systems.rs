use std::cmp::Reverse;

use bevy::log::info;
use bevy::prelude::*;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::entities::{ChunkMesh, MapMaterials};
use super::{DemoSettings, MapConfig};
use crate::coordinates::HexDirection;
use crate::hex_grid::{CellId, HexGrid};
use crate::math;
use crate::mesh_buffer::MeshKind;
use crate::noise_source::NoiseTexture;

/// Longest river the demo painter traces, in cells.
const MAX_RIVER_LENGTH: usize = 32;

// ── Startup ─────────────────────────────────────────────────────────

/// Builds the [`HexGrid`] resource, paints the demo terrain and spawns one
/// entity per chunk with a terrain and a river child.
pub fn build_map(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<MapConfig>,
) {
    let terrain = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.9,
        ..default()
    });
    let river = materials.add(StandardMaterial {
        base_color: Color::srgba(0.2, 0.45, 0.85, 0.75),
        perceptual_roughness: 0.2,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    let noise = NoiseTexture::from_settings(&cfg.noise);
    let mut grid = HexGrid::new(&cfg.grid, Box::new(noise));
    paint_demo_terrain(&mut grid, &cfg.demo);

    let root = commands
        .spawn((
            Name::new("HexGrid"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    for (id, chunk) in grid.chunks().iter().enumerate() {
        let (x, z) = chunk.offset();
        let chunk_entity = commands
            .spawn((
                Name::new(format!("HexGridChunk({x},{z})")),
                Transform::default(),
                Visibility::default(),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Name::new("Terrain"),
                    ChunkMesh {
                        chunk: id,
                        kind: MeshKind::Terrain,
                    },
                    MeshMaterial3d(terrain.clone()),
                    Transform::default(),
                ));
                parent.spawn((
                    Name::new("Rivers"),
                    ChunkMesh {
                        chunk: id,
                        kind: MeshKind::River,
                    },
                    MeshMaterial3d(river.clone()),
                    Transform::default(),
                ));
            })
            .id();
        commands.entity(root).add_child(chunk_entity);
    }

    commands.insert_resource(MapMaterials { terrain, river });
    commands.insert_resource(grid);
}

// ── Demo painting ──────────────────────────────────────────────────

/// Paints fBm elevations, palette colors and downhill rivers onto `grid`.
///
/// Deterministic for a given seed. Rivers start at the highest cells and
/// follow the lowest neighbor that is not higher, until they reach a cell
/// that already carries water or have no way down.
pub fn paint_demo_terrain(grid: &mut HexGrid, demo: &DemoSettings) {
    let fbm = Fbm::<Perlin>::new(demo.seed).set_octaves(demo.octaves);
    let max_elevation = demo.max_elevation.max(0);
    let scale = demo.scale.max(f64::EPSILON);

    for id in 0..grid.cells().len() {
        let position = grid.cell(id).coordinates().to_position();
        let sample = fbm.get([position.x as f64 / scale, position.z as f64 / scale]);
        let level = math::map_noise_to_range(sample, 0.0, (max_elevation + 1) as f32);
        let elevation = (level.floor() as i32).clamp(0, max_elevation);
        grid.set_elevation(id, elevation);

        if let Some(color) = demo
            .palette
            .get(elevation as usize)
            .or_else(|| demo.palette.last())
        {
            grid.set_color(id, color.to_linear());
        }
    }

    let mut sources: Vec<CellId> = (0..grid.cells().len()).collect();
    sources.sort_by_key(|&id| Reverse(grid.cell(id).elevation()));

    let mut rivers = 0;
    for source in sources {
        if rivers >= demo.river_count {
            break;
        }
        if grid.cell(source).has_river() {
            continue;
        }
        if trace_river(grid, source) > 0 {
            rivers += 1;
        }
    }

    info!(
        "painted demo map: elevations 0..={max_elevation}, {rivers} rivers"
    );
}

/// Walks downhill from `source`, returning the number of river segments laid.
fn trace_river(grid: &mut HexGrid, source: CellId) -> usize {
    let mut current = source;
    let mut length = 0;

    while length < MAX_RIVER_LENGTH {
        let elevation = grid.cell(current).elevation();
        let downhill = HexDirection::ALL
            .into_iter()
            .filter_map(|d| grid.neighbor(current, d).map(|n| (d, n)))
            .filter(|&(_, n)| {
                let neighbor = grid.cell(n);
                neighbor.elevation() <= elevation && !neighbor.has_river()
            })
            .min_by_key(|&(_, n)| grid.cell(n).elevation());
        let Some((direction, next)) = downhill else {
            break;
        };

        grid.set_outgoing_river(current, direction);
        current = next;
        length += 1;
    }
    length
}
