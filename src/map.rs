//! Bevy binding for the hex map: config, chunk entities, edits and labels.
//!
//! The grid lives in a [`HexGrid`] resource. Each chunk is one entity with a
//! terrain child and a river child; whenever the grid reports dirty chunks the
//! refresh system triangulates them and swaps in fresh meshes.

mod entities;
mod startup_systems;
mod systems;

pub use entities::{CellEdit, ChunkMesh, EditAction, MapMaterials};
pub use startup_systems::paint_demo_terrain;
pub use systems::apply_edit;

use bevy::prelude::*;

use crate::hex_grid::{GridSettings, HexGrid};
use crate::mesh_buffer::MeshBufferPool;
use crate::noise_source::NoiseSettings;

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Map on screen.
    #[default]
    Running,
    /// Debug overlay active (Tab to toggle).
    Debugging,
}

/// Nested configuration for the map subsystem.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct MapConfig {
    /// Grid dimensions and initial cell color.
    pub grid: GridSettings,
    /// Perturbation noise texture.
    pub noise: NoiseSettings,
    /// Procedural painting of the startup map.
    pub demo: DemoSettings,
    /// Background clear color.
    pub clear_color: Color,
}

/// Elevation, color and river painting applied once at startup.
#[derive(Clone, Debug, Reflect)]
pub struct DemoSettings {
    /// Seed for the elevation noise generator.
    pub seed: u32,
    /// Number of octaves for elevation noise.
    pub octaves: usize,
    /// Spatial scale divisor for elevation noise sampling.
    pub scale: f64,
    /// Highest elevation level painted.
    pub max_elevation: i32,
    /// Number of rivers traced downhill from the highest cells.
    pub river_count: usize,
    /// Cell color per elevation level; levels past the end reuse the last entry.
    pub palette: Vec<Color>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            noise: NoiseSettings::default(),
            demo: DemoSettings {
                seed: 42,
                octaves: 4,
                scale: 120.0,
                max_elevation: 6,
                river_count: 4,
                palette: vec![
                    Color::srgb(0.16, 0.42, 0.68),
                    Color::srgb(0.85, 0.80, 0.55),
                    Color::srgb(0.35, 0.62, 0.25),
                    Color::srgb(0.25, 0.50, 0.20),
                    Color::srgb(0.45, 0.40, 0.30),
                    Color::srgb(0.55, 0.55, 0.55),
                    Color::srgb(0.95, 0.95, 0.97),
                ],
            },
            clear_color: Color::srgb(0.52, 0.70, 0.86),
        }
    }
}

/// Map plugin: grid construction at startup, edits and chunk rebuilds every
/// frame, cell labels while debugging.
pub struct MapPlugin(pub MapConfig);

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MapConfig>()
            .register_type::<ChunkMesh>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .init_resource::<MeshBufferPool>()
            .add_message::<CellEdit>()
            .add_systems(Startup, startup_systems::build_map)
            .add_systems(
                Update,
                (systems::apply_cell_edits, systems::refresh_dirty_chunks)
                    .chain()
                    .run_if(resource_exists::<HexGrid>),
            );

        app.add_systems(
            Update,
            systems::draw_hex_labels.run_if(in_state(GameState::Debugging)),
        );
    }
}
