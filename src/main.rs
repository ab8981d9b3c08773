#![warn(missing_docs)]
//! Hex map viewer.
//!
//! Opens a window on a procedurally painted hex map: terraced slopes, cliffs
//! and rivers, rebuilt chunk by chunk whenever cells change. Tab toggles the
//! debug overlay with cell labels and the world inspector.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_inspector_egui::quick::WorldInspectorPlugin;
use hex_map::map::{GameState, MapConfig, MapPlugin};
use hex_map::visuals::VisualsPlugin;

/// Command-line overrides for the startup map.
#[cfg(feature = "native")]
#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Seed for the elevation noise.
    #[arg(long)]
    seed: Option<u32>,
    /// Seed for the vertex perturbation noise.
    #[arg(long)]
    noise_seed: Option<u32>,
    /// Number of chunks along x.
    #[arg(long)]
    chunks_x: Option<usize>,
    /// Number of chunks along z.
    #[arg(long)]
    chunks_z: Option<usize>,
    /// Highest elevation level painted.
    #[arg(long)]
    max_elevation: Option<i32>,
    /// Number of rivers traced from the highest cells.
    #[arg(long)]
    rivers: Option<usize>,
}

#[cfg(feature = "native")]
impl Cli {
    fn apply(self, cfg: &mut MapConfig) {
        if let Some(seed) = self.seed {
            cfg.demo.seed = seed;
        }
        if let Some(seed) = self.noise_seed {
            cfg.noise.seed = seed;
        }
        if let Some(x) = self.chunks_x {
            cfg.grid.chunk_count_x = x;
        }
        if let Some(z) = self.chunks_z {
            cfg.grid.chunk_count_z = z;
        }
        if let Some(max) = self.max_elevation {
            cfg.demo.max_elevation = max;
        }
        if let Some(rivers) = self.rivers {
            cfg.demo.river_count = rivers;
        }
    }
}

fn main() {
    #[allow(unused_mut)]
    let mut config = MapConfig::default();
    #[cfg(feature = "native")]
    {
        use clap::Parser;
        Cli::parse().apply(&mut config);
    }

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Map".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<GameState>()
    .init_state::<GameState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(MapPlugin(config))
    .add_plugins(VisualsPlugin)
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Debugging)));

    app.run();
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        next.set(match state.get() {
            GameState::Running => GameState::Debugging,
            GameState::Debugging => GameState::Running,
        });
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
