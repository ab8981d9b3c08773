//! Scene visuals: camera, tonemapping, sunlight and keyboard panning.
//!
//! The camera starts above the middle of the map, looking down at an angle,
//! and pans in the XZ plane with WASD while the map is running.

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::render::view::Hdr;

use crate::map::{GameState, MapConfig};
use crate::metrics::{INNER_RADIUS, OUTER_RADIUS};

const MOVE_SPEED: f32 = 120.0;
const ZOOM_SPEED: f32 = 80.0;
const MIN_CAMERA_HEIGHT: f32 = 20.0;
const MAX_CAMERA_HEIGHT: f32 = 400.0;

/// Marker for the map camera.
#[derive(Component)]
pub struct MapCamera;

/// Sets up the camera and the sun, and pans the camera while running.
pub struct VisualsPlugin;

impl Plugin for VisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_visuals).add_systems(
            Update,
            pan_camera.run_if(in_state(GameState::Running)),
        );
    }
}

/// Spawns the camera over the map center and a directional sun.
pub fn setup_visuals(mut commands: Commands, cfg: Res<MapConfig>) {
    let g = &cfg.grid;
    let cells_x = (g.chunk_count_x * g.chunk_size_x) as f32;
    let cells_z = (g.chunk_count_z * g.chunk_size_z) as f32;
    let center = Vec3::new(
        cells_x * INNER_RADIUS,
        0.0,
        cells_z * OUTER_RADIUS * 0.75,
    );

    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Hdr,
        Tonemapping::TonyMcMapface,
        Transform::from_translation(center + Vec3::new(0.0, 180.0, 160.0))
            .looking_at(center, Vec3::Y),
        MapCamera,
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(0.4, -0.8, -0.3), Vec3::Y),
    ));
}

fn pan_camera(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut Transform, With<MapCamera>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };

    // WASD movement in the camera's forward/right plane (XZ only)
    let forward = transform.forward();
    let forward_xz = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    let right = transform.right();
    let right_xz = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();

    let mut direction = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) {
        direction += forward_xz;
    }
    if keys.pressed(KeyCode::KeyS) {
        direction -= forward_xz;
    }
    if keys.pressed(KeyCode::KeyD) {
        direction += right_xz;
    }
    if keys.pressed(KeyCode::KeyA) {
        direction -= right_xz;
    }

    if direction != Vec3::ZERO {
        let delta = direction.normalize() * MOVE_SPEED * time.delta_secs();
        transform.translation.x += delta.x;
        transform.translation.z += delta.z;
    }

    let mut zoom = 0.0;
    if keys.pressed(KeyCode::KeyQ) {
        zoom -= 1.0;
    }
    if keys.pressed(KeyCode::KeyE) {
        zoom += 1.0;
    }
    if zoom != 0.0 {
        transform.translation.y = (transform.translation.y + zoom * ZOOM_SPEED * time.delta_secs())
            .clamp(MIN_CAMERA_HEIGHT, MAX_CAMERA_HEIGHT);
    }
}
