use bevy::prelude::*;

use crate::config::*;
use crate::systems::OrrerySet;
use crate::systems::bodies::mesh::{point_cloud_mesh, sphere_mesh, starfield_points};
use crate::systems::bodies::textures::PendingTextures;
use crate::systems::time::SimulationState;

pub struct SunPlugin;

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
           .add_systems(Startup, (spawn_star, spawn_lights, spawn_starfield))
           .add_systems(Update, pulse.in_set(OrrerySet::Simulate));
    }
}

// scaled by the pulse, base is 1.0 for the star and slightly larger for the corona
#[derive(Component, Debug, Clone, Copy)]
pub struct Pulse {
    pub base_scale: f32,
}

pub fn pulse_factor(elapsed: f32) -> f32 {
    1.0 + (elapsed * PULSE_FREQUENCY).sin() * PULSE_AMPLITUDE
}

fn spawn_star(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut pending: ResMut<PendingTextures>,
    asset_server: Res<AssetServer>,
) {
    let warm = Color::srgb_u8(0xff, 0xcc, 0x66);

    let star_material = pending.request(
        &asset_server,
        &mut materials,
        SUN_TEXTURE,
        StandardMaterial {
            unlit: true,
            // pushes the star over the bloom threshold
            emissive: LinearRgba::rgb(6.0, 4.0, 1.6),
            ..default()
        },
        warm,
    );

    commands.spawn((
        Name::new("Sun"),
        Mesh3d(meshes.add(sphere_mesh(STAR_RADIUS, 6))),
        MeshMaterial3d(star_material),
        Transform::default(),
        Pulse { base_scale: 1.0 },
    ));

    commands.spawn((
        Name::new("Corona"),
        Mesh3d(meshes.add(sphere_mesh(CORONA_RADIUS, 4))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: warm.with_alpha(0.06),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(CORONA_SCALE)),
        Pulse { base_scale: CORONA_SCALE },
    ));
}

fn spawn_lights(mut commands: Commands) {
    // sun light, at the center
    commands.spawn((
        Name::new("Sun light"),
        PointLight {
            color: Color::srgb_u8(0xff, 0xee, 0xcc),
            intensity: SUN_LIGHT_INTENSITY,
            range: SUN_LIGHT_RANGE,
            radius: STAR_RADIUS,
            shadows_enabled: false,
            ..default()
        },
        Transform::default(),
    ));

    // faint fill so the night sides aren't pitch black
    commands.spawn((
        DirectionalLight {
            illuminance: FILL_LIGHT_ILLUMINANCE,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_starfield(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let points = starfield_points(&mut rand::rng(), STAR_COUNT, STARFIELD_RADIUS);

    commands.spawn((
        Name::new("Starfield"),
        Mesh3d(meshes.add(point_cloud_mesh(&points))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0xbf, 0xcf, 0xdc),
            unlit: true,
            ..default()
        })),
        Transform::default(),
    ));
}

// cosmetic, independent of pause
fn pulse(state: Res<SimulationState>, mut query: Query<(&Pulse, &mut Transform)>) {
    let factor = pulse_factor(state.elapsed);
    for (pulse, mut transform) in query.iter_mut() {
        transform.scale = Vec3::splat(pulse.base_scale * factor);
    }
}
