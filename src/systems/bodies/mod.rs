use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

pub mod catalog;
pub mod mesh;
pub mod textures;

pub use catalog::{BODIES, BodyDescriptor, BodyFacts, BodyId};
use catalog::{AttachmentDescriptor, MOON_RADIUS, SATELLITE_SIZE};
use mesh::{circle_points, line_loop_mesh, sphere_mesh};
use textures::{PendingTextures, resolve_textures};

use crate::config::{LABEL_HEIGHT, ORBIT_PATH_SEGMENTS, ViewerSettings};
use crate::systems::OrrerySet;
use crate::systems::labels::LabelAnchor;
use crate::systems::motion::Rotor;

pub struct BodiesPlugin;

impl Plugin for BodiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingTextures>()
           .add_systems(Startup, build_scene)
           .add_systems(Update, (
                resolve_textures,
                sync_orbit_paths.run_if(resource_exists_and_changed::<BodyRegistry>),
            ).in_set(OrrerySet::Present));
    }
}

// shared root for all orbit pivots
#[derive(Component)]
pub struct SolarRoot;

/// Sphere mesh of a body; the only thing pointer picks are tested against.
#[derive(Component, Debug, Clone, Copy)]
pub struct BodyMesh(pub BodyId);

// pivot or mesh belonging to a body's toggleable satellite
#[derive(Component, Debug, Clone, Copy)]
pub struct SatelliteOf(pub BodyId);

// hiding the pivot hides everything hanging off it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub pivot: Entity,
    pub enabled: bool,
}

/// Render handles of one body that other systems act on.
///
/// Pivots, rings and the moon are only ever reached through the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyRecord {
    pub id: BodyId,
    pub mesh: Entity,
    pub orbit_path: Entity,
    pub label_anchor: Entity,
    pub satellite: Option<Attachment>,
    pub overlays_visible: bool,
}

impl BodyRecord {
    pub fn descriptor(&self) -> &'static BodyDescriptor {
        self.id.descriptor()
    }
}

/// Lookup from body to its render handles, filled once at startup.
///
/// Topology never changes after that; only the overlay and satellite flags
/// are mutable.
#[derive(Resource, Debug, Default)]
pub struct BodyRegistry {
    records: Vec<BodyRecord>,
    by_mesh: HashMap<Entity, BodyId>,
}

impl BodyRegistry {
    pub fn insert(&mut self, record: BodyRecord) {
        debug_assert_eq!(record.id.index(), self.records.len(), "bodies must be registered in order");
        self.by_mesh.insert(record.mesh, record.id);
        self.records.push(record);
    }

    pub fn get(&self, id: BodyId) -> Option<&BodyRecord> {
        self.records.get(id.index()).filter(|r| r.id == id)
    }

    fn get_mut(&mut self, id: BodyId) -> Option<&mut BodyRecord> {
        self.records.get_mut(id.index()).filter(|r| r.id == id)
    }

    pub fn body_for_mesh(&self, mesh: Entity) -> Option<BodyId> {
        self.by_mesh.get(&mesh).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyRecord> {
        self.records.iter()
    }

    // flips every body individually, two toggles restore the original state
    pub fn toggle_overlays(&mut self) {
        for record in &mut self.records {
            record.overlays_visible = !record.overlays_visible;
        }
    }

    pub fn overlays_visible(&self, id: BodyId) -> bool {
        self.get(id).is_some_and(|r| r.overlays_visible)
    }

    /// Returns the new state, or `None` if the body has no satellite.
    pub fn toggle_satellite(&mut self, id: BodyId) -> Option<bool> {
        let satellite = self.get_mut(id)?.satellite.as_mut()?;
        satellite.enabled = !satellite.enabled;
        Some(satellite.enabled)
    }

    pub fn satellite_enabled(&self, id: BodyId) -> bool {
        self.get(id)
            .and_then(|r| r.satellite)
            .is_some_and(|s| s.enabled)
    }

    pub fn has_satellite(&self, id: BodyId) -> bool {
        self.get(id).is_some_and(|r| r.satellite.is_some())
    }
}

fn spawn_attachment(
    commands: &mut Commands,
    parent: Entity,
    name: String,
    descriptor: &AttachmentDescriptor,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
) -> (Entity, Entity) {
    let pivot = commands
        .spawn((
            Name::new(format!("{name} pivot")),
            Transform::default(),
            Visibility::default(),
            Rotor::new(descriptor.orbit_rate),
            ChildOf(parent),
        ))
        .id();

    let mesh = commands
        .spawn((
            Name::new(name),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(Vec3::from_array(descriptor.offset)),
            Rotor::new(descriptor.spin_rate),
            ChildOf(pivot),
        ))
        .id();

    (pivot, mesh)
}

// build the whole body hierarchy, called on startup
fn build_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut pending: ResMut<PendingTextures>,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
) {
    let root = commands
        .spawn((
            Name::new("Solar root"),
            SolarRoot,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    // orbit path material, reusable
    let path_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.4, 0.4, 0.4, 0.65),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    let moon_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x88, 0x88, 0x88),
        perceptual_roughness: 1.0,
        ..default()
    });
    let satellite_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xff, 0xdd, 0x55),
        ..default()
    });

    let mut registry = BodyRegistry::default();

    for body in &BODIES {
        let pivot = commands
            .spawn((
                Name::new(format!("{} pivot", body.name)),
                Transform::default(),
                Visibility::default(),
                Rotor::new(body.orbit_rate),
                ChildOf(root),
            ))
            .id();

        let material = pending.request(
            &asset_server,
            &mut materials,
            body.texture,
            StandardMaterial {
                perceptual_roughness: 1.0,
                metallic: 0.0,
                ..default()
            },
            Color::WHITE,
        );

        let mesh = commands
            .spawn((
                Name::new(body.name),
                Mesh3d(meshes.add(sphere_mesh(body.size, 5))),
                MeshMaterial3d(material),
                Transform::from_xyz(body.distance, 0.0, 0.0),
                Rotor::new(body.spin_rate),
                BodyMesh(body.id),
                ChildOf(pivot),
            ))
            .id();

        if let Some(ring) = body.ring {
            let ring_material = pending.request(
                &asset_server,
                &mut materials,
                ring.texture,
                StandardMaterial {
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    double_sided: true,
                    cull_mode: None,
                    ..default()
                },
                Color::WHITE,
            );

            commands.spawn((
                Name::new(format!("{} ring", body.name)),
                Mesh3d(meshes.add(Mesh::from(Annulus::new(ring.inner, ring.outer)))),
                MeshMaterial3d(ring_material),
                Transform::from_xyz(body.distance, 0.0, 0.0)
                    .with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
                ChildOf(pivot),
            ));
        }

        let overlay_visibility = if settings.show_overlays {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };

        let orbit_path = commands
            .spawn((
                Name::new(format!("{} orbit", body.name)),
                Mesh3d(meshes.add(line_loop_mesh(&circle_points(body.distance, ORBIT_PATH_SEGMENTS)))),
                MeshMaterial3d(path_material.clone()),
                Transform::default(),
                overlay_visibility,
                ChildOf(root),
            ))
            .id();

        let anchor = LabelAnchor::new(body.id, body.size + LABEL_HEIGHT, body.distance);
        let label_anchor = commands
            .spawn((
                Name::new(format!("{} label", body.name)),
                Transform::from_translation(anchor.position(0.0)),
                anchor,
                ChildOf(pivot),
            ))
            .id();

        if let Some(moon) = &body.moon {
            spawn_attachment(
                &mut commands,
                mesh,
                format!("{} moon", body.name),
                moon,
                meshes.add(sphere_mesh(MOON_RADIUS, 3)),
                moon_material.clone(),
            );
        }

        let satellite = body.satellite.as_ref().map(|satellite| {
            let (pivot, satellite_mesh) = spawn_attachment(
                &mut commands,
                mesh,
                format!("{} satellite", body.name),
                satellite,
                meshes.add(Cuboid::from_length(SATELLITE_SIZE)),
                satellite_material.clone(),
            );
            commands.entity(pivot).insert(SatelliteOf(body.id));
            commands.entity(satellite_mesh).insert(SatelliteOf(body.id));
            Attachment { pivot, enabled: true }
        });

        registry.insert(BodyRecord {
            id: body.id,
            mesh,
            orbit_path,
            label_anchor,
            satellite,
            overlays_visible: settings.show_overlays,
        });
    }

    info!("solar system built with {} bodies", registry.iter().count());
    commands.insert_resource(registry);
}

// keep orbit path visibility in step with the registry flags
fn sync_orbit_paths(
    registry: Res<BodyRegistry>,
    mut visibilities: Query<&mut Visibility>,
) {
    for record in registry.iter() {
        if let Ok(mut visibility) = visibilities.get_mut(record.orbit_path) {
            let wanted = if record.overlays_visible {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
            visibility.set_if_neq(wanted);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::LABEL_BOB_AMPLITUDE;
    use crate::systems::bodies::textures::FALLBACK_COLOR;

    // registry with placeholder entities, enough for flag bookkeeping
    pub(crate) fn test_registry(world: &mut World) -> BodyRegistry {
        let mut registry = BodyRegistry::default();
        for body in &BODIES {
            let mut spawn = || world.spawn_empty().id();

            let record = BodyRecord {
                id: body.id,
                mesh: spawn(),
                orbit_path: spawn(),
                label_anchor: spawn(),
                satellite: body.satellite.map(|_| Attachment { pivot: spawn(), enabled: true }),
                overlays_visible: true,
            };
            registry.insert(record);
        }
        registry
    }

    // headless app with just enough asset plumbing to run the builder
    fn scene_app(settings: ViewerSettings) -> App {
        let mut app = App::new();
        app.add_plugins((
                MinimalPlugins,
                AssetPlugin { watch_for_changes_override: Some(false), ..default() },
            ))
           .init_asset::<Mesh>()
           .init_asset::<StandardMaterial>()
           .init_asset::<Image>()
           .init_resource::<PendingTextures>()
           .insert_resource(settings)
           .add_systems(Startup, build_scene);
        app.update();
        app
    }

    fn parent_of(app: &App, entity: Entity) -> Entity {
        app.world().get::<ChildOf>(entity).unwrap().parent()
    }

    #[test]
    fn scene_has_one_pivot_per_body_under_the_root() {
        let mut app = scene_app(ViewerSettings::default());
        let root = app.world_mut()
            .query_filtered::<Entity, With<SolarRoot>>()
            .single(app.world())
            .unwrap();
        let registry = app.world().resource::<BodyRegistry>();
        assert_eq!(registry.iter().count(), BODIES.len());

        let mut pivots = Vec::new();
        for record in registry.iter() {
            let body = record.descriptor();
            let world = app.world();

            // sphere offset along x by the orbit radius
            assert_eq!(world.get::<Transform>(record.mesh).unwrap().translation, Vec3::new(body.distance, 0.0, 0.0));
            assert_eq!(world.get::<BodyMesh>(record.mesh).unwrap().0, record.id);

            let pivot = parent_of(&app, record.mesh);
            assert_eq!(parent_of(&app, pivot), root);
            assert_eq!(world.get::<Rotor>(pivot).unwrap().rate, body.orbit_rate);
            assert_eq!(world.get::<Rotor>(record.mesh).unwrap().rate, body.spin_rate);
            pivots.push(pivot);

            // label just above the sphere, riding the same pivot
            assert_eq!(parent_of(&app, record.label_anchor), pivot);
            let label = world.get::<Transform>(record.label_anchor).unwrap().translation;
            assert_eq!(label.x, body.distance);
            assert!((label.y - (body.size + LABEL_HEIGHT)).abs() <= LABEL_BOB_AMPLITUDE + 1e-6);

            // orbit path hangs off the root, not the pivot, so it doesn't spin
            assert_eq!(parent_of(&app, record.orbit_path), root);
            assert_eq!(world.get::<Visibility>(record.orbit_path), Some(&Visibility::Inherited));
            assert!(record.overlays_visible);
        }
        pivots.sort();
        pivots.dedup();
        assert_eq!(pivots.len(), BODIES.len());
    }

    #[test]
    fn rings_only_on_saturn_and_uranus() {
        let mut app = scene_app(ViewerSettings::default());
        let mut rings: Vec<String> = app.world_mut()
            .query::<&Name>()
            .iter(app.world())
            .filter(|name| name.as_str().ends_with(" ring"))
            .map(|name| name.as_str().to_string())
            .collect();
        rings.sort();

        assert_eq!(rings, vec!["Saturn ring".to_string(), "Uranus ring".to_string()]);
    }

    #[test]
    fn earth_carries_moon_and_enabled_satellite() {
        let mut app = scene_app(ViewerSettings::default());
        let registry = app.world().resource::<BodyRegistry>();
        let earth = registry.get(BodyId::Earth).unwrap().clone();

        let satellite = earth.satellite.unwrap();
        assert!(satellite.enabled);
        assert_eq!(parent_of(&app, satellite.pivot), earth.mesh);
        assert!(BodyId::ALL.iter().filter(|id| **id != BodyId::Earth).all(|id| !registry.has_satellite(*id)));

        let moon_pivots = app.world_mut()
            .query::<(&Name, &ChildOf)>()
            .iter(app.world())
            .filter(|(name, child_of)| name.as_str() == "Earth moon pivot" && child_of.parent() == earth.mesh)
            .count();
        assert_eq!(moon_pivots, 1);
    }

    #[test]
    fn bodies_start_untextured_while_loads_are_pending() {
        let app = scene_app(ViewerSettings::default());
        let registry = app.world().resource::<BodyRegistry>();
        let materials = app.world().resource::<Assets<StandardMaterial>>();

        for record in registry.iter() {
            let handle = &app.world().get::<MeshMaterial3d<StandardMaterial>>(record.mesh).unwrap().0;
            let material = materials.get(handle).unwrap();
            assert_eq!(material.base_color, FALLBACK_COLOR);
            assert!(material.base_color_texture.is_none());
        }

        // nine bodies plus two rings, nothing blocks on them
        assert_eq!(app.world().resource::<PendingTextures>().0.len(), BODIES.len() + 2);
    }

    #[test]
    fn hidden_overlays_setting_hides_orbit_paths() {
        let settings = ViewerSettings { show_overlays: false, ..default() };
        let app = scene_app(settings);
        let registry = app.world().resource::<BodyRegistry>();

        for record in registry.iter() {
            assert!(!record.overlays_visible);
            assert_eq!(app.world().get::<Visibility>(record.orbit_path), Some(&Visibility::Hidden));
        }
    }

    #[test]
    fn lookup_by_id_and_mesh() {
        let mut world = World::new();
        let registry = test_registry(&mut world);

        assert_eq!(registry.iter().count(), 9);
        for id in BodyId::ALL {
            let record = registry.get(id).unwrap();
            assert_eq!(record.id, id);
            assert_eq!(registry.body_for_mesh(record.mesh), Some(id));
        }
        assert_eq!(registry.body_for_mesh(registry.get(BodyId::Earth).unwrap().orbit_path), None);
    }

    #[test]
    fn overlay_toggle_is_idempotent_over_two_flips() {
        let mut world = World::new();
        let mut registry = test_registry(&mut world);

        registry.toggle_overlays();
        assert!(BodyId::ALL.iter().all(|id| !registry.overlays_visible(*id)));

        registry.toggle_overlays();
        assert!(BodyId::ALL.iter().all(|id| registry.overlays_visible(*id)));
    }

    #[test]
    fn only_earth_satellite_toggles() {
        let mut world = World::new();
        let mut registry = test_registry(&mut world);

        assert!(registry.satellite_enabled(BodyId::Earth));
        assert_eq!(registry.toggle_satellite(BodyId::Earth), Some(false));
        assert!(!registry.satellite_enabled(BodyId::Earth));
        assert_eq!(registry.toggle_satellite(BodyId::Earth), Some(true));

        assert_eq!(registry.toggle_satellite(BodyId::Mars), None);
        assert!(!registry.has_satellite(BodyId::Mars));
    }

    #[test]
    fn orbit_paths_follow_registry_flags() {
        let mut app = App::new();
        let mut registry = test_registry(app.world_mut());
        let path = registry.get(BodyId::Mars).unwrap().orbit_path;
        app.world_mut().entity_mut(path).insert(Visibility::Inherited);
        registry.toggle_overlays();

        app.insert_resource(registry)
            .add_systems(Update, sync_orbit_paths);
        app.update();

        assert_eq!(app.world().get::<Visibility>(path), Some(&Visibility::Hidden));
    }
}
