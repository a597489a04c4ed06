use bevy::core_pipeline::bloom::Bloom;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::config::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, SCROLL_PIXELS_PER_LINE, ViewerSettings,
};
use crate::systems::OrrerySet;
use crate::systems::bodies::{BodyRegistry, BodyId};
use crate::systems::control::SimCommand;
use crate::systems::flight::CameraFlight;
use crate::systems::time::SimulationState;

pub struct OrbitCamPlugin;

impl Plugin for OrbitCamPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraFlight>()
           .add_systems(Startup, spawn_camera)
           .add_systems(Update, update.in_set(OrrerySet::Input))
           .add_systems(Update, (handle_camera_commands, fly).chain().in_set(OrrerySet::Camera));
    }
}

// camera component
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    pub speed: f32,
    pub angle: f32,
    pub v_angle: f32,
    pub is_dragging: bool,
    pub target: Vec3,

    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 180.0,
            speed: 0.5,
            angle: 0.0,
            v_angle: 0.3,
            is_dragging: false,
            target: Vec3::ZERO,

            min_radius: CAMERA_MIN_DISTANCE,
            max_radius: CAMERA_MAX_DISTANCE,
        }
    }
}

impl OrbitCamera {
    // derive spherical coordinates from a position around a target
    pub fn from_position(target: Vec3, position: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length().clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
        let horizontal = Vec2::new(offset.x, offset.z).length();

        Self {
            radius,
            angle: offset.z.atan2(offset.x),
            v_angle: offset.y.atan2(horizontal).clamp(-1.5, 1.5),
            target,
            ..default()
        }
    }

    // calculate world position from spherical coordinates
    // https://en.wikipedia.org/wiki/Spherical_coordinate_system#Cartesian_coordinates
    pub fn calculate_position(&self) -> Vec3 {
        let x = self.radius * self.v_angle.cos() * self.angle.cos();
        let y = self.radius * self.v_angle.sin();
        let z = self.radius * self.v_angle.cos() * self.angle.sin();

        self.target + Vec3::new(x, y, z)
    }

    pub fn drag(&mut self, delta: Vec2) {
        self.angle += delta.x * self.speed * 0.01;
        self.v_angle = (self.v_angle + delta.y * self.speed * 0.01).clamp(-1.5, 1.5);
    }

    // multiplicative so zoom feels the same near a moon and across the system
    pub fn zoom(&mut self, scroll: f32) {
        self.radius = (self.radius * 0.9_f32.powf(scroll)).clamp(self.min_radius, self.max_radius);
    }
}

// trackpads report pixels, wheels report lines
fn scroll_lines(scroll: &MouseWheel) -> f32 {
    match scroll.unit {
        MouseScrollUnit::Line => scroll.y,
        MouseScrollUnit::Pixel => scroll.y / SCROLL_PIXELS_PER_LINE,
    }
}

fn spawn_camera(mut commands: Commands, settings: Res<ViewerSettings>) {
    let start = settings.camera_start();

    let mut camera = commands.spawn((
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            far: CAMERA_FAR,
            ..default()
        }),
        Tonemapping::TonyMcMapface,
        Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::from_position(Vec3::ZERO, start),
    ));

    if settings.bloom {
        camera.insert(Bloom::NATURAL);
    }
}

// manual orbit controls, suspended while a flight owns the camera
fn update(
    flight: Res<CameraFlight>,
    mut camera_query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<CursorMoved>,
    mut scroll_events: EventReader<MouseWheel>,
) {
    if flight.is_flying() {
        mouse_motion.clear();
        scroll_events.clear();
        return;
    }

    for (mut transform, mut camera) in camera_query.iter_mut() {
        // handle mouse drag
        if mouse_buttons.just_pressed(MouseButton::Right) {
            camera.is_dragging = true;
        }
        if mouse_buttons.just_released(MouseButton::Right) {
            camera.is_dragging = false;
        }

        if camera.is_dragging {
            for motion in mouse_motion.read() {
                if let Some(delta) = motion.delta {
                    camera.drag(delta);
                }
            }
        }

        for scroll in scroll_events.read() {
            camera.zoom(scroll_lines(scroll));
        }

        transform.translation = camera.calculate_position();
        transform.look_at(camera.target, Vec3::Y);
    }
}

fn handle_camera_commands(
    mut commands: EventReader<SimCommand>,
    mut flight: ResMut<CameraFlight>,
    state: Res<SimulationState>,
    settings: Res<ViewerSettings>,
    registry: Option<Res<BodyRegistry>>,
    bodies: Query<&GlobalTransform>,
    mut camera_query: Query<(&mut Transform, &mut OrbitCamera)>,
) {
    for command in commands.read() {
        let Ok((mut transform, mut camera)) = camera_query.single_mut() else { return };

        match *command {
            SimCommand::FlyTo(id) => {
                let Some(target) = body_position(registry.as_deref(), &bodies, id) else { continue };

                *flight = CameraFlight::begin(
                    transform.translation,
                    target,
                    id.descriptor().size,
                    state.elapsed,
                    settings.fly_duration,
                );
                info!("flying to {}", id.name());
            }
            SimCommand::Reset => {
                let start = settings.camera_start();
                *flight = CameraFlight::Idle;
                *camera = OrbitCamera::from_position(Vec3::ZERO, start);
                *transform = Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y);
                debug!("camera reset");
            }
            _ => {}
        }
    }
}

fn body_position(
    registry: Option<&BodyRegistry>,
    bodies: &Query<&GlobalTransform>,
    id: BodyId,
) -> Option<Vec3> {
    let record = registry?.get(id)?;
    bodies.get(record.mesh).ok().map(|t| t.translation())
}

// runs while paused too, so a frozen scene can still be explored
fn fly(
    state: Res<SimulationState>,
    mut flight: ResMut<CameraFlight>,
    mut camera_query: Query<(&mut Transform, &mut OrbitCamera)>,
) {
    if !flight.is_flying() {
        return;
    }
    let Some(frame) = flight.step(state.elapsed) else { return };
    let Ok((mut transform, mut camera)) = camera_query.single_mut() else { return };

    transform.translation = frame.position;
    transform.look_at(frame.look_at, Vec3::Y);

    // hand control back, orbiting the body we just flew to
    if frame.finished {
        *camera = OrbitCamera::from_position(frame.look_at, frame.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::flight::framing_offset;

    #[test]
    fn from_position_round_trips_through_spherical() {
        let target = Vec3::new(62.0, 0.0, 0.0);
        let position = Vec3::new(-50.0, 90.0, 150.0);
        let camera = OrbitCamera::from_position(target, position);

        assert!(camera.calculate_position().abs_diff_eq(position, 1e-3));
    }

    #[test]
    fn zoom_respects_limits() {
        let mut camera = OrbitCamera::default();
        for _ in 0..200 {
            camera.zoom(5.0);
        }
        assert_eq!(camera.radius, CAMERA_MIN_DISTANCE);

        for _ in 0..200 {
            camera.zoom(-5.0);
        }
        assert_eq!(camera.radius, CAMERA_MAX_DISTANCE);
    }

    #[test]
    fn pixel_scroll_zooms_like_a_wheel_notch() {
        let wheel = |unit, y| MouseWheel { unit, x: 0.0, y, window: Entity::PLACEHOLDER };

        let mut by_line = OrbitCamera::default();
        by_line.zoom(scroll_lines(&wheel(MouseScrollUnit::Line, 1.0)));

        let mut by_pixel = OrbitCamera::default();
        by_pixel.zoom(scroll_lines(&wheel(MouseScrollUnit::Pixel, SCROLL_PIXELS_PER_LINE)));

        assert!((by_line.radius - by_pixel.radius).abs() < 1e-3);
        assert!(by_pixel.radius > CAMERA_MIN_DISTANCE);
    }

    #[test]
    fn drag_clamps_pitch() {
        let mut camera = OrbitCamera::default();
        camera.drag(Vec2::new(0.0, 10_000.0));
        assert_eq!(camera.v_angle, 1.5);
    }

    fn flight_app() -> (App, Entity) {
        let mut app = App::new();
        app.add_event::<SimCommand>()
           .init_resource::<SimulationState>()
           .init_resource::<CameraFlight>()
           .insert_resource(ViewerSettings::default())
           .add_systems(Update, (handle_camera_commands, fly).chain());

        let start = ViewerSettings::default().camera_start();
        let camera = app.world_mut()
            .spawn((Transform::from_translation(start), OrbitCamera::from_position(Vec3::ZERO, start)))
            .id();
        (app, camera)
    }

    #[test]
    fn fly_to_continues_while_paused_and_lands() {
        let (mut app, camera) = flight_app();
        let earth = BodyId::Earth.descriptor();
        let target = Vec3::new(earth.distance, 0.0, 0.0);

        let mesh = app.world_mut().spawn(GlobalTransform::from_translation(target)).id();
        let mut registry = crate::systems::bodies::tests::test_registry(app.world_mut());
        registry = rewire_mesh(registry, BodyId::Earth, mesh);
        app.insert_resource(registry);

        {
            let mut state = app.world_mut().resource_mut::<SimulationState>();
            state.toggle_pause();
        }
        app.world_mut().send_event(SimCommand::FlyTo(BodyId::Earth));
        app.update();
        assert!(app.world().resource::<CameraFlight>().is_flying());

        // wall clock keeps running under pause
        for _ in 0..100 {
            app.world_mut().resource_mut::<SimulationState>().record_frame(1.0 / 60.0);
            app.update();
        }

        assert_eq!(*app.world().resource::<CameraFlight>(), CameraFlight::Idle);
        let landed = app.world().get::<Transform>(camera).unwrap().translation;
        assert!(landed.abs_diff_eq(target + framing_offset(earth.size), 1e-3));

        let orbit = app.world().get::<OrbitCamera>(camera).unwrap();
        assert_eq!(orbit.target, target);
    }

    #[test]
    fn reset_cancels_flight() {
        let (mut app, camera) = flight_app();
        app.insert_resource(CameraFlight::begin(Vec3::ZERO, Vec3::X * 100.0, 5.0, 0.0, 10.0));
        app.world_mut().get_mut::<Transform>(camera).unwrap().translation = Vec3::splat(3.0);

        app.world_mut().send_event(SimCommand::Reset);
        app.update();

        assert_eq!(*app.world().resource::<CameraFlight>(), CameraFlight::Idle);
        let translation = app.world().get::<Transform>(camera).unwrap().translation;
        assert_eq!(translation, ViewerSettings::default().camera_start());
    }

    fn rewire_mesh(registry: BodyRegistry, id: BodyId, mesh: Entity) -> BodyRegistry {
        let mut rewired = BodyRegistry::default();
        for record in registry.iter() {
            let mut record = record.clone();
            if record.id == id {
                record.mesh = mesh;
            }
            rewired.insert(record);
        }
        rewired
    }
}
