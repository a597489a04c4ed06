use bevy::prelude::*;

use crate::config::ViewerSettings;
use crate::systems::OrrerySet;
use crate::systems::bodies::{BodyId, BodyRegistry};
use crate::systems::time::SimulationState;

pub struct ControlPlugin;

impl Plugin for ControlPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SimCommand>()
           .init_resource::<ViewMode>()
           .add_systems(Startup, apply_view_mode)
           .add_systems(Update, (
                apply_commands,
                apply_view_mode.run_if(resource_changed::<ViewMode>),
            ).chain().in_set(OrrerySet::Simulate));
    }
}

/// Everything the keyboard, HUD and info panel can ask for.
/// Bindings only emit these; nothing here can fail.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    TogglePause,
    SpeedUp,
    SpeedDown,
    ToggleOverlays,
    ToggleSatellite(BodyId),
    FlyTo(BodyId),
    ToggleRealView,
    Reset,
}

// dim "real" lighting vs a flat bright view
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewMode {
    pub real_view: bool,
}

impl FromWorld for ViewMode {
    fn from_world(world: &mut World) -> Self {
        let real_view = world
            .get_resource::<ViewerSettings>()
            .map_or(true, |s| s.real_view);
        Self { real_view }
    }
}

/// Apply one command to the simulation-side state.
///
/// Camera commands (fly-to, the camera half of reset) are handled by the
/// camera plugin reading the same events.
pub fn apply_command(
    command: SimCommand,
    state: &mut SimulationState,
    registry: &mut BodyRegistry,
    view: &mut ViewMode,
    settings: &ViewerSettings,
) {
    match command {
        SimCommand::TogglePause => {
            state.toggle_pause();
            debug!("paused: {}", state.paused);
        }
        SimCommand::SpeedUp => {
            state.speed_up(settings.speed_step);
            debug!("speed: {:.2}", state.speed_mult);
        }
        SimCommand::SpeedDown => {
            state.slow_down(settings.speed_step);
            debug!("speed: {:.2}", state.speed_mult);
        }
        SimCommand::ToggleOverlays => registry.toggle_overlays(),
        SimCommand::ToggleSatellite(id) => {
            if let Some(enabled) = registry.toggle_satellite(id) {
                debug!("{} satellite enabled: {}", id.name(), enabled);
            }
        }
        SimCommand::ToggleRealView => view.real_view = !view.real_view,
        SimCommand::Reset => state.reset_speed(settings.initial_speed),
        SimCommand::FlyTo(_) => {}
    }
}

fn apply_commands(
    mut commands: EventReader<SimCommand>,
    mut state: ResMut<SimulationState>,
    registry: Option<ResMut<BodyRegistry>>,
    mut view: ResMut<ViewMode>,
    settings: Res<ViewerSettings>,
) {
    let Some(mut registry) = registry else {
        commands.clear();
        return;
    };

    for command in commands.read() {
        apply_command(*command, &mut state, &mut registry, &mut view, &settings);
    }
}

fn apply_view_mode(
    view: Res<ViewMode>,
    settings: Res<ViewerSettings>,
    mut ambient: ResMut<AmbientLight>,
) {
    ambient.brightness = settings.ambient_brightness(view.real_view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_SPEED, MIN_SPEED};
    use crate::systems::bodies::tests::test_registry;

    fn fixture() -> (SimulationState, BodyRegistry, ViewMode, ViewerSettings) {
        let mut world = World::new();
        (
            SimulationState::default(),
            test_registry(&mut world),
            ViewMode { real_view: true },
            ViewerSettings::default(),
        )
    }

    #[test]
    fn pause_toggles_back_and_forth() {
        let (mut state, mut registry, mut view, settings) = fixture();
        apply_command(SimCommand::TogglePause, &mut state, &mut registry, &mut view, &settings);
        assert!(state.paused);
        apply_command(SimCommand::TogglePause, &mut state, &mut registry, &mut view, &settings);
        assert!(!state.paused);
    }

    #[test]
    fn speed_steps_clamp_to_band() {
        let (mut state, mut registry, mut view, settings) = fixture();
        for _ in 0..500 {
            apply_command(SimCommand::SpeedUp, &mut state, &mut registry, &mut view, &settings);
        }
        assert_eq!(state.speed_mult, MAX_SPEED);

        for _ in 0..500 {
            apply_command(SimCommand::SpeedDown, &mut state, &mut registry, &mut view, &settings);
        }
        assert_eq!(state.speed_mult, MIN_SPEED);
    }

    #[test]
    fn bad_step_from_settings_keeps_speed_in_band() {
        let (mut state, mut registry, mut view, _) = fixture();
        let settings = ViewerSettings::from_ron("(speed_step: -0.5)").unwrap();

        for _ in 0..4 {
            apply_command(SimCommand::SpeedUp, &mut state, &mut registry, &mut view, &settings);
            assert!((MIN_SPEED..=MAX_SPEED).contains(&state.speed_mult));
        }
        assert!((state.speed_mult - 1.4).abs() < 1e-6);

        for _ in 0..50 {
            apply_command(SimCommand::SpeedDown, &mut state, &mut registry, &mut view, &settings);
            assert!(state.speed_mult >= MIN_SPEED);
        }
    }

    #[test]
    fn reset_restores_configured_speed() {
        let (mut state, mut registry, mut view, settings) = fixture();
        state.set_speed(7.5);
        apply_command(SimCommand::Reset, &mut state, &mut registry, &mut view, &settings);
        assert_eq!(state.speed_mult, settings.initial_speed);
    }

    #[test]
    fn satellite_toggle_touches_only_earth() {
        let (mut state, mut registry, mut view, settings) = fixture();
        apply_command(SimCommand::ToggleSatellite(BodyId::Earth), &mut state, &mut registry, &mut view, &settings);
        apply_command(SimCommand::ToggleSatellite(BodyId::Venus), &mut state, &mut registry, &mut view, &settings);

        assert!(!registry.satellite_enabled(BodyId::Earth));
        assert!(BodyId::ALL.iter().all(|id| registry.overlays_visible(*id)));
        assert_eq!(state, SimulationState::default());
    }

    #[test]
    fn commands_flow_through_events() {
        let mut app = App::new();
        let registry = test_registry(app.world_mut());
        app.add_event::<SimCommand>()
           .init_resource::<SimulationState>()
           .insert_resource(ViewerSettings::default())
           .insert_resource(ViewMode { real_view: true })
           .insert_resource(registry)
           .add_systems(Update, apply_commands);

        app.world_mut().send_event(SimCommand::ToggleOverlays);
        app.world_mut().send_event(SimCommand::SpeedUp);
        app.world_mut().send_event(SimCommand::ToggleRealView);
        app.update();

        let registry = app.world().resource::<BodyRegistry>();
        assert!(BodyId::ALL.iter().all(|id| !registry.overlays_visible(*id)));
        assert!((app.world().resource::<SimulationState>().speed_mult - 1.1).abs() < 1e-6);
        assert!(!app.world().resource::<ViewMode>().real_view);
    }
}
