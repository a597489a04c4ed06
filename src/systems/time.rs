use bevy::prelude::*;

use crate::config::{MAX_SPEED, MIN_SPEED, ViewerSettings};
use crate::systems::OrrerySet;

pub struct TimePlugin;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationState>()
           .add_systems(PreStartup, apply_settings)
           .add_systems(Update, tick.in_set(OrrerySet::Clock));
    }
}

/// Central time control state for the entire simulation.
///
/// `elapsed` is wall-clock time and keeps running while paused, so cosmetic
/// effects and camera flights are unaffected by the pause flag.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub paused: bool,
    pub speed_mult: f32,
    pub elapsed: f32,
    pub frame_delta: f32,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            paused: false,
            speed_mult: 1.0,
            elapsed: 0.0,
            frame_delta: 0.0,
        }
    }
}

impl SimulationState {
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    // snap to hundredths so repeated steps don't drift away from the display,
    // a step from anywhere lands back inside the band
    pub fn speed_up(&mut self, step: f32) {
        self.speed_mult = round_hundredths(self.speed_mult + step).clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn slow_down(&mut self, step: f32) {
        self.speed_mult = round_hundredths(self.speed_mult - step).clamp(MIN_SPEED, MAX_SPEED);
    }

    // the core accepts any positive multiplier, the band is a UI concern
    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_finite() && speed > 0.0 {
            self.speed_mult = speed;
        }
    }

    pub fn reset_speed(&mut self, speed: f32) {
        self.speed_mult = 1.0;
        self.set_speed(speed);
    }

    /// True when this frame should move bodies along their orbits.
    pub fn advances(&self) -> bool {
        !self.paused && self.frame_delta > 0.0
    }

    pub fn record_frame(&mut self, delta: f32) {
        self.frame_delta = delta.max(0.0);
        self.elapsed += self.frame_delta;
    }
}

fn round_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn apply_settings(settings: Res<ViewerSettings>, mut state: ResMut<SimulationState>) {
    state.set_speed(settings.initial_speed);
}

fn tick(mut state: ResMut<SimulationState>, time: Res<Time>) {
    state.record_frame(time.delta_secs());
}
