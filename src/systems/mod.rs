use std::path::Path;

use bevy::prelude::*;

use crate::config::{SETTINGS_PATH, ViewerSettings};

pub mod bodies;
pub mod camera;
pub mod control;
pub mod flight;
pub mod input;
pub mod labels;
pub mod motion;
pub mod picking;
pub mod sun;
pub mod time;
pub mod ui;

/// Per-frame ordering: clock, then input, then the simulation step, then
/// the camera, then everything that only presents state.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrrerySet {
    Clock,
    Input,
    Simulate,
    Camera,
    Present,
}

pub struct OrreryPlugin;

impl Plugin for OrreryPlugin {
    fn build(&self, app: &mut App) {
        // loaded here rather than in main so the log subscriber is already up
        if !app.world().contains_resource::<ViewerSettings>() {
            app.insert_resource(ViewerSettings::load_or_default(Path::new(SETTINGS_PATH)));
        }

        app.configure_sets(Update, (
                OrrerySet::Clock,
                OrrerySet::Input,
                OrrerySet::Simulate,
                OrrerySet::Camera,
                OrrerySet::Present,
            ).chain())
           .add_plugins((
                time::TimePlugin,
                control::ControlPlugin,
                bodies::BodiesPlugin,
                motion::MotionPlugin,
                sun::SunPlugin,
                labels::LabelPlugin,
                camera::OrbitCamPlugin,
                picking::PickingPlugin,
                input::InputPlugin,
                ui::UIPlugin,
            ));
    }
}
