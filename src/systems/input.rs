use bevy::prelude::*;

use crate::systems::OrrerySet;
use crate::systems::control::SimCommand;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, keyboard.in_set(OrrerySet::Input));
    }
}

pub fn binding(key: KeyCode) -> Option<SimCommand> {
    match key {
        KeyCode::Space => Some(SimCommand::TogglePause),
        KeyCode::ArrowUp => Some(SimCommand::SpeedUp),
        KeyCode::ArrowDown => Some(SimCommand::SpeedDown),
        KeyCode::KeyH => Some(SimCommand::ToggleOverlays),
        KeyCode::KeyV => Some(SimCommand::ToggleRealView),
        KeyCode::KeyR => Some(SimCommand::Reset),
        _ => None,
    }
}

fn keyboard(keys: Res<ButtonInput<KeyCode>>, mut commands: EventWriter<SimCommand>) {
    for key in keys.get_just_pressed() {
        if let Some(command) = binding(*key) {
            commands.write(command);
        }
    }
}
