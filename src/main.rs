use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;

mod config;
mod systems;

use systems::OrreryPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Solar System".into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: Level::INFO,
                    filter: "wgpu=error,naga=warn,bevy_orrery=debug".into(),
                    ..default()
                }),
        )
        .add_plugins(OrreryPlugin)
        .run()
}
