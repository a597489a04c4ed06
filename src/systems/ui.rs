use bevy::prelude::*;

use crate::systems::OrrerySet;
use crate::systems::bodies::{BodyDescriptor, BodyId, BodyRegistry};
use crate::systems::control::SimCommand;
use crate::systems::picking::{Selection, SelectionEvent, UiChrome};
use crate::systems::time::SimulationState;

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_hud, setup_info_panel))
           .add_systems(Update, handle_buttons.in_set(OrrerySet::Input))
           .add_systems(Update, (
                update_hud.run_if(resource_changed::<SimulationState>),
                show_selection,
                refresh_satellite_button.run_if(resource_exists_and_changed::<BodyRegistry>),
            ).chain().in_set(OrrerySet::Present));
    }
}

// HUD text slots
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudText {
    Speed,
    Status,
}

#[derive(Component)]
pub struct InfoPanel;

// info panel text slots
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelText {
    Title,
    Content,
    SatelliteLabel,
}

#[derive(Component)]
pub struct SatelliteButton;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Close,
    FlyTo,
    ToggleSatellite,
    Reset,
}

const PANEL_BACKGROUND: Color = Color::srgba(0.02, 0.03, 0.08, 0.8);
const BUTTON_BACKGROUND: Color = Color::srgba(1.0, 1.0, 1.0, 0.12);

// 12345.6 -> "12,345.6"
pub fn group_thousands(value: f64) -> String {
    let formatted = format!("{}", value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Multi-line fact sheet shown in the info panel.
pub fn describe_body(body: &BodyDescriptor) -> String {
    let missing = "—".to_string();
    let facts = body.facts;

    let radius = facts.map_or(missing.clone(), |f| format!("{} km", group_thousands(f.radius_km)));
    let period = facts.map_or(missing.clone(), |f| format!("{} days", group_thousands(f.orbital_period_days)));
    let rotation = facts.map_or(missing, |f| {
        if f.rotation_hours < 0.0 {
            format!("{} hours (retrograde)", f.rotation_hours)
        } else {
            format!("{} hours", f.rotation_hours)
        }
    });

    format!(
        "Visual radius (units): {}\nOrbit radius (units): {}\nReal radius: {}\nOrbital period: {}\nRotation: {}",
        body.size, body.distance, radius, period, rotation,
    )
}

pub fn satellite_button_label(enabled: bool) -> &'static str {
    if enabled { "Disable Satellite" } else { "Enable Satellite" }
}

fn button(parent: &mut ChildSpawnerCommands, label: &str, action: PanelAction) {
    parent
        .spawn((
            Button,
            UiChrome,
            action,
            Node {
                padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                ..default()
            },
            BackgroundColor(BUTTON_BACKGROUND),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont { font_size: 13.0, ..default() },
                TextColor(Color::WHITE),
            ));
        });
}

fn setup_hud(mut commands: Commands, state: Res<SimulationState>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(20.0),
                top: Val::Px(20.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Start,
                row_gap: Val::Px(5.0),
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            Interaction::default(),
            UiChrome,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(speed_text(&state)),
                TextFont { font_size: 14.0, ..default() },
                TextColor(Color::WHITE),
                HudText::Speed,
            ));

            parent.spawn((
                Text::new(status_text(&state)),
                TextFont { font_size: 14.0, ..default() },
                TextColor(Color::WHITE),
                HudText::Status,
            ));

            parent.spawn((
                Text::new("Space pause  Up/Down speed  H paths  V view  R reset"),
                TextFont { font_size: 11.0, ..default() },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
            ));

            button(parent, "Reset", PanelAction::Reset);
        });
}

fn setup_info_panel(mut commands: Commands) {
    commands
        .spawn((
            Node {
                display: Display::None,
                position_type: PositionType::Absolute,
                right: Val::Px(20.0),
                top: Val::Px(20.0),
                width: Val::Px(300.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            Interaction::default(),
            UiChrome,
            InfoPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont { font_size: 20.0, ..default() },
                TextColor(Color::WHITE),
                PanelText::Title,
            ));

            parent.spawn((
                Text::new(""),
                TextFont { font_size: 13.0, ..default() },
                TextColor(Color::srgb(0.85, 0.85, 0.85)),
                PanelText::Content,
            ));

            parent
                .spawn(Node {
                    column_gap: Val::Px(6.0),
                    ..default()
                })
                .with_children(|row| {
                    button(row, "Fly to", PanelAction::FlyTo);
                    row.spawn((
                        Button,
                        UiChrome,
                        PanelAction::ToggleSatellite,
                        SatelliteButton,
                        Node {
                            padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                            ..default()
                        },
                        BackgroundColor(BUTTON_BACKGROUND),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(satellite_button_label(true)),
                            TextFont { font_size: 13.0, ..default() },
                            TextColor(Color::WHITE),
                            PanelText::SatelliteLabel,
                        ));
                    });
                    button(row, "Close", PanelAction::Close);
                });
        });
}

fn speed_text(state: &SimulationState) -> String {
    format!("Speed: {:.2}x", state.speed_mult)
}

fn status_text(state: &SimulationState) -> String {
    if state.paused { "Paused".into() } else { "Running".into() }
}

fn update_hud(state: Res<SimulationState>, mut texts: Query<(&mut Text, &HudText)>) {
    for (mut text, slot) in texts.iter_mut() {
        let wanted = match slot {
            HudText::Speed => speed_text(&state),
            HudText::Status => status_text(&state),
        };
        // state changes every frame (clock), only touch text when it differs
        if text.0 != wanted {
            text.0 = wanted;
        }
    }
}

// open or close the panel on pick results
fn show_selection(
    mut events: EventReader<SelectionEvent>,
    registry: Option<Res<BodyRegistry>>,
    mut panel: Query<&mut Node, With<InfoPanel>>,
    mut satellite_button: Query<&mut Node, (With<SatelliteButton>, Without<InfoPanel>)>,
    mut texts: Query<(&mut Text, &PanelText)>,
) {
    let Some(event) = events.read().last().copied() else { return };
    let Ok(mut panel) = panel.single_mut() else { return };

    let body = match event {
        SelectionEvent::Changed(body) => body,
        SelectionEvent::Cleared => {
            panel.display = Display::None;
            return;
        }
    };

    let has_satellite = registry.as_ref().is_some_and(|r| r.has_satellite(body));
    let enabled = registry.as_ref().is_some_and(|r| r.satellite_enabled(body));

    for (mut text, slot) in texts.iter_mut() {
        text.0 = match slot {
            PanelText::Title => body.name().to_string(),
            PanelText::Content => describe_body(body.descriptor()),
            PanelText::SatelliteLabel => satellite_button_label(enabled).to_string(),
        };
    }

    if let Ok(mut button) = satellite_button.single_mut() {
        button.display = if has_satellite { Display::Flex } else { Display::None };
    }
    panel.display = Display::Flex;
}

fn refresh_satellite_button(
    registry: Res<BodyRegistry>,
    selection: Res<Selection>,
    mut texts: Query<(&mut Text, &PanelText)>,
) {
    let Some(body) = selection.0 else { return };
    let label = satellite_button_label(registry.satellite_enabled(body));

    for (mut text, slot) in texts.iter_mut() {
        if *slot == PanelText::SatelliteLabel && text.0 != label {
            text.0 = label.to_string();
        }
    }
}

fn handle_buttons(
    buttons: Query<(&Interaction, &PanelAction), (Changed<Interaction>, With<Button>)>,
    mut selection: ResMut<Selection>,
    mut commands: EventWriter<SimCommand>,
    mut selection_events: EventWriter<SelectionEvent>,
) {
    for (interaction, action) in buttons.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }

        match (action, selection.0) {
            (PanelAction::Reset, _) => {
                commands.write(SimCommand::Reset);
            }
            (PanelAction::Close, _) => {
                selection.0 = None;
                selection_events.write(SelectionEvent::Cleared);
            }
            (PanelAction::FlyTo, Some(body)) => {
                commands.write(SimCommand::FlyTo(body));
            }
            (PanelAction::ToggleSatellite, Some(body)) => {
                commands.write(SimCommand::ToggleSatellite(body));
            }
            _ => {}
        }
    }
}
