use std::collections::HashMap;

use bevy::prelude::*;
use bevy::render::camera::Camera;
use bevy::window::{PrimaryWindow, Window};

use crate::config::{LABEL_BOB_AMPLITUDE, LABEL_BOB_FREQUENCY, LABEL_FONT_SIZE, STAR_RADIUS};
use crate::systems::OrrerySet;
use crate::systems::bodies::{BodyId, BodyRegistry};
use crate::systems::time::SimulationState;

pub struct LabelPlugin;

impl Plugin for LabelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_labels)
           .add_systems(Update, bob_anchors.in_set(OrrerySet::Simulate))
           .add_systems(Update, update_labels.in_set(OrrerySet::Present));
    }
}

// full ui screen container component
#[derive(Component)]
pub struct LabelContainer;

/// Point in a body's pivot space the on-screen label is pinned to.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub body: BodyId,
    pub height: f32,
    pub distance: f32,
}

// individual body labels
#[derive(Component)]
pub struct BodyLabel {
    pub anchor: Entity,
}

impl LabelAnchor {
    pub fn new(body: BodyId, height: f32, distance: f32) -> Self {
        Self { body, height, distance }
    }

    // small vertical bob, phase keyed to orbit radius so labels don't move in lockstep
    pub fn position(&self, elapsed: f32) -> Vec3 {
        let bob = (elapsed * LABEL_BOB_FREQUENCY + self.distance).sin() * LABEL_BOB_AMPLITUDE;
        Vec3::new(self.distance, self.height + bob, 0.0)
    }
}

// setup UI overlay
pub fn setup_labels(mut commands: Commands) {
    // create UI container covering entire screen
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::NONE),
        LabelContainer,
    ));
}

// cosmetic, keeps going while paused
fn bob_anchors(
    state: Res<SimulationState>,
    mut anchors: Query<(&LabelAnchor, &mut Transform)>,
) {
    for (anchor, mut transform) in anchors.iter_mut() {
        transform.translation = anchor.position(state.elapsed);
    }
}

pub fn update_labels(
    mut commands: Commands,
    registry: Option<Res<BodyRegistry>>,
    anchors: Query<(&GlobalTransform, &LabelAnchor)>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mut labels: Query<(Entity, &mut Node, &mut Visibility, &BodyLabel)>,
    container: Query<Entity, With<LabelContainer>>,
    window: Query<&Window, With<PrimaryWindow>>,
) {
    let (Some(registry), Ok(window), Ok((camera, cam_transform)), Ok(container)) =
        (registry, window.single(), camera.single(), container.single()) else { return; };

    // map existing labels by anchor entity
    let existing_labels: HashMap<Entity, Entity> = labels.iter()
        .map(|(label_entity, _, _, label)| (label.anchor, label_entity))
        .collect();

    for record in registry.iter() {
        let anchor_entity = record.label_anchor;
        let Ok((anchor_transform, anchor)) = anchors.get(anchor_entity) else { continue };
        let world_pos = anchor_transform.translation();

        // check visibility, get screen position
        let visible = record.overlays_visible
            && !is_occluded(world_pos, cam_transform.translation(), Vec3::ZERO, STAR_RADIUS);
        let screen_pos = if visible {
            world_to_screen(world_pos, camera, cam_transform, window.width(), window.height())
        } else {
            None
        };

        if let Some(&label_entity) = existing_labels.get(&anchor_entity) {
            // update existing label
            if let Ok((_, mut node, mut visibility, _)) = labels.get_mut(label_entity) {
                match screen_pos {
                    Some(pos) => {
                        *visibility = Visibility::Inherited;
                        node.left = Val::Px(pos.x);
                        node.top = Val::Px(pos.y);
                    }
                    None => *visibility = Visibility::Hidden,
                }
            }
        } else if let Some(pos) = screen_pos {
            // create new label
            commands.entity(container).with_children(|parent| {
                parent.spawn((
                    Text::new(anchor.body.name()),
                    TextFont { font_size: LABEL_FONT_SIZE, ..default() },
                    TextColor(Color::srgb_u8(0xff, 0xe8, 0xb6)),
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(pos.x),
                        top: Val::Px(pos.y),
                        ..default()
                    },
                    BodyLabel { anchor: anchor_entity },
                ));
            });
        }
    }
}

// UTILS

// convert world coordinates to screen coordinates
fn world_to_screen(
    world_pos: Vec3,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    screen_width: f32,
    screen_height: f32,
) -> Option<Vec2> {
    let view_matrix = camera_transform.compute_matrix().inverse();
    project(camera.clip_from_view() * view_matrix, world_pos, screen_width, screen_height)
}

fn project(view_projection: Mat4, world_pos: Vec3, screen_width: f32, screen_height: f32) -> Option<Vec2> {
    // transform to clip space
    let clip_pos = view_projection * world_pos.extend(1.0);

    if clip_pos.w <= 0.0 { return None; } // behind camera

    // convert to NDC and check bounds
    let ndc = clip_pos.xyz() / clip_pos.w;
    if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 { return None; } // offscreen

    // NDC to screen coordinates
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * screen_width,
        (1.0 - ndc.y) * 0.5 * screen_height, // Y is flipped
    ))
}

// check if the star sits between camera and point
// simple ray-sphere test
fn is_occluded(point: Vec3, cam_pos: Vec3, center: Vec3, radius: f32) -> bool {
    let cam_to_point = point - cam_pos;
    let Some(direction) = cam_to_point.try_normalize() else { return false };

    let projection = (center - cam_pos).dot(direction);
    if projection < 0.0 || projection > cam_to_point.length() { return false; }

    let closest_point = cam_pos + direction * projection;
    (closest_point - center).length() < radius
}
