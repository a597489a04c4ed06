use bevy::math::bounding::{BoundingSphere, RayCast3d};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::systems::OrrerySet;
use crate::systems::bodies::{BodyId, BodyMesh};

pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SelectionEvent>()
           .init_resource::<Selection>()
           .add_systems(Update, pick_on_click.in_set(OrrerySet::Input));
    }
}

/// Tags UI nodes that swallow pointer presses (HUD, info panel).
#[derive(Component, Debug, Default)]
pub struct UiChrome;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection(pub Option<BodyId>);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Changed(BodyId),
    Cleared,
}

// sphere standing in for a body mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickTarget {
    pub body: BodyId,
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    Suppressed,
    Hit(BodyId),
    Miss,
}

/// Nearest body whose sphere the ray passes through.
pub fn nearest_hit(ray: Ray3d, targets: &[PickTarget]) -> Option<BodyId> {
    let cast = RayCast3d::from_ray(ray, f32::MAX);

    targets
        .iter()
        .filter_map(|target| {
            let sphere = BoundingSphere::new(target.center, target.radius);
            cast.sphere_intersection_at(&sphere).map(|distance| (distance, target.body))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, body)| body)
}

/// Resolve a press. Presses over UI chrome never build a ray.
pub fn resolve_pick(
    over_ui: bool,
    ray: impl FnOnce() -> Option<Ray3d>,
    targets: &[PickTarget],
) -> PickOutcome {
    if over_ui {
        return PickOutcome::Suppressed;
    }

    match ray().and_then(|ray| nearest_hit(ray, targets)) {
        Some(body) => PickOutcome::Hit(body),
        None => PickOutcome::Miss,
    }
}

impl Selection {
    pub fn apply(&mut self, outcome: PickOutcome) -> Option<SelectionEvent> {
        match outcome {
            PickOutcome::Suppressed => None,
            PickOutcome::Hit(body) => {
                self.0 = Some(body);
                Some(SelectionEvent::Changed(body))
            }
            PickOutcome::Miss => {
                self.0 = None;
                Some(SelectionEvent::Cleared)
            }
        }
    }
}

fn pick_on_click(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    window: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &GlobalTransform)>,
    chrome: Query<&Interaction, With<UiChrome>>,
    bodies: Query<(&BodyMesh, &GlobalTransform)>,
    mut selection: ResMut<Selection>,
    mut events: EventWriter<SelectionEvent>,
) {
    if !mouse_buttons.just_pressed(MouseButton::Left) {
        return;
    }

    let over_ui = chrome.iter().any(|interaction| *interaction != Interaction::None);

    let targets: Vec<PickTarget> = bodies
        .iter()
        .map(|(body, transform)| PickTarget {
            body: body.0,
            center: transform.translation(),
            radius: body.0.descriptor().size,
        })
        .collect();

    let outcome = resolve_pick(
        over_ui,
        || {
            let cursor = window.single().ok()?.cursor_position()?;
            let (camera, camera_transform) = camera.single().ok()?;
            camera.viewport_to_world(camera_transform, cursor).ok()
        },
        &targets,
    );

    if let Some(event) = selection.apply(outcome) {
        debug!("selection: {:?}", event);
        events.write(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn targets() -> Vec<PickTarget> {
        [BodyId::Mercury, BodyId::Venus, BodyId::Earth]
            .into_iter()
            .map(|body| PickTarget {
                body,
                center: Vec3::new(body.descriptor().distance, 0.0, 0.0),
                radius: body.descriptor().size,
            })
            .collect()
    }

    fn ray(origin: Vec3, direction: Vec3) -> Ray3d {
        Ray3d::new(origin, Dir3::new(direction).unwrap())
    }

    #[test]
    fn ray_through_one_sphere_selects_it() {
        let down_at_venus = ray(Vec3::new(44.0, 100.0, 0.0), Vec3::NEG_Y);
        assert_eq!(nearest_hit(down_at_venus, &targets()), Some(BodyId::Venus));
    }

    #[test]
    fn nearest_sphere_wins() {
        // along +X from the star, Mercury is first in line
        let outward = ray(Vec3::ZERO, Vec3::X);
        assert_eq!(nearest_hit(outward, &targets()), Some(BodyId::Mercury));

        let inward = ray(Vec3::new(500.0, 0.0, 0.0), Vec3::NEG_X);
        assert_eq!(nearest_hit(inward, &targets()), Some(BodyId::Earth));
    }

    #[test]
    fn ray_missing_everything_clears_selection() {
        let mut selection = Selection(Some(BodyId::Earth));
        let away = ray(Vec3::new(0.0, 100.0, 0.0), Vec3::Y);

        let outcome = resolve_pick(false, || Some(away), &targets());
        assert_eq!(outcome, PickOutcome::Miss);
        assert_eq!(selection.apply(outcome), Some(SelectionEvent::Cleared));
        assert_eq!(selection.0, None);
    }

    #[test]
    fn hit_replaces_selection() {
        let mut selection = Selection(Some(BodyId::Mercury));
        let down_at_earth = ray(Vec3::new(62.0, 50.0, 0.0), Vec3::NEG_Y);

        let outcome = resolve_pick(false, || Some(down_at_earth), &targets());
        assert_eq!(selection.apply(outcome), Some(SelectionEvent::Changed(BodyId::Earth)));
        assert_eq!(selection.0, Some(BodyId::Earth));
    }

    #[test]
    fn presses_over_ui_never_cast() {
        let cast = Cell::new(false);
        let mut selection = Selection(Some(BodyId::Mars));

        let outcome = resolve_pick(
            true,
            || {
                cast.set(true);
                None
            },
            &targets(),
        );

        assert_eq!(outcome, PickOutcome::Suppressed);
        assert!(!cast.get());
        assert_eq!(selection.apply(outcome), None);
        assert_eq!(selection.0, Some(BodyId::Mars));
    }
}
