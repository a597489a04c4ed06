use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::systems::OrrerySet;
use crate::systems::bodies::{BodyRegistry, SatelliteOf};
use crate::systems::time::SimulationState;

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (
            advance_rotors,
            sync_satellite_visibility.run_if(resource_exists_and_changed::<BodyRegistry>),
        ).in_set(OrrerySet::Simulate));
    }
}

/// Steady rotation about the local Y axis.
///
/// Used both for orbit pivots (revolution) and meshes (spin). The angle is
/// kept in [0, TAU) so it stays precise no matter how long the scene runs.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Rotor {
    pub rate: f32,
    pub angle: f32,
}

impl Rotor {
    pub fn new(rate: f32) -> Self {
        Self { rate, angle: 0.0 }
    }

    pub fn advance(&mut self, speed_mult: f32) {
        self.angle = (self.angle + self.rate * speed_mult).rem_euclid(TAU);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle)
    }
}

// one step per rendered frame while unpaused, disabled satellites stay frozen
fn advance_rotors(
    state: Res<SimulationState>,
    registry: Option<Res<BodyRegistry>>,
    mut rotors: Query<(&mut Rotor, &mut Transform, Option<&SatelliteOf>)>,
) {
    if !state.advances() {
        return;
    }

    for (mut rotor, mut transform, satellite) in rotors.iter_mut() {
        if let Some(SatelliteOf(owner)) = satellite {
            let enabled = registry.as_ref().is_some_and(|r| r.satellite_enabled(*owner));
            if !enabled {
                continue;
            }
        }

        rotor.advance(state.speed_mult);
        transform.rotation = rotor.rotation();
    }
}

// hidden rather than despawned so re-enabling resumes from the frozen angle
fn sync_satellite_visibility(
    registry: Res<BodyRegistry>,
    mut visibilities: Query<&mut Visibility>,
) {
    for record in registry.iter() {
        let Some(satellite) = record.satellite else { continue };

        if let Ok(mut visibility) = visibilities.get_mut(satellite.pivot) {
            let wanted = if satellite.enabled {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
            visibility.set_if_neq(wanted);
        }
    }
}
