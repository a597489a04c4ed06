//! Camera fly-to state machine.
//!
//! Pure data; the camera plugin drives it once per frame with wall-clock time.

use bevy::prelude::*;

use crate::config::{FLY_BACK_FACTOR, FLY_BACK_PADDING, FLY_HEIGHT_PADDING, FLY_MIN_HEIGHT};

/// Quadratic ease-in-ease-out over `t` in [0, 1].
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

// back along +Z and up, never closer than the floor for tiny bodies
pub fn framing_offset(visual_radius: f32) -> Vec3 {
    Vec3::new(
        0.0,
        FLY_MIN_HEIGHT.max(visual_radius + FLY_HEIGHT_PADDING),
        visual_radius * FLY_BACK_FACTOR + FLY_BACK_PADDING,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightFrame {
    pub position: Vec3,
    pub look_at: Vec3,
    pub finished: bool,
}

/// At most one flight exists; a new request replaces the current one.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub enum CameraFlight {
    #[default]
    Idle,
    Flying {
        from: Vec3,
        to: Vec3,
        look_at: Vec3,
        start: f32,
        duration: f32,
    },
}

impl CameraFlight {
    /// Start a flight from wherever the camera is right now.
    ///
    /// Mid-flight the camera already sits on the interpolated point, so
    /// re-requesting retargets smoothly from there.
    pub fn begin(camera_position: Vec3, target: Vec3, visual_radius: f32, now: f32, duration: f32) -> Self {
        CameraFlight::Flying {
            from: camera_position,
            to: target + framing_offset(visual_radius),
            look_at: target,
            start: now,
            duration,
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self, CameraFlight::Flying { .. })
    }

    pub fn progress(&self, now: f32) -> Option<f32> {
        match *self {
            CameraFlight::Idle => None,
            CameraFlight::Flying { start, duration, .. } => {
                if duration <= 0.0 {
                    return Some(1.0);
                }
                Some(((now - start) / duration).clamp(0.0, 1.0))
            }
        }
    }

    pub fn sample(&self, now: f32) -> Option<FlightFrame> {
        let t = self.progress(now)?;
        let CameraFlight::Flying { from, to, look_at, .. } = *self else {
            return None;
        };

        Some(FlightFrame {
            position: from.lerp(to, ease_in_out(t)),
            look_at,
            finished: t >= 1.0,
        })
    }

    /// Sample this frame and drop back to idle once the flight lands.
    pub fn step(&mut self, now: f32) -> Option<FlightFrame> {
        let frame = self.sample(now)?;
        if frame.finished {
            *self = CameraFlight::Idle;
        }
        Some(frame)
    }
}
