use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// Scene scale (arbitrary scene units)
pub const STAR_RADIUS: f32 = 15.0;
pub const CORONA_RADIUS: f32 = 17.5;
pub const CORONA_SCALE: f32 = 1.03;
pub const ORBIT_PATH_SEGMENTS: usize = 200;

// Star pulse, cosmetic only
pub const PULSE_FREQUENCY: f32 = 0.8;
pub const PULSE_AMPLITUDE: f32 = 0.02;

// Labels
pub const LABEL_HEIGHT: f32 = 1.0;
pub const LABEL_BOB_FREQUENCY: f32 = 0.5;
pub const LABEL_BOB_AMPLITUDE: f32 = 0.06;
pub const LABEL_FONT_SIZE: f32 = 13.0;

// Simulation speed band, enforced by the step bindings only
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 20.0;
pub const SPEED_STEP: f32 = 0.1;

// Camera
pub const CAMERA_START: Vec3 = Vec3::new(-50.0, 90.0, 150.0);
pub const CAMERA_MIN_DISTANCE: f32 = 8.0;
pub const CAMERA_MAX_DISTANCE: f32 = 2000.0;
pub const CAMERA_FOV_DEGREES: f32 = 60.0;
pub const CAMERA_FAR: f32 = 3000.0;
pub const SCROLL_PIXELS_PER_LINE: f32 = 100.0;

// Fly-to framing
pub const FLY_DURATION: f32 = 1.2;
pub const FLY_MIN_HEIGHT: f32 = 8.0;
pub const FLY_HEIGHT_PADDING: f32 = 8.0;
pub const FLY_BACK_FACTOR: f32 = 3.0;
pub const FLY_BACK_PADDING: f32 = 12.0;

// Starfield
pub const STAR_COUNT: usize = 1200;
pub const STARFIELD_RADIUS: f32 = 800.0;

// Lighting
pub const REAL_VIEW_AMBIENT: f32 = 60.0;
pub const BRIGHT_VIEW_AMBIENT: f32 = 400.0;
pub const SUN_LIGHT_INTENSITY: f32 = 2.0e9;
pub const SUN_LIGHT_RANGE: f32 = 2000.0;
pub const FILL_LIGHT_ILLUMINANCE: f32 = 120.0;

// Asset paths
pub const SETTINGS_PATH: &str = "assets/settings.ron";
pub const SUN_TEXTURE: &str = "textures/sun.jpg";
pub const MERCURY_TEXTURE: &str = "textures/mercury.jpg";
pub const VENUS_TEXTURE: &str = "textures/venus.jpg";
pub const EARTH_TEXTURE: &str = "textures/earth.jpg";
pub const MARS_TEXTURE: &str = "textures/mars.jpg";
pub const JUPITER_TEXTURE: &str = "textures/jupiter.jpg";
pub const SATURN_TEXTURE: &str = "textures/saturn.jpg";
pub const SATURN_RING_TEXTURE: &str = "textures/saturn_ring.png";
pub const URANUS_TEXTURE: &str = "textures/uranus.jpg";
pub const URANUS_RING_TEXTURE: &str = "textures/uranus_ring.png";
pub const NEPTUNE_TEXTURE: &str = "textures/neptune.jpg";
pub const PLUTO_TEXTURE: &str = "textures/pluto.jpg";

/// Errors raised while reading `settings.ron`.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[source] ron::error::SpannedError),
}

/// User-tunable settings, read once at startup.
///
/// Every field has a default so partial files are fine.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub initial_speed: f32,
    pub speed_step: f32,
    pub fly_duration: f32,
    pub bloom: bool,
    pub real_view: bool,
    pub show_overlays: bool,
    pub camera_start: [f32; 3],
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            initial_speed: 1.0,
            speed_step: SPEED_STEP,
            fly_duration: FLY_DURATION,
            bloom: true,
            real_view: true,
            show_overlays: true,
            camera_start: CAMERA_START.to_array(),
        }
    }
}

impl ViewerSettings {
    pub fn from_ron(source: &str) -> Result<Self, SettingsError> {
        ron::from_str(source)
            .map(Self::validated)
            .map_err(SettingsError::Parse)
    }

    // a step must move the speed the way its binding says
    fn validated(mut self) -> Self {
        if !self.speed_step.is_finite() || self.speed_step <= 0.0 {
            warn!("speed_step {} must be positive, using {}", self.speed_step, SPEED_STEP);
            self.speed_step = SPEED_STEP;
        }
        self
    }

    // missing file is not an error, just defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let source = std::fs::read_to_string(path).map_err(SettingsError::Read)?;
        Self::from_ron(&source)
    }

    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{} ({}), using defaults", e, path.display());
                Self::default()
            }
        }
    }

    pub fn camera_start(&self) -> Vec3 {
        Vec3::from_array(self.camera_start)
    }

    pub fn ambient_brightness(&self, real_view: bool) -> f32 {
        if real_view { REAL_VIEW_AMBIENT } else { BRIGHT_VIEW_AMBIENT }
    }
}
