use crate::config::*;

/// Identifier for every orbiting body in the scene, in orbit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl BodyId {
    pub const ALL: [BodyId; 9] = [
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
        BodyId::Pluto,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn descriptor(self) -> &'static BodyDescriptor {
        &BODIES[self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingDescriptor {
    pub inner: f32,
    pub outer: f32,
    pub texture: &'static str,
}

/// Real-world figures shown in the info panel.
/// A negative rotation period means retrograde rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFacts {
    pub radius_km: f64,
    pub orbital_period_days: f64,
    pub rotation_hours: f64,
}

// moon and satellite hang off a body's spinning mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentDescriptor {
    pub offset: [f32; 3],
    pub orbit_rate: f32,
    pub spin_rate: f32,
}

/// Static description of one body. Rates are radians per frame at 1x speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDescriptor {
    pub id: BodyId,
    pub name: &'static str,
    pub size: f32,
    pub distance: f32,
    pub orbit_rate: f32,
    pub spin_rate: f32,
    pub texture: &'static str,
    pub ring: Option<RingDescriptor>,
    pub facts: Option<BodyFacts>,
    pub moon: Option<AttachmentDescriptor>,
    pub satellite: Option<AttachmentDescriptor>,
}

pub const MOON_RADIUS: f32 = 1.6;
pub const SATELLITE_SIZE: f32 = 0.6;

pub static BODIES: [BodyDescriptor; 9] = [
    BodyDescriptor {
        id: BodyId::Mercury,
        name: "Mercury",
        size: 3.2,
        distance: 28.0,
        orbit_rate: 0.004,
        spin_rate: 0.004,
        texture: MERCURY_TEXTURE,
        ring: None,
        facts: Some(BodyFacts { radius_km: 2439.7, orbital_period_days: 88.0, rotation_hours: 1407.6 }),
        moon: None,
        satellite: None,
    },
    BodyDescriptor {
        id: BodyId::Venus,
        name: "Venus",
        size: 5.8,
        distance: 44.0,
        orbit_rate: 0.015,
        spin_rate: 0.002,
        texture: VENUS_TEXTURE,
        ring: None,
        facts: Some(BodyFacts { radius_km: 6051.8, orbital_period_days: 224.7, rotation_hours: -5832.5 }),
        moon: None,
        satellite: None,
    },
    BodyDescriptor {
        id: BodyId::Earth,
        name: "Earth",
        size: 6.0,
        distance: 62.0,
        orbit_rate: 0.01,
        spin_rate: 0.02,
        texture: EARTH_TEXTURE,
        ring: None,
        facts: Some(BodyFacts { radius_km: 6371.0, orbital_period_days: 365.25, rotation_hours: 23.93 }),
        moon: Some(AttachmentDescriptor { offset: [9.0, 0.0, 0.0], orbit_rate: 0.02, spin_rate: 0.02 }),
        satellite: Some(AttachmentDescriptor { offset: [11.0, 2.0, 0.0], orbit_rate: 0.08, spin_rate: 0.1 }),
    },
    BodyDescriptor {
        id: BodyId::Mars,
        name: "Mars",
        size: 4.0,
        distance: 78.0,
        orbit_rate: 0.008,
        spin_rate: 0.018,
        texture: MARS_TEXTURE,
        ring: None,
        facts: Some(BodyFacts { radius_km: 3389.5, orbital_period_days: 687.0, rotation_hours: 24.62 }),
        moon: None,
        satellite: None,
    },
    BodyDescriptor {
        id: BodyId::Jupiter,
        name: "Jupiter",
        size: 12.0,
        distance: 100.0,
        orbit_rate: 0.002,
        spin_rate: 0.04,
        texture: JUPITER_TEXTURE,
        ring: None,
        facts: Some(BodyFacts { radius_km: 69911.0, orbital_period_days: 4333.0, rotation_hours: 9.92 }),
        moon: None,
        satellite: None,
    },
    BodyDescriptor {
        id: BodyId::Saturn,
        name: "Saturn",
        size: 10.0,
        distance: 138.0,
        orbit_rate: 0.0009,
        spin_rate: 0.038,
        texture: SATURN_TEXTURE,
        ring: Some(RingDescriptor { inner: 10.0, outer: 20.0, texture: SATURN_RING_TEXTURE }),
        facts: Some(BodyFacts { radius_km: 58232.0, orbital_period_days: 10759.0, rotation_hours: 10.66 }),
        moon: None,
        satellite: None,
    },
    BodyDescriptor {
        id: BodyId::Uranus,
        name: "Uranus",
        size: 7.0,
        distance: 176.0,
        orbit_rate: 0.0004,
        spin_rate: 0.03,
        texture: URANUS_TEXTURE,
        ring: Some(RingDescriptor { inner: 7.0, outer: 12.0, texture: URANUS_RING_TEXTURE }),
        facts: Some(BodyFacts { radius_km: 25362.0, orbital_period_days: 30687.0, rotation_hours: -17.24 }),
        moon: None,
        satellite: None,
    },
    BodyDescriptor {
        id: BodyId::Neptune,
        name: "Neptune",
        size: 7.0,
        distance: 200.0,
        orbit_rate: 0.0001,
        spin_rate: 0.032,
        texture: NEPTUNE_TEXTURE,
        ring: None,
        facts: Some(BodyFacts { radius_km: 24622.0, orbital_period_days: 60190.0, rotation_hours: 16.11 }),
        moon: None,
        satellite: None,
    },
    BodyDescriptor {
        id: BodyId::Pluto,
        name: "Pluto",
        size: 2.8,
        distance: 216.0,
        orbit_rate: 0.0007,
        spin_rate: 0.008,
        texture: PLUTO_TEXTURE,
        ring: None,
        facts: Some(BodyFacts { radius_km: 1188.3, orbital_period_days: 90560.0, rotation_hours: -153.3 }),
        moon: None,
        satellite: None,
    },
];
