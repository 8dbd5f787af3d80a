use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::LightSetError;

pub const MAX_GLOBAL_LIGHTS: usize = 4;
pub const MAX_POINT_LIGHTS: usize = 8;
pub const MAX_SPOT_LIGHTS: usize = 8;

/// Directional light approximating an infinitely distant source.
///
/// `direction` points from the light toward the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalLight {
    pub color: Vec3,
    pub power: f32,
    pub direction: Vec3,
}

impl Default for GlobalLight {
    fn default() -> Self {
        Self {
            color: Vec3::ZERO,
            power: 0.0,
            direction: Vec3::NEG_Y,
        }
    }
}

/// Omnidirectional light. `radius` is carried but does not attenuate energy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub radius: f32,
    pub color: Vec3,
    pub power: f32,
}

/// Hard-edged cone light. `cut_off` is the cosine of the cone half-angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub position: Vec3,
    pub radius: f32,
    pub color: Vec3,
    pub power: f32,
    pub direction: Vec3,
    pub cut_off: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: 0.0,
            color: Vec3::ZERO,
            power: 0.0,
            direction: Vec3::NEG_Y,
            cut_off: 1.0,
        }
    }
}

/// Category of a light record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    Global,
    Point,
    Spot,
}

impl LightKind {
    pub fn capacity(self) -> usize {
        match self {
            Self::Global => MAX_GLOBAL_LIGHTS,
            Self::Point => MAX_POINT_LIGHTS,
            Self::Spot => MAX_SPOT_LIGHTS,
        }
    }
}

impl fmt::Display for LightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Global => "global",
            Self::Point => "point",
            Self::Spot => "spot",
        };
        f.write_str(name)
    }
}

/// Fixed-capacity light collections shared by every fragment of a draw.
///
/// Every slot is evaluated; unused slots must hold padding records (zero
/// color) so they add no energy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LightSet {
    pub globals: [GlobalLight; MAX_GLOBAL_LIGHTS],
    pub points: [PointLight; MAX_POINT_LIGHTS],
    pub spots: [SpotLight; MAX_SPOT_LIGHTS],
}

impl LightSet {
    pub fn builder() -> LightSetBuilder {
        LightSetBuilder::default()
    }

    /// Number of slots per kind whose color is non-zero, as `(global, point, spot)`.
    pub fn active_counts(&self) -> (usize, usize, usize) {
        let lit = |color: Vec3| color != Vec3::ZERO;
        (
            self.globals.iter().filter(|l| lit(l.color)).count(),
            self.points.iter().filter(|l| lit(l.color)).count(),
            self.spots.iter().filter(|l| lit(l.color)).count(),
        )
    }
}

/// Collects lights in order and pads the remainder of each array.
#[derive(Debug, Clone, Default)]
pub struct LightSetBuilder {
    globals: Vec<GlobalLight>,
    points: Vec<PointLight>,
    spots: Vec<SpotLight>,
}

impl LightSetBuilder {
    pub fn global(&mut self, light: GlobalLight) -> Result<&mut Self, LightSetError> {
        push_bounded(&mut self.globals, light, LightKind::Global)?;
        Ok(self)
    }

    pub fn point(&mut self, light: PointLight) -> Result<&mut Self, LightSetError> {
        push_bounded(&mut self.points, light, LightKind::Point)?;
        Ok(self)
    }

    pub fn spot(&mut self, light: SpotLight) -> Result<&mut Self, LightSetError> {
        push_bounded(&mut self.spots, light, LightKind::Spot)?;
        Ok(self)
    }

    pub fn build(&self) -> LightSet {
        let mut set = LightSet::default();
        set.globals[..self.globals.len()].copy_from_slice(&self.globals);
        set.points[..self.points.len()].copy_from_slice(&self.points);
        set.spots[..self.spots.len()].copy_from_slice(&self.spots);
        set
    }
}

fn push_bounded<T>(slots: &mut Vec<T>, light: T, kind: LightKind) -> Result<(), LightSetError> {
    let capacity = kind.capacity();
    if slots.len() >= capacity {
        return Err(LightSetError::CapacityExceeded { kind, capacity });
    }
    slots.push(light);
    Ok(())
}
