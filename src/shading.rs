//! Blinn-style light accumulation for a single surface point.
//!
//! Each light adds `max(n.l, 0) * color + max(n.h, 0)^SHININESS * color`,
//! where `h` is the half vector between the view and light directions.
//! Light `power` is carried by the records but never scales the result,
//! and spot lights use a hard cutoff with no falloff.

use glam::Vec3;

use crate::light::{GlobalLight, LightSet, PointLight, SpotLight};

/// Fixed specular exponent shared by every surface.
pub const SHININESS: f32 = 32.0;

pub struct ShadingAccumulator;

impl ShadingAccumulator {
    /// Sums diffuse and specular energy from every slot of `lights`.
    ///
    /// `surface_normal` need not be unit length but must be non-zero, and
    /// the camera must not sit exactly on the surface point.
    pub fn accumulate(
        surface_position: Vec3,
        surface_normal: Vec3,
        camera_position: Vec3,
        lights: &LightSet,
    ) -> Vec3 {
        let normal = normalize_checked(surface_normal, "surface normal");
        let view_dir = normalize_checked(camera_position - surface_position, "view direction");

        let globals = lights
            .globals
            .iter()
            .map(|light| Self::global_contribution(light, normal, view_dir));
        let points = lights
            .points
            .iter()
            .map(|light| Self::point_contribution(light, surface_position, normal, view_dir));
        let spots = lights
            .spots
            .iter()
            .map(|light| Self::spot_contribution(light, surface_position, normal, view_dir));

        globals.chain(points).chain(spots).sum()
    }

    pub fn global_contribution(light: &GlobalLight, normal: Vec3, view_dir: Vec3) -> Vec3 {
        let light_dir = (-light.direction).normalize();
        blinn(normal, view_dir, light_dir, light.color)
    }

    pub fn point_contribution(
        light: &PointLight,
        surface_position: Vec3,
        normal: Vec3,
        view_dir: Vec3,
    ) -> Vec3 {
        let light_dir = (light.position - surface_position).normalize();
        blinn(normal, view_dir, light_dir, light.color)
    }

    /// Zero unless the surface lies strictly inside the light's cone.
    pub fn spot_contribution(
        light: &SpotLight,
        surface_position: Vec3,
        normal: Vec3,
        view_dir: Vec3,
    ) -> Vec3 {
        let light_dir = (light.position - surface_position).normalize();
        if !in_spot_cone(light, light_dir) {
            return Vec3::ZERO;
        }
        blinn(normal, view_dir, light_dir, light.color)
    }
}

/// Cone test against the spot axis. `light_dir` points from the surface
/// toward the light.
pub fn in_spot_cone(light: &SpotLight, light_dir: Vec3) -> bool {
    light_dir.dot(-light.direction) > light.cut_off
}

fn blinn(normal: Vec3, view_dir: Vec3, light_dir: Vec3, color: Vec3) -> Vec3 {
    let half_dir = (view_dir + light_dir).normalize();
    // f32::max drops a NaN operand, so degenerate directions give a zero lobe.
    let specular = normal.dot(half_dir).max(0.0).powf(SHININESS) * color;
    let diffuse = normal.dot(light_dir).max(0.0) * color;
    specular + diffuse
}

fn normalize_checked(v: Vec3, what: &str) -> Vec3 {
    debug_assert!(
        v.length_squared() > 0.0,
        "{what} must be non-zero before normalization"
    );
    v.normalize()
}
