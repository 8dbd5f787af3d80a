//! Plain-old-data layouts for uploading shading inputs to a GPU.
//!
//! Every record is padded to whole `vec4`s so the arrays can be bound as
//! uniform buffers without further repacking.

use bytemuck::{Pod, Zeroable};

use crate::camera::CameraState;
use crate::frame::FrameSnapshot;
use crate::geometry::{InstanceTransform, VertexAttributes};
use crate::light::{
    GlobalLight, LightSet, PointLight, SpotLight, MAX_GLOBAL_LIGHTS, MAX_POINT_LIGHTS,
    MAX_SPOT_LIGHTS,
};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 4],
    pub normal: [f32; 4],
    pub uv: [f32; 2],
}

impl From<&VertexAttributes> for GpuVertex {
    fn from(vertex: &VertexAttributes) -> Self {
        Self {
            position: vertex.position.into(),
            normal: vertex.normal.into(),
            uv: vertex.uv.into(),
        }
    }
}

/// Per-instance model matrix, one column per vertex attribute slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuInstance {
    pub model: [[f32; 4]; 4],
}

impl From<&InstanceTransform> for GpuInstance {
    fn from(instance: &InstanceTransform) -> Self {
        Self {
            model: instance.cols.map(Into::into),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub projection_view: [[f32; 4]; 4],
    pub world_position: [f32; 4],
}

impl From<&CameraState> for CameraUniform {
    fn from(camera: &CameraState) -> Self {
        Self {
            projection_view: camera.projection_view.to_cols_array_2d(),
            world_position: camera.world_position.extend(1.0).into(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuGlobalLight {
    pub color_power: [f32; 4],
    pub direction: [f32; 4],
}

impl From<&GlobalLight> for GpuGlobalLight {
    fn from(light: &GlobalLight) -> Self {
        Self {
            color_power: light.color.extend(light.power).into(),
            direction: light.direction.extend(0.0).into(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuPointLight {
    pub position_radius: [f32; 4],
    pub color_power: [f32; 4],
}

impl From<&PointLight> for GpuPointLight {
    fn from(light: &PointLight) -> Self {
        Self {
            position_radius: light.position.extend(light.radius).into(),
            color_power: light.color.extend(light.power).into(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuSpotLight {
    pub position_radius: [f32; 4],
    pub color_power: [f32; 4],
    pub direction_cut_off: [f32; 4],
}

impl From<&SpotLight> for GpuSpotLight {
    fn from(light: &SpotLight) -> Self {
        Self {
            position_radius: light.position.extend(light.radius).into(),
            color_power: light.color.extend(light.power).into(),
            direction_cut_off: light.direction.extend(light.cut_off).into(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LightSetUniform {
    pub globals: [GpuGlobalLight; MAX_GLOBAL_LIGHTS],
    pub points: [GpuPointLight; MAX_POINT_LIGHTS],
    pub spots: [GpuSpotLight; MAX_SPOT_LIGHTS],
}

impl From<&LightSet> for LightSetUniform {
    fn from(lights: &LightSet) -> Self {
        Self {
            globals: lights.globals.each_ref().map(GpuGlobalLight::from),
            points: lights.points.each_ref().map(GpuPointLight::from),
            spots: lights.spots.each_ref().map(GpuSpotLight::from),
        }
    }
}

/// Everything a frame binds once, in upload order.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub camera: CameraUniform,
    pub lights: LightSetUniform,
}

impl From<&FrameSnapshot> for FrameUniform {
    fn from(frame: &FrameSnapshot) -> Self {
        Self {
            camera: CameraUniform::from(&frame.camera),
            lights: LightSetUniform::from(&frame.lights),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec2, Vec3};
    use std::mem::size_of;

    #[test]
    fn layouts_are_whole_vec4s() {
        assert_eq!(size_of::<GpuVertex>(), 10 * 4);
        assert_eq!(size_of::<GpuInstance>(), 64);
        assert_eq!(size_of::<CameraUniform>(), 80);
        assert_eq!(size_of::<LightSetUniform>(), (4 * 2 + 8 * 2 + 8 * 3) * 16);
        assert_eq!(size_of::<FrameUniform>() % 16, 0);
    }

    #[test]
    fn spot_record_packs_scalars_into_w() {
        let spot = SpotLight {
            position: Vec3::new(1.0, 2.0, 3.0),
            radius: 4.0,
            color: Vec3::new(0.1, 0.2, 0.3),
            power: 5.0,
            direction: Vec3::NEG_Z,
            cut_off: 0.9,
        };
        let packed = GpuSpotLight::from(&spot);
        assert_eq!(packed.position_radius, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(packed.color_power, [0.1, 0.2, 0.3, 5.0]);
        assert_eq!(packed.direction_cut_off, [0.0, 0.0, -1.0, 0.9]);
    }

    #[test]
    fn uniform_bytes_follow_the_light_set() {
        let mut builder = LightSet::builder();
        builder
            .point(PointLight {
                position: Vec3::X,
                radius: 2.0,
                color: Vec3::ONE,
                power: 3.0,
            })
            .unwrap();
        let uniform = LightSetUniform::from(&builder.build());
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniform));
        // Points start after four two-vec4 global records.
        let first_point = &floats[4 * 8..4 * 8 + 8];
        assert_eq!(first_point, &[1.0, 0.0, 0.0, 2.0, 1.0, 1.0, 1.0, 3.0]);
    }

    #[test]
    fn instance_columns_match_the_matrix() {
        let model = Mat4::from_translation(Vec3::new(7.0, 8.0, 9.0));
        let instance = GpuInstance::from(&InstanceTransform::from_model(model));
        assert_eq!(instance.model, model.to_cols_array_2d());

        let vertex = GpuVertex::from(&VertexAttributes::new(Vec3::ONE, Vec3::Y, Vec2::X));
        assert_eq!(vertex.position[3], 1.0);
        assert_eq!(vertex.normal[3], 0.0);
    }
}
