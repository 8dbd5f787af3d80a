//! Per-vertex transforms from local space to world and clip space.
//!
//! A draw call picks exactly one [`ModelTransform`] mode up front. The
//! mode is matched once per batch, never per vertex, and every vertex is
//! then transformed independently of the others.
//!
//! Normals are transformed by the model matrix itself rather than its
//! inverse-transpose, so non-uniform scale skews them. Lighting downstream
//! re-normalizes the normal but does not correct its direction.

use glam::{Mat4, Vec2, Vec3, Vec4};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::CameraState;

/// Local-space attributes of one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexAttributes {
    /// Homogeneous position, `w == 1`.
    pub position: Vec4,
    /// Homogeneous direction, `w == 0`.
    pub normal: Vec4,
    pub uv: Vec2,
}

impl VertexAttributes {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.extend(1.0),
            normal: normal.extend(0.0),
            uv,
        }
    }

    /// Vertex without a normal or texture coordinate, for flat passes.
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO, Vec2::ZERO)
    }

    pub fn from_position_uv(position: Vec3, uv: Vec2) -> Self {
        Self::new(position, Vec3::ZERO, uv)
    }
}

/// Model matrix streamed per instance as four column vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstanceTransform {
    pub cols: [Vec4; 4],
}

impl InstanceTransform {
    pub fn from_model(model: Mat4) -> Self {
        Self {
            cols: [model.x_axis, model.y_axis, model.z_axis, model.w_axis],
        }
    }

    pub fn to_model(&self) -> Mat4 {
        Mat4::from_cols(self.cols[0], self.cols[1], self.cols[2], self.cols[3])
    }
}

/// How the model transform reaches the vertex stage for one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelTransform {
    /// One model matrix shared by every vertex of the draw.
    Direct(Mat4),
    /// Model matrix rebuilt from each instance's [`InstanceTransform`].
    Instanced,
    /// Projection-view and model already folded into one matrix.
    Precomposed(Mat4),
}

/// Transform in effect for a single vertex once the draw mode is resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedTransform {
    Model(Mat4),
    Precomposed(Mat4),
}

/// A draw call's transform inputs: the selected mode plus the instance stream.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    mode: ModelTransform,
    instances: &'a [InstanceTransform],
}

impl<'a> DrawCall<'a> {
    pub fn direct(model: Mat4) -> Self {
        Self {
            mode: ModelTransform::Direct(model),
            instances: &[],
        }
    }

    pub fn instanced(instances: &'a [InstanceTransform]) -> Self {
        Self {
            mode: ModelTransform::Instanced,
            instances,
        }
    }

    pub fn precomposed(combined: Mat4) -> Self {
        Self {
            mode: ModelTransform::Precomposed(combined),
            instances: &[],
        }
    }

    pub fn mode(&self) -> ModelTransform {
        self.mode
    }

    pub fn instance_count(&self) -> usize {
        match self.mode {
            ModelTransform::Instanced => self.instances.len(),
            ModelTransform::Direct(_) | ModelTransform::Precomposed(_) => 1,
        }
    }

    /// Returns the transform for the given instance, or `None` when an
    /// instanced draw has no such instance.
    pub fn resolve(&self, instance: usize) -> Option<ResolvedTransform> {
        match self.mode {
            ModelTransform::Direct(model) => Some(ResolvedTransform::Model(model)),
            ModelTransform::Precomposed(combined) => {
                Some(ResolvedTransform::Precomposed(combined))
            }
            ModelTransform::Instanced => self
                .instances
                .get(instance)
                .map(|instance| ResolvedTransform::Model(instance.to_model())),
        }
    }
}

/// World-space attributes handed to the rasterizer for interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldAttributes {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Result of the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    pub clip_position: Vec4,
    /// `None` for precomposed draws, which only produce clip positions.
    pub world: Option<WorldAttributes>,
    pub uv: Vec2,
}

pub struct GeometryTransformer;

impl GeometryTransformer {
    pub fn transform(
        vertex: &VertexAttributes,
        transform: ResolvedTransform,
        camera: &CameraState,
    ) -> VertexOutput {
        match transform {
            ResolvedTransform::Model(model) => Self::transform_model(vertex, model, camera),
            ResolvedTransform::Precomposed(combined) => {
                Self::transform_precomposed(vertex, combined)
            }
        }
    }

    pub fn transform_model(
        vertex: &VertexAttributes,
        model: Mat4,
        camera: &CameraState,
    ) -> VertexOutput {
        debug_assert_homogeneous(vertex);
        let world_position = model * vertex.position;
        let world_normal = model * vertex.normal;
        VertexOutput {
            clip_position: camera.projection_view * model * vertex.position,
            world: Some(WorldAttributes {
                position: world_position.truncate(),
                normal: world_normal.truncate(),
            }),
            uv: vertex.uv,
        }
    }

    pub fn transform_precomposed(vertex: &VertexAttributes, combined: Mat4) -> VertexOutput {
        debug_assert_homogeneous(vertex);
        VertexOutput {
            clip_position: combined * vertex.position,
            world: None,
            uv: vertex.uv,
        }
    }
}

/// Transforms every vertex of a draw call in parallel.
///
/// Instanced draws emit all vertices of instance 0, then instance 1, and
/// so on. Output order never depends on the thread count.
pub fn transform_draw(
    vertices: &[VertexAttributes],
    draw: &DrawCall<'_>,
    camera: &CameraState,
) -> Vec<VertexOutput> {
    debug!(
        "transforming {} vertices x {} instance(s) in {:?} mode",
        vertices.len(),
        draw.instance_count(),
        draw.mode()
    );
    match draw.mode {
        ModelTransform::Direct(model) => vertices
            .par_iter()
            .map(|vertex| GeometryTransformer::transform_model(vertex, model, camera))
            .collect(),
        ModelTransform::Precomposed(combined) => vertices
            .par_iter()
            .map(|vertex| GeometryTransformer::transform_precomposed(vertex, combined))
            .collect(),
        ModelTransform::Instanced => draw
            .instances
            .par_iter()
            .flat_map_iter(|instance| {
                let model = instance.to_model();
                vertices
                    .iter()
                    .map(move |vertex| GeometryTransformer::transform_model(vertex, model, camera))
            })
            .collect(),
    }
}

fn debug_assert_homogeneous(vertex: &VertexAttributes) {
    debug_assert!(
        vertex.position.w == 1.0,
        "vertex position must have w == 1, got {}",
        vertex.position.w
    );
    debug_assert!(
        vertex.normal.w == 0.0,
        "vertex normal must have w == 0, got {}",
        vertex.normal.w
    );
}
