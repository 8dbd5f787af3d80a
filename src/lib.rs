//! Vertex transforms and Blinn-style surface shading for a forward renderer,
//! evaluated on the CPU.
//!
//! Vertices go through [`GeometryTransformer`] to produce clip-space and
//! world-space attributes. Fragments are lit by [`ShadingAccumulator`]
//! against a fixed-capacity [`LightSet`] and finished by
//! [`SurfaceColorResolver`]. Every evaluation is a pure function of its
//! inputs, so batches run in parallel and give the same result in any order.
//! Texture sampling, rasterization and window management stay outside the
//! crate.

pub mod app;
pub mod camera;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod gpu;
pub mod light;
pub mod primitives;
pub mod scene;
pub mod shading;
pub mod surface;

pub use app::{draw_object, print_object_names, print_report, print_scene_summary, DrawPath};
pub use camera::CameraState;
pub use error::LightSetError;
pub use frame::{Fragment, FrameSnapshot, FrameState};
pub use geometry::{
    transform_draw, DrawCall, GeometryTransformer, InstanceTransform, ModelTransform,
    ResolvedTransform, VertexAttributes, VertexOutput, WorldAttributes,
};
pub use light::{
    GlobalLight, LightKind, LightSet, LightSetBuilder, PointLight, SpotLight, MAX_GLOBAL_LIGHTS,
    MAX_POINT_LIGHTS, MAX_SPOT_LIGHTS,
};
pub use scene::{Scene, SceneObject};
pub use shading::{ShadingAccumulator, SHININESS};
pub use surface::{
    ambient_color, BaseColorSampler, SolidColor, SurfaceColorResolver, AMBIENT_STRENGTH,
};
