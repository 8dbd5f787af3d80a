use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};
use log::debug;
use parking_lot::RwLock;
use rayon::prelude::*;

use crate::camera::CameraState;
use crate::geometry::VertexOutput;
use crate::light::LightSet;
use crate::shading::ShadingAccumulator;
use crate::surface::{BaseColorSampler, SurfaceColorResolver};

/// Interpolated attributes of one rasterized point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub world_position: Vec3,
    pub world_normal: Vec3,
    pub uv: Vec2,
}

impl Fragment {
    /// Reads the lighting inputs straight off a vertex, as if the
    /// rasterizer landed exactly on it. Precomposed outputs have none.
    pub fn from_vertex(vertex: &VertexOutput) -> Option<Self> {
        vertex.world.map(|world| Self {
            world_position: world.position,
            world_normal: world.normal,
            uv: vertex.uv,
        })
    }
}

/// Camera and lights for one frame. Never mutated once published.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSnapshot {
    pub camera: CameraState,
    pub lights: LightSet,
}

impl FrameSnapshot {
    pub fn new(camera: CameraState, lights: LightSet) -> Self {
        Self { camera, lights }
    }

    pub fn light_energy(&self, fragment: &Fragment) -> Vec3 {
        ShadingAccumulator::accumulate(
            fragment.world_position,
            fragment.world_normal,
            self.camera.world_position,
            &self.lights,
        )
    }

    /// Final opaque color of one fragment.
    pub fn shade<S>(&self, fragment: &Fragment, sampler: &S) -> Vec4
    where
        S: BaseColorSampler + ?Sized,
    {
        SurfaceColorResolver::resolve_sampled(self.light_energy(fragment), sampler, fragment.uv)
    }

    /// Shades a batch in parallel; the output lines up index-for-index
    /// with `fragments`.
    pub fn shade_fragments<S>(&self, fragments: &[Fragment], sampler: &S) -> Vec<Vec4>
    where
        S: BaseColorSampler + Sync + ?Sized,
    {
        debug!("shading {} fragments", fragments.len());
        fragments
            .par_iter()
            .map(|fragment| self.shade(fragment, sampler))
            .collect()
    }
}

/// Shared handle through which the frame loop publishes snapshots.
///
/// Draws hold on to the `Arc` they acquired, so publishing the next frame
/// never changes inputs under an in-flight draw.
#[derive(Debug)]
pub struct FrameState {
    published: Arc<RwLock<Published>>,
}

#[derive(Debug)]
struct Published {
    number: u64,
    snapshot: Arc<FrameSnapshot>,
}

impl Clone for FrameState {
    fn clone(&self) -> Self {
        Self {
            published: Arc::clone(&self.published),
        }
    }
}

impl Default for FrameState {
    fn default() -> Self {
        Self::new(FrameSnapshot::default())
    }
}

impl FrameState {
    pub fn new(snapshot: FrameSnapshot) -> Self {
        Self {
            published: Arc::new(RwLock::new(Published {
                number: 1,
                snapshot: Arc::new(snapshot),
            })),
        }
    }

    /// Publishes the snapshot for a new frame and returns its number.
    pub fn begin_frame(&self, snapshot: FrameSnapshot) -> u64 {
        let (globals, points, spots) = snapshot.lights.active_counts();
        let mut published = self.published.write();
        published.number += 1;
        published.snapshot = Arc::new(snapshot);
        debug!(
            "frame {} published ({globals} global, {points} point, {spots} spot lights)",
            published.number
        );
        published.number
    }

    /// Returns the snapshot current at the time of the call.
    pub fn acquire(&self) -> Arc<FrameSnapshot> {
        Arc::clone(&self.published.read().snapshot)
    }

    /// Number of snapshots published so far, including the initial one.
    pub fn frame_count(&self) -> u64 {
        self.published.read().number
    }
}
