use anyhow::{anyhow, Result};
use glam::{Vec3, Vec4};
use log::debug;

use crate::frame::{Fragment, FrameSnapshot};
use crate::geometry::{transform_draw, DrawCall};
use crate::primitives;
use crate::scene::{Scene, SceneObject};
use crate::surface::SolidColor;

/// Which transform path the driver uses for non-instanced objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPath {
    #[default]
    Direct,
    Precomposed,
}

/// Outcome of drawing one scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectReport {
    pub name: String,
    pub vertices: usize,
    /// Mean shaded color over all vertices; `None` for clip-only draws.
    pub mean_color: Option<Vec3>,
}

/// Transforms an object's mesh and shades each resulting vertex with the
/// object's flat color.
pub fn draw_object(
    frame: &FrameSnapshot,
    object: &SceneObject,
    path: DrawPath,
) -> Result<ObjectReport> {
    let mesh = primitives::by_name(&object.mesh)
        .ok_or_else(|| anyhow!("object {} uses unknown mesh {:?}", object.name, object.mesh))?;

    if object.instances == 0 {
        debug!("{}: zero instances, skipped", object.name);
        return Ok(ObjectReport {
            name: object.name.clone(),
            vertices: 0,
            mean_color: None,
        });
    }

    let instances = object.instance_transforms();
    let draw = if object.is_instanced() {
        DrawCall::instanced(&instances)
    } else {
        match path {
            DrawPath::Direct => DrawCall::direct(object.model_matrix()),
            DrawPath::Precomposed => {
                DrawCall::precomposed(frame.camera.projection_view * object.model_matrix())
            }
        }
    };

    let outputs = transform_draw(&mesh.vertices, &draw, &frame.camera);
    let fragments: Vec<Fragment> = outputs.iter().filter_map(Fragment::from_vertex).collect();
    debug!(
        "{}: {} vertices, {} with world attributes",
        object.name,
        outputs.len(),
        fragments.len()
    );

    let mean_color = if fragments.is_empty() {
        None
    } else {
        let sampler = SolidColor(object.color.extend(1.0));
        let colors = frame.shade_fragments(&fragments, &sampler);
        let sum: Vec4 = colors.iter().copied().sum();
        Some(sum.truncate() / colors.len() as f32)
    };

    Ok(ObjectReport {
        name: object.name.clone(),
        vertices: outputs.len(),
        mean_color,
    })
}

pub fn print_scene_summary(scene: &Scene) {
    let (globals, points, spots) = scene.lights.active_counts();
    println!(
        "Loaded scene with {} objects ({globals} global, {points} point, {spots} spot lights)",
        scene.objects.len()
    );
}

pub fn print_object_names(scene: &Scene) {
    for object in &scene.objects {
        println!(" - {} ({})", object.name, object.mesh);
    }
}

pub fn print_report(report: &ObjectReport) {
    match report.mean_color {
        Some(color) => println!(
            " - {}: {} vertices, mean color=({:.3}, {:.3}, {:.3})",
            report.name, report.vertices, color.x, color.y, color.z
        ),
        None => println!(" - {}: {} vertices (clip only)", report.name, report.vertices),
    }
}
