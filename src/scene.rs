use anyhow::{anyhow, Context, Result};
use glam::{Mat4, Vec3};
use log::warn;
use roxmltree::{Document, Node};

use crate::camera::CameraState;
use crate::frame::FrameSnapshot;
use crate::geometry::InstanceTransform;
use crate::light::{GlobalLight, LightSet, LightSetBuilder, PointLight, SpotLight};

/// Camera, lights and objects described by a scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub camera: CameraState,
    pub lights: LightSet,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Parses a scene XML document.
    ///
    /// ```xml
    /// <scene>
    ///   <camera><position>0 2 6</position><target>0 0 0</target><fov>60</fov></camera>
    ///   <light><type>global</type><direction>0 -1 0</direction><color>255 255 255</color></light>
    ///   <object><name>Floor</name><mesh>plane</mesh><scale>4 1 4</scale></object>
    /// </scene>
    /// ```
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid scene XML")?;
        let root = document.root_element();

        let camera = match root.children().find(|n| n.has_tag_name("camera")) {
            Some(node) => parse_camera(&node).context("invalid <camera>")?,
            None => {
                warn!("scene has no <camera>; using the default view");
                default_camera()
            }
        };

        let mut builder = LightSet::builder();
        for (index, node) in root
            .children()
            .filter(|n| n.has_tag_name("light"))
            .enumerate()
        {
            add_light(&node, &mut builder).with_context(|| format!("invalid light #{index}"))?;
        }

        let mut objects = Vec::new();
        for node in root.children().filter(|n| n.has_tag_name("object")) {
            objects.push(parse_object(&node)?);
        }

        Ok(Self {
            camera,
            lights: builder.build(),
            objects,
        })
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::new(self.camera, self.lights)
    }
}

/// Renderable object placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub mesh: String,
    pub color: Vec3,
    pub position: Vec3,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
    /// Copies drawn through the instanced path; 1 means a direct draw.
    pub instances: usize,
    /// World-space offset between consecutive instances.
    pub spacing: Vec3,
}

impl Default for SceneObject {
    fn default() -> Self {
        Self {
            name: String::new(),
            mesh: "cube".to_string(),
            color: Vec3::ONE,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            instances: 1,
            spacing: Vec3::new(2.0, 0.0, 0.0),
        }
    }
}

impl SceneObject {
    pub fn model_matrix(&self) -> Mat4 {
        let translation = Mat4::from_translation(self.position);
        let rotation = Mat4::from_rotation_z(self.rotation.z.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_x(self.rotation.x.to_radians());
        let scale = Mat4::from_scale(self.scale);
        translation * rotation * scale
    }

    pub fn is_instanced(&self) -> bool {
        self.instances > 1
    }

    pub fn instance_transforms(&self) -> Vec<InstanceTransform> {
        let model = self.model_matrix();
        (0..self.instances)
            .map(|i| {
                let offset = Mat4::from_translation(self.spacing * i as f32);
                InstanceTransform::from_model(offset * model)
            })
            .collect()
    }
}

fn default_camera() -> CameraState {
    CameraState::perspective_look_at(
        Vec3::new(0.0, 2.0, 6.0),
        Vec3::ZERO,
        Vec3::Y,
        60f32.to_radians(),
        16.0 / 9.0,
        0.1,
        100.0,
    )
}

fn parse_camera(node: &Node<'_, '_>) -> Result<CameraState> {
    let position = parse_vec3(optional_text(node, "position"), Vec3::new(0.0, 2.0, 6.0))?;
    let target = parse_vec3(optional_text(node, "target"), Vec3::ZERO)?;
    let up = parse_vec3(optional_text(node, "up"), Vec3::Y)?;
    let fov = parse_f32(optional_text(node, "fov"), 60.0)?;
    let aspect = parse_f32(optional_text(node, "aspect"), 16.0 / 9.0)?;
    let near = parse_f32(optional_text(node, "near"), 0.1)?;
    let far = parse_f32(optional_text(node, "far"), 100.0)?;
    if (target - position).length_squared() <= f32::EPSILON {
        return Err(anyhow!("camera target coincides with its position"));
    }
    if (target - position).cross(up).length_squared() <= f32::EPSILON {
        return Err(anyhow!("camera up vector is parallel to the view direction"));
    }
    Ok(CameraState::perspective_look_at(
        position,
        target,
        up,
        fov.to_radians(),
        aspect,
        near,
        far,
    ))
}

fn add_light(node: &Node<'_, '_>, builder: &mut LightSetBuilder) -> Result<()> {
    let kind = required_text(node, "type")?;
    let color = parse_color(optional_text(node, "color"), Vec3::ONE)?;
    let power = parse_f32(optional_text(node, "power"), 1.0)?;
    match kind.as_str() {
        "global" | "directional" => {
            let direction = parse_direction(optional_text(node, "direction"), Vec3::NEG_Y)?;
            builder.global(GlobalLight {
                color,
                power,
                direction,
            })?;
        }
        "point" => {
            builder.point(PointLight {
                position: parse_vec3(optional_text(node, "position"), Vec3::ZERO)?,
                radius: parse_f32(optional_text(node, "radius"), 10.0)?,
                color,
                power,
            })?;
        }
        "spot" => {
            let cut_off = parse_f32(optional_text(node, "cutoff"), 0.9)?;
            if !(-1.0..=1.0).contains(&cut_off) {
                warn!("spot cutoff {cut_off} is outside [-1, 1]");
            }
            builder.spot(SpotLight {
                position: parse_vec3(optional_text(node, "position"), Vec3::ZERO)?,
                radius: parse_f32(optional_text(node, "radius"), 10.0)?,
                color,
                power,
                direction: parse_direction(optional_text(node, "direction"), Vec3::NEG_Y)?,
                cut_off,
            })?;
        }
        other => return Err(anyhow!("unknown light type {other:?}")),
    }
    Ok(())
}

fn parse_object(node: &Node<'_, '_>) -> Result<SceneObject> {
    let name = required_text(node, "name")?;
    let defaults = SceneObject::default();
    let instances = match optional_text(node, "instances") {
        Some(text) => text
            .parse::<usize>()
            .map_err(|err| anyhow!("failed to parse instance count: {err}"))?,
        None => defaults.instances,
    };
    let object = SceneObject {
        mesh: optional_text(node, "mesh").unwrap_or(defaults.mesh),
        color: parse_color(optional_text(node, "color"), defaults.color)?,
        position: parse_vec3(optional_text(node, "position"), defaults.position)?,
        rotation: parse_vec3(optional_text(node, "rotation"), defaults.rotation)?,
        scale: parse_vec3(optional_text(node, "scale"), defaults.scale)?,
        instances,
        spacing: parse_vec3(optional_text(node, "spacing"), defaults.spacing)?,
        name,
    };
    if object.instances == 0 {
        warn!("object {} has zero instances and will not be drawn", object.name);
    }
    Ok(object)
}

fn required_text(node: &Node<'_, '_>, tag: &str) -> Result<String> {
    optional_text(node, tag).ok_or_else(|| anyhow!("<{tag}> tag is missing"))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_components<const N: usize>(text: &str, what: &str) -> Result<[f32; N]> {
    let mut values = [0.0; N];
    let mut parts = text.split_whitespace();
    for value in values.iter_mut() {
        let part = parts
            .next()
            .ok_or_else(|| anyhow!("{what} is missing components"))?;
        *value = part
            .parse::<f32>()
            .map_err(|err| anyhow!("failed to parse {what} component {part:?}: {err}"))?;
    }
    Ok(values)
}

fn parse_vec3(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    Ok(Vec3::from_array(parse_components(&value, "vector")?))
}

fn parse_direction(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let direction = parse_vec3(value, default)?;
    direction
        .try_normalize()
        .ok_or_else(|| anyhow!("direction must be non-zero"))
}

/// Colors are written as 0-255 channel values.
fn parse_color(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    Ok(Vec3::from_array(parse_components(&value, "color")?) / 255.0)
}

fn parse_f32(value: Option<String>, default: f32) -> Result<f32> {
    match value {
        Some(value) => value
            .parse::<f32>()
            .map_err(|err| anyhow!("failed to parse float: {err}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <scene>
        <camera>
            <position>0 4 8</position>
            <target>0 0 0</target>
            <fov>75</fov>
        </camera>
        <light>
            <type>global</type>
            <direction>0 -2 0</direction>
            <color>255 255 255</color>
            <power>3</power>
        </light>
        <light>
            <type>spot</type>
            <position>0 5 0</position>
            <color>255 128 0</color>
            <cutoff>0.95</cutoff>
        </light>
        <object>
            <name>Floor</name>
            <mesh>plane</mesh>
            <scale>4 1 4</scale>
        </object>
        <object>
            <name>Crates</name>
            <position>0 0.5 0</position>
            <instances>3</instances>
        </object>
    </scene>
    "#;

    #[test]
    fn parse_scene_populates_lights_and_objects() {
        let scene = Scene::from_xml(SAMPLE).unwrap();
        assert_eq!(scene.camera.world_position, Vec3::new(0.0, 4.0, 8.0));
        assert_eq!(scene.lights.active_counts(), (1, 0, 1));
        // Directions are normalized on load.
        assert_eq!(scene.lights.globals[0].direction, Vec3::NEG_Y);
        assert_eq!(scene.lights.globals[0].power, 3.0);
        let spot = scene.lights.spots[0];
        assert_eq!(spot.color, Vec3::new(1.0, 128.0 / 255.0, 0.0));
        assert!((spot.cut_off - 0.95).abs() < f32::EPSILON);

        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.objects[0].mesh, "plane");
        assert!(!scene.objects[0].is_instanced());
        assert_eq!(scene.objects[1].mesh, "cube");
        assert_eq!(scene.objects[1].instances, 3);
    }

    #[test]
    fn instances_are_offset_by_spacing() {
        let object = SceneObject {
            position: Vec3::new(0.0, 1.0, 0.0),
            instances: 3,
            ..SceneObject::default()
        };
        let origins: Vec<Vec3> = object
            .instance_transforms()
            .iter()
            .map(|instance| instance.to_model().w_axis.truncate())
            .collect();
        assert_eq!(
            origins,
            vec![
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(2.0, 1.0, 0.0),
                Vec3::new(4.0, 1.0, 0.0)
            ]
        );
    }

    #[test]
    fn too_many_lights_is_an_error() {
        let lights = "<light><type>global</type></light>".repeat(5);
        let xml = format!("<scene>{lights}</scene>");
        let err = Scene::from_xml(&xml).unwrap_err();
        assert!(format!("{err:?}").contains("too many global lights"));
    }

    #[test]
    fn unknown_light_type_is_an_error() {
        let xml = "<scene><light><type>area</type></light></scene>";
        assert!(Scene::from_xml(xml).is_err());
    }

    #[test]
    fn missing_object_name_is_an_error() {
        let bad = "<scene><object><mesh>cube</mesh></object></scene>";
        assert!(Scene::from_xml(bad).is_err());
    }

    #[test]
    fn camera_up_parallel_to_view_is_rejected() {
        let xml = "<scene><camera><position>0 5 0</position><target>0 0 0</target></camera></scene>";
        let err = Scene::from_xml(xml).unwrap_err();
        assert!(format!("{err:?}").contains("parallel to the view direction"));

        let tilted = "<scene><camera><position>0 5 0</position><up>0 0 -1</up></camera></scene>";
        let scene = Scene::from_xml(tilted).unwrap();
        assert!(scene.camera.projection_view.is_finite());
    }

    #[test]
    fn zero_direction_is_rejected() {
        let xml = "<scene><light><type>global</type><direction>0 0 0</direction></light></scene>";
        assert!(Scene::from_xml(xml).is_err());
    }
}
