use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn write_scene(xml: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp scene");
    tmp.write_all(xml.as_bytes()).expect("write scene");
    tmp
}

const LIT_SCENE: &str = r#"<scene>
  <camera>
    <position>0 4 8</position>
    <target>0 0 0</target>
  </camera>
  <light>
    <type>global</type>
    <direction>0 -1 0</direction>
    <color>255 255 255</color>
  </light>
  <object>
    <name>Floor</name>
    <mesh>plane</mesh>
    <scale>4 1 4</scale>
  </object>
  <object>
    <name>Crates</name>
    <mesh>cube</mesh>
    <position>-2 0.5 0</position>
    <instances>3</instances>
  </object>
</scene>
"#;

#[test]
fn cli_shades_every_object() {
    let scene = write_scene(LIT_SCENE);
    let mut cmd = Command::cargo_bin("forward-shading").expect("binary exists");
    cmd.arg(scene.path());
    cmd.assert()
        .success()
        .stdout(contains(
            "Loaded scene with 2 objects (1 global, 0 point, 0 spot lights)",
        ))
        .stdout(contains(" - Floor: 4 vertices, mean color=("))
        .stdout(contains(" - Crates: 72 vertices, mean color=("));
}

#[test]
fn cli_unlit_scene_reports_ambient_only() {
    let scene = write_scene(
        r#"<scene>
  <object>
    <name>Floor</name>
    <mesh>plane</mesh>
    <color>255 255 255</color>
  </object>
</scene>"#,
    );
    let mut cmd = Command::cargo_bin("forward-shading").expect("binary exists");
    cmd.arg(scene.path());
    cmd.assert()
        .success()
        .stdout(contains(
            "Loaded scene with 1 objects (0 global, 0 point, 0 spot lights)",
        ))
        .stdout(contains(
            " - Floor: 4 vertices, mean color=(0.020, 0.020, 0.020)",
        ));
}

#[test]
fn cli_precomposed_path_is_clip_only() {
    let scene = write_scene(LIT_SCENE);
    let mut cmd = Command::cargo_bin("forward-shading").expect("binary exists");
    cmd.arg(scene.path()).arg("--precomposed");
    cmd.assert()
        .success()
        .stdout(contains(" - Floor: 4 vertices (clip only)"))
        // Instanced objects always carry world attributes.
        .stdout(contains(" - Crates: 72 vertices, mean color=("));
}

#[test]
fn cli_summary_only_lists_objects() {
    let scene = write_scene(LIT_SCENE);
    let mut cmd = Command::cargo_bin("forward-shading").expect("binary exists");
    cmd.arg(scene.path()).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains(" - Floor (plane)"))
        .stdout(contains(" - Crates (cube)"))
        .stdout(contains("mean color").not());
}

#[test]
fn cli_rejects_unknown_flags() {
    let scene = write_scene(LIT_SCENE);
    let mut cmd = Command::cargo_bin("forward-shading").expect("binary exists");
    cmd.arg(scene.path()).arg("--wireframe");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --wireframe"));
}

#[test]
fn cli_reports_light_overflow() {
    let lights = "<light><type>spot</type></light>".repeat(9);
    let scene = write_scene(&format!("<scene>{lights}</scene>"));
    let mut cmd = Command::cargo_bin("forward-shading").expect("binary exists");
    cmd.arg(scene.path());
    cmd.assert()
        .failure()
        .stderr(contains("too many spot lights"));
}
