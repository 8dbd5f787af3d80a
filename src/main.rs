use std::env;
use std::fs;

use anyhow::{anyhow, Context, Result};
use log::info;

use forward_shading::{
    draw_object, print_object_names, print_report, print_scene_summary, DrawPath, FrameState,
    Scene,
};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let xml = fs::read_to_string(&options.path)
        .with_context(|| format!("failed to read scene {}", options.path))?;
    let scene = Scene::from_xml(&xml).context("failed to parse scene XML")?;

    print_scene_summary(&scene);
    if options.summary_only {
        print_object_names(&scene);
        return Ok(());
    }

    let frames = FrameState::new(scene.snapshot());
    let frame = frames.acquire();
    info!(
        "drawing {} object(s) via the {:?} path",
        scene.objects.len(),
        options.draw_path
    );
    for object in &scene.objects {
        let report = draw_object(&frame, object, options.draw_path)
            .with_context(|| format!("failed to draw {}", object.name))?;
        print_report(&report);
    }
    Ok(())
}

struct CliOptions {
    path: String,
    summary_only: bool,
    draw_path: DrawPath,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let Some(path) = args.next() else {
            return Err(anyhow!(
                "Usage: forward-shading <scene.xml> [--summary-only] [--precomposed]"
            ));
        };
        let mut summary_only = false;
        let mut draw_path = DrawPath::Direct;
        for arg in args {
            match arg.as_str() {
                "--summary-only" => summary_only = true,
                "--precomposed" => draw_path = DrawPath::Precomposed,
                other => {
                    return Err(anyhow!(
                        "Unknown argument: {other}. Expected --summary-only or --precomposed"
                    ));
                }
            }
        }
        Ok(Self {
            path,
            summary_only,
            draw_path,
        })
    }
}
