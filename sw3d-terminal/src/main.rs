/// SW3D Terminal Demo - Rotating Model
///
/// Renders the built-in cube, or an OBJ model, with the software pipeline.
/// Controls:
///   - WASD / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - M: Toggle wireframe
///   - Q/ESC: Quit
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use sw3d_core::{load_obj, Mesh, RenderConfig};
use sw3d_terminal::{logging, wireframe_config, TerminalApp};

#[derive(Debug, Parser)]
#[command(version, about = "Software-rendered 3D models in the terminal")]
struct Args {
    /// OBJ model to display instead of the built-in cube.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Distance from the camera to the model's origin.
    #[arg(long, default_value_t = 5.0)]
    distance: f32,

    /// Draw triangle outlines instead of filled faces.
    #[arg(long)]
    wireframe: bool,

    /// Write log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Include per-frame trace records in the log.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        logging::install(path, args.verbose)?;
    }

    println!("SW3D Terminal Renderer - Loading...");

    let mesh = match &args.model {
        Some(path) => load_obj(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => Mesh::cube(2.0),
    };
    log::info!("model has {} triangles", mesh.len());

    let config = RenderConfig {
        fov_degrees: args.fov,
        ..RenderConfig::default()
    };
    let config = wireframe_config(&config, args.wireframe);

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(mesh, config, args.distance)?;
    app.run()?;

    println!("Thank you for using SW3D Terminal Renderer!");
    Ok(())
}
