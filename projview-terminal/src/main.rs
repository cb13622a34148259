/// projview terminal viewer
///
/// Shows the letter shape in a perspective view plus top, front and side
/// views, all driven by one set of scale/rotation/translation parameters.
/// Controls:
///   - 1/2/3 or Tab: select scale, rotation or translation
///   - X/Y/Z: select the axis
///   - +/- or Left/Right: adjust the selected value
///   - ':' : type a command such as `rotation.z=1.57; t.x=2`
///   - 0: reset all parameters
///   - WASD / Up/Down, mouse drag, scroll: move the perspective camera
///   - Q/ESC: Quit
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use projview_core::build_shape;
use projview_terminal::{init_logging, LoggingConfig, TerminalApp, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "projview-terminal", version, about = "Multi-view transform viewer for the terminal")]
struct Args {
    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Log filter, e.g. "info" or "projview_terminal=debug"
    #[arg(long)]
    log: Option<String>,

    /// Write log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Width of each orthographic pane in cells
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u16).range(4..=400))]
    ortho_width: u16,

    /// Height of each orthographic pane in cells
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u16).range(3..=200))]
    ortho_height: u16,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log,
        log_file: args.log_file,
        ..LoggingConfig::default()
    })?;

    let shape = build_shape().context("failed to build the letter shape")?;
    println!(
        "projview - {} segments loaded, starting viewer (press Q to quit)...",
        shape.len()
    );

    let config = ViewerConfig {
        fps: args.fps,
        ortho_pane: (args.ortho_width, args.ortho_height),
        ..ViewerConfig::default()
    };
    let mut app = TerminalApp::new(shape, config);
    let summary = app.run().context("terminal viewer failed")?;

    println!(
        "Rendered {} frames, released {} viewports",
        summary.frames, summary.teardown.released
    );
    for (role, error) in &summary.teardown.errors {
        eprintln!("failed to release the {role} view: {error}");
    }
    Ok(())
}
