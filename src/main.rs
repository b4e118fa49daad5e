mod cli;
mod files;
mod render;
mod timer;
mod viewer;

use clap::Parser;

use crate::cli::{Cli, default_preview_slot};
use crate::render::Frame;
use crate::viewer::Viewer;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let slot = cli.preview_slot.clone().unwrap_or_else(default_preview_slot);
    let mut viewer = Viewer::new(slot, cli.width, cli.height);

    let opened = if cli.path.is_dir() {
        viewer.open_directory(Some(&cli.path))
    } else {
        viewer.open_image(Some(&cli.path))
    };

    match opened {
        Ok(Some(frame)) => report(&viewer, &frame),
        Ok(None) => return,
        Err(e) => {
            log::error!("could not open '{}': {}", cli.path.display(), e);
            std::process::exit(1);
        }
    }

    for _ in 0..cli.steps {
        match viewer.next() {
            Ok(frame) => report(&viewer, &frame),
            Err(e) => {
                log::error!("navigation failed: {}", e);
                break;
            }
        }
    }
}

fn report(viewer: &Viewer, frame: &Frame) {
    if let Some(details) = viewer.details() {
        println!(
            "{} | {} | modified {} | rendered {}x{} ({:?})",
            details.name,
            details.dimensions(),
            details.modified_text(),
            frame.pixels.width(),
            frame.pixels.height(),
            frame.quality,
        );
    }
}
