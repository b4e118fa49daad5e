use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pictor", about = "An image viewer core with adaptive render quality")]
pub struct Cli {
    /// Image file or directory to open
    pub path: PathBuf,

    /// Viewport width in pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Step through this many further images after opening
    #[arg(short, long, default_value = "0")]
    pub steps: usize,

    /// Scratch file for the low-fidelity preview (defaults to the system
    /// temp directory; overwritten on every selection)
    #[arg(long, value_name = "FILE")]
    pub preview_slot: Option<PathBuf>,
}

pub fn default_preview_slot() -> PathBuf {
    std::env::temp_dir().join("pictor-preview.png")
}
