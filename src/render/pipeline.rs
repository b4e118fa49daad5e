use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::render::scale::{self, HIGH_FILTER, LOW_FILTER};
use crate::timer::SingleShot;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Quiet period after the last quality drop before the expensive rescale runs.
pub const UPGRADE_DELAY: Duration = Duration::from_millis(250);

const DATE_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn image_error(path: &Path, err: image::ImageError) -> RenderError {
    match err {
        image::ImageError::IoError(io) => RenderError::Io(io),
        other => RenderError::Decode {
            path: path.to_path_buf(),
            source: other,
        },
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Loading,
    HighFidelity,
    LowFidelity,
}

/// Display-ready pixels for the sink.
#[derive(Debug)]
pub struct Frame {
    pub pixels: RgbaImage,
    pub quality: Quality,
}

/// Metadata shown in the details panel, derived once per selection.
#[derive(Debug, Clone)]
pub struct ImageDetails {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub modified: Option<DateTime<Local>>,
}

impl ImageDetails {
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    pub fn modified_text(&self) -> String {
        match self.modified {
            Some(ts) => ts.format(DATE_FORMAT).to_string(),
            None => "unknown".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Render pipeline
// ---------------------------------------------------------------------------

struct Selection {
    path: PathBuf,
    /// Full-resolution decode, retained so the post-debounce upgrade never
    /// has to touch the disk again.
    source: DynamicImage,
    details: ImageDetails,
}

/// Adaptive-quality renderer for the selected image.
///
/// Steady state serves the full-resolution source scaled smoothly to the
/// viewport. While the viewport is being dragged, every resize is answered
/// from a small preview kept in a single scratch slot, and one deferred
/// upgrade back to full quality is scheduled per burst.
pub struct RenderPipeline {
    preview_slot: PathBuf,
    viewport: (u32, u32),
    selection: Option<Selection>,
    phase: RenderPhase,
    upgrade: SingleShot,
}

impl RenderPipeline {
    /// `preview_slot` is the one scratch file this pipeline owns; it is
    /// overwritten on every selection and meaningless across sessions.
    pub fn new(preview_slot: PathBuf, viewport_w: u32, viewport_h: u32) -> Self {
        Self {
            preview_slot,
            viewport: (viewport_w.max(1), viewport_h.max(1)),
            selection: None,
            phase: RenderPhase::Idle,
            upgrade: SingleShot::new(),
        }
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selection.as_ref().map(|s| s.path.as_path())
    }

    pub fn details(&self) -> Option<&ImageDetails> {
        self.selection.as_ref().map(|s| &s.details)
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn preview_slot(&self) -> &Path {
        &self.preview_slot
    }

    pub fn pending_upgrade(&self) -> bool {
        self.upgrade.is_armed()
    }

    /// Deadline for the host loop to wait on, if an upgrade is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.upgrade.deadline()
    }

    /// Decode `path`, refresh the preview slot, and render at high fidelity.
    ///
    /// Nothing is committed until the whole chain has succeeded, so a corrupt
    /// or unreadable file leaves the previous image and its pending upgrade
    /// untouched.
    pub fn select_image(&mut self, path: &Path) -> Result<Frame, RenderError> {
        let prior = self.phase;
        self.phase = RenderPhase::Loading;
        match self.load_selection(path) {
            Ok(frame) => Ok(frame),
            Err(err) => {
                log::error!("could not load '{}': {}", path.display(), err);
                self.phase = prior;
                Err(err)
            }
        }
    }

    fn load_selection(&mut self, path: &Path) -> Result<Frame, RenderError> {
        let source = image::open(path).map_err(|e| image_error(path, e))?;

        let details = ImageDetails {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            width: source.width(),
            height: source.height(),
            modified: fs::metadata(path)
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Local>::from),
        };

        // One slot for all images: the preview of the outgoing selection is
        // simply overwritten. Stored as PNG whatever the source format.
        let preview = scale::make_preview(&source);
        preview
            .save_with_format(&self.preview_slot, ImageFormat::Png)
            .map_err(|e| image_error(&self.preview_slot, e))?;
        log::debug!(
            "preview slot '{}' now holds {}x{} for '{}'",
            self.preview_slot.display(),
            preview.width(),
            preview.height(),
            details.name
        );

        let pixels = scale::scale_to_fit(&source, self.viewport.0, self.viewport.1, HIGH_FILTER);

        // Commit point. An upgrade still pending for the outgoing image must
        // not fire against the new one.
        self.upgrade.cancel();
        self.selection = Some(Selection {
            path: path.to_path_buf(),
            source,
            details,
        });
        self.phase = RenderPhase::HighFidelity;
        log::info!("now showing '{}' at high fidelity", path.display());

        Ok(Frame {
            pixels,
            quality: Quality::High,
        })
    }

    /// Track a viewport change.
    ///
    /// Every call redraws cheaply from the preview slot so the display keeps
    /// up with the drag, but the timer is armed only once per burst: the
    /// expensive full-source rescale runs a single time after things settle.
    pub fn resize(&mut self, width: u32, height: u32, now: Instant) -> Result<Option<Frame>, RenderError> {
        self.viewport = (width.max(1), height.max(1));
        if self.selection.is_none() {
            return Ok(None);
        }

        if !self.upgrade.is_armed() {
            self.upgrade.arm(now, UPGRADE_DELAY);
            self.phase = RenderPhase::LowFidelity;
        }

        let preview =
            image::open(&self.preview_slot).map_err(|e| image_error(&self.preview_slot, e))?;
        let pixels = scale::scale_to_fit(&preview, self.viewport.0, self.viewport.1, LOW_FILTER);

        Ok(Some(Frame {
            pixels,
            quality: Quality::Low,
        }))
    }

    /// Run the deferred upgrade if its quiet period has elapsed.
    ///
    /// A selection change cancels the deadline, so a shot that fires here
    /// always refers to the live selection; the phase check below keeps a
    /// stray shot from re-rendering a steady display.
    pub fn poll_upgrade(&mut self, now: Instant) -> Option<Frame> {
        if !self.upgrade.fire(now) {
            return None;
        }
        let selection = self.selection.as_ref()?;
        if self.phase != RenderPhase::LowFidelity {
            return None;
        }

        let pixels = scale::scale_to_fit(
            &selection.source,
            self.viewport.0,
            self.viewport.1,
            HIGH_FILTER,
        );
        self.phase = RenderPhase::HighFidelity;
        log::debug!(
            "resize settled, '{}' upgraded to high fidelity",
            selection.path.display()
        );

        Some(Frame {
            pixels,
            quality: Quality::High,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
