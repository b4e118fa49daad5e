use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::files::{NavError, NavigationList};
use crate::render::{Frame, ImageDetails, RenderError, RenderPipeline};

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

// ---------------------------------------------------------------------------
// Viewer
// ---------------------------------------------------------------------------

/// Couples the navigation list and the render pipeline: UI-level events come
/// in, frames for the display sink come out. The pipeline always renders
/// whatever the list has selected.
pub struct Viewer {
    nav: NavigationList,
    pipeline: RenderPipeline,
}

impl Viewer {
    pub fn new(preview_slot: PathBuf, viewport_w: u32, viewport_h: u32) -> Self {
        Self {
            nav: NavigationList::new(),
            pipeline: RenderPipeline::new(preview_slot, viewport_w, viewport_h),
        }
    }

    pub fn nav(&self) -> &NavigationList {
        &self.nav
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn details(&self) -> Option<&ImageDetails> {
        self.pipeline.details()
    }

    /// Open a single image. `None` means the file dialog was cancelled,
    /// which changes nothing.
    pub fn open_image(&mut self, path: Option<&Path>) -> Result<Option<Frame>, ViewerError> {
        let Some(path) = path else {
            log::info!("image open cancelled");
            return Ok(None);
        };
        log::info!("opening image '{}'", path.display());
        self.nav.open_image(path)?;
        let frame = self.pipeline.select_image(path)?;
        Ok(Some(frame))
    }

    /// Open a directory and show its first image. `None` means the dialog
    /// was cancelled.
    pub fn open_directory(&mut self, dir: Option<&Path>) -> Result<Option<Frame>, ViewerError> {
        let Some(dir) = dir else {
            log::info!("directory open cancelled");
            return Ok(None);
        };
        log::info!("opening directory '{}'", dir.display());
        self.nav.open_directory(dir)?;
        let path = self.nav.current().ok_or(NavError::EmptyList)?;
        let frame = self.pipeline.select_image(path)?;
        Ok(Some(frame))
    }

    pub fn next(&mut self) -> Result<Frame, ViewerError> {
        let path = self.nav.next()?;
        Ok(self.pipeline.select_image(path)?)
    }

    pub fn previous(&mut self) -> Result<Frame, ViewerError> {
        let path = self.nav.previous()?;
        Ok(self.pipeline.select_image(path)?)
    }

    /// Viewport-host notification of a layout change.
    pub fn resize(&mut self, width: u32, height: u32, now: Instant) -> Result<Option<Frame>, ViewerError> {
        Ok(self.pipeline.resize(width, height, now)?)
    }

    /// Host-loop tick; returns the high-fidelity frame once a resize burst
    /// has settled.
    pub fn poll_upgrade(&mut self, now: Instant) -> Option<Frame> {
        self.pipeline.poll_upgrade(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pipeline.next_deadline()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
