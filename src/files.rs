use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Supported formats
// ---------------------------------------------------------------------------

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("'{0}' is not in the directory listing")]
    NotFound(PathBuf),
    #[error("no supported images in '{0}'")]
    EmptyDirectory(PathBuf),
    #[error("no directory has been opened")]
    EmptyList,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Navigation list
// ---------------------------------------------------------------------------

/// Ordered view of the images in one directory plus the current selection.
///
/// The list is a point-in-time snapshot: it is rebuilt only when the
/// directory context changes, never diffed against a live filesystem watch.
pub struct NavigationList {
    directory: Option<PathBuf>,
    entries: Vec<PathBuf>,
    selected: Option<usize>,
    rescans: u64,
}

impl NavigationList {
    pub fn new() -> Self {
        Self {
            directory: None,
            entries: Vec::new(),
            selected: None,
            rescans: 0,
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn current(&self) -> Option<&Path> {
        self.selected.map(|i| self.entries[i].as_path())
    }

    /// How many directory walks have happened. Opening an image in the
    /// directory that is already listed must not bump this.
    pub fn rescans(&self) -> u64 {
        self.rescans
    }

    /// Select `path`, rescanning its parent directory only when it differs
    /// from the one currently listed.
    pub fn open_image(&mut self, path: &Path) -> Result<(), NavError> {
        let parent = path.parent().unwrap_or(Path::new("."));

        match self.directory.as_deref() {
            Some(dir) if dir == parent => {
                log::debug!(
                    "'{}' is in the listed directory, keeping the existing list",
                    parent.display()
                );
            }
            _ => {
                log::debug!(
                    "directory changed, building a new image list from '{}'",
                    parent.display()
                );
                self.set_directory(parent)?;
            }
        }

        match self.entries.iter().position(|p| p == path) {
            Some(idx) => {
                self.selected = Some(idx);
                Ok(())
            }
            None => Err(NavError::NotFound(path.to_path_buf())),
        }
    }

    /// Replace the listing with a fresh, non-recursive scan of `dir`.
    ///
    /// An empty result leaves the previous listing and selection in place so
    /// a valid selection is never clobbered by a scan that found nothing.
    pub fn set_directory(&mut self, dir: &Path) -> Result<usize, NavError> {
        self.rescans += 1;

        let mut found = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let p = entry.path();
            if p.is_file() && is_image_file(&p) {
                found.push(p);
            }
        }

        // Case-insensitive order; the sort is stable so paths that compare
        // equal keep their enumeration order.
        found.sort_by_cached_key(|p| p.to_string_lossy().to_lowercase());

        if found.is_empty() {
            log::warn!(
                "no supported images in '{}', keeping the previous list",
                dir.display()
            );
            return Err(NavError::EmptyDirectory(dir.to_path_buf()));
        }

        log::info!("found {} images in '{}'", found.len(), dir.display());
        self.directory = Some(dir.to_path_buf());
        self.entries = found;
        self.selected = None;
        Ok(self.entries.len())
    }

    /// Scan `dir` and select its first image.
    pub fn open_directory(&mut self, dir: &Path) -> Result<usize, NavError> {
        let count = self.set_directory(dir)?;
        self.selected = Some(0);
        Ok(count)
    }

    /// Advance the selection, wrapping past the last entry to the first.
    pub fn next(&mut self) -> Result<&Path, NavError> {
        let idx = self.selected.ok_or(NavError::EmptyList)?;
        let idx = if idx + 1 >= self.entries.len() { 0 } else { idx + 1 };
        self.selected = Some(idx);
        log::debug!("showing next image, index {}", idx);
        Ok(&self.entries[idx])
    }

    /// Step the selection back, wrapping from the first entry to the last.
    pub fn previous(&mut self) -> Result<&Path, NavError> {
        let idx = self.selected.ok_or(NavError::EmptyList)?;
        let idx = if idx == 0 { self.entries.len() - 1 } else { idx - 1 };
        self.selected = Some(idx);
        log::debug!("showing previous image, index {}", idx);
        Ok(&self.entries[idx])
    }
}

impl Default for NavigationList {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn scan_filters_and_sorts_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "B.png");
        touch(tmp.path(), "a.jpg");
        touch(tmp.path(), "C.gif");
        touch(tmp.path(), "notes.txt");
        touch(tmp.path(), "archive.zip");
        fs::create_dir(tmp.path().join("sub")).unwrap();
        touch(&tmp.path().join("sub"), "nested.png");

        let mut nav = NavigationList::new();
        let count = nav.set_directory(tmp.path()).unwrap();
        assert_eq!(count, 3);

        let names: Vec<_> = nav
            .entries()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.jpg", "B.png", "C.gif"]);
    }

    #[test]
    fn uppercase_extensions_are_supported() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "SHOUTY.PNG");
        touch(tmp.path(), "photo.JpEg");

        let mut nav = NavigationList::new();
        assert_eq!(nav.set_directory(tmp.path()).unwrap(), 2);
    }

    #[test]
    fn open_directory_selects_first_entry() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "B.png");
        touch(tmp.path(), "a.jpg");
        touch(tmp.path(), "C.gif");

        let mut nav = NavigationList::new();
        nav.open_directory(tmp.path()).unwrap();
        assert_eq!(nav.selected(), Some(0));
        assert_eq!(nav.current().unwrap().file_name().unwrap(), "a.jpg");

        nav.next().unwrap();
        let third = nav.next().unwrap().to_path_buf();
        assert_eq!(third.file_name().unwrap(), "C.gif");

        // One more step wraps back to the start.
        let wrapped = nav.next().unwrap().to_path_buf();
        assert_eq!(wrapped.file_name().unwrap(), "a.jpg");
    }

    #[test]
    fn previous_wraps_to_last_entry() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "one.png");
        touch(tmp.path(), "two.png");
        touch(tmp.path(), "three.png");

        let mut nav = NavigationList::new();
        nav.open_directory(tmp.path()).unwrap();
        let last = nav.previous().unwrap().to_path_buf();
        assert_eq!(nav.selected(), Some(2));
        assert_eq!(last.file_name().unwrap(), "two.png");
    }

    #[test]
    fn next_then_previous_round_trips() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.png", "b.png", "c.png", "d.png"] {
            touch(tmp.path(), name);
        }

        let mut nav = NavigationList::new();
        nav.open_directory(tmp.path()).unwrap();
        for start in 0..4 {
            while nav.selected() != Some(start) {
                nav.next().unwrap();
            }
            nav.next().unwrap();
            nav.previous().unwrap();
            assert_eq!(nav.selected(), Some(start));
            nav.previous().unwrap();
            nav.next().unwrap();
            assert_eq!(nav.selected(), Some(start));
        }
    }

    #[test]
    fn open_image_in_same_directory_skips_rescan() {
        let tmp = TempDir::new().unwrap();
        let first = touch(tmp.path(), "a.png");
        let second = touch(tmp.path(), "b.png");

        let mut nav = NavigationList::new();
        nav.open_image(&first).unwrap();
        assert_eq!(nav.rescans(), 1);
        assert_eq!(nav.selected(), Some(0));

        nav.open_image(&second).unwrap();
        assert_eq!(nav.rescans(), 1, "same-directory open must not rescan");
        assert_eq!(nav.selected(), Some(1));
    }

    #[test]
    fn open_image_in_new_directory_rescans() {
        let tmp_a = TempDir::new().unwrap();
        let tmp_b = TempDir::new().unwrap();
        let in_a = touch(tmp_a.path(), "a.png");
        let in_b = touch(tmp_b.path(), "b.png");

        let mut nav = NavigationList::new();
        nav.open_image(&in_a).unwrap();
        nav.open_image(&in_b).unwrap();
        assert_eq!(nav.rescans(), 2);
        assert_eq!(nav.directory(), Some(tmp_b.path()));
    }

    #[test]
    fn open_image_with_unsupported_extension_is_not_found() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");
        let stray = touch(tmp.path(), "notes.txt");

        let mut nav = NavigationList::new();
        let err = nav.open_image(&stray).unwrap_err();
        assert!(matches!(err, NavError::NotFound(_)));
    }

    #[test]
    fn empty_rescan_keeps_previous_listing() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");
        touch(tmp.path(), "b.png");
        let empty = TempDir::new().unwrap();

        let mut nav = NavigationList::new();
        nav.open_directory(tmp.path()).unwrap();
        nav.next().unwrap();

        let err = nav.set_directory(empty.path()).unwrap_err();
        assert!(matches!(err, NavError::EmptyDirectory(_)));
        assert_eq!(nav.directory(), Some(tmp.path()));
        assert_eq!(nav.entries().len(), 2);
        assert_eq!(nav.selected(), Some(1));
    }

    #[test]
    fn navigation_without_directory_context_fails() {
        let mut nav = NavigationList::new();
        assert!(matches!(nav.next(), Err(NavError::EmptyList)));
        assert!(matches!(nav.previous(), Err(NavError::EmptyList)));
        assert!(nav.current().is_none());
    }

    #[test]
    fn unreadable_directory_reports_io_error() {
        let mut nav = NavigationList::new();
        let err = nav.set_directory(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, NavError::Io(_)));
    }
}
