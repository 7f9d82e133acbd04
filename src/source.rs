//! Where raw embedding text comes from.

use std::{fs, path::{Path, PathBuf}};

use crate::error::{EngineError, Result};

/// Provider of raw dataset text for a path.
pub trait DatasetSource {
    fn fetch(&mut self, path: &str) -> Result<String>;
}

impl<F> DatasetSource for F
where
    F: FnMut(&str) -> Result<String>,
{
    fn fetch(&mut self, path: &str) -> Result<String> { self(path) }
}

/// Reads datasets from disk; relative paths resolve against `root`.
#[derive(Clone, Debug)]
pub struct FileSource { root: PathBuf }

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() { p.to_path_buf() } else { self.root.join(p) }
    }
}

impl Default for FileSource {
    fn default() -> Self { Self::new(".") }
}

impl DatasetSource for FileSource {
    fn fetch(&mut self, path: &str) -> Result<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full)
            .map_err(|e| EngineError::Transport(format!("{}: {}", full.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/t.txt"), "a 1 2\n").unwrap();
        let mut src = FileSource::new(dir.path());
        assert_eq!(src.fetch("data/t.txt").unwrap(), "a 1 2\n");
    }

    #[test]
    fn missing_file_is_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut src = FileSource::new(dir.path());
        assert!(matches!(src.fetch("nope.txt"), Err(EngineError::Transport(_))));
    }

    #[test]
    fn closures_are_sources() {
        let mut calls = 0;
        let mut src = |p: &str| -> Result<String> { calls += 1; Ok(p.to_uppercase()) };
        assert_eq!(src.fetch("x").unwrap(), "X");
        drop(src);
        assert_eq!(calls, 1);
    }
}
