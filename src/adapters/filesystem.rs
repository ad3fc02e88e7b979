use crate::ports::FileSizePort;
use anyhow::{Context, Result};
use std::fs;
use std::io::BufRead;
use std::path::Path;

pub struct FileSystemAdapter;

impl FileSystemAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSizePort for FileSystemAdapter {
    fn size_of(&self, path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("cannot stat {}", path.display()))?;
        Ok(metadata.len())
    }
}

/// Lazy stream of path strings from a line-based reader: one path per line,
/// surrounding whitespace trimmed, blank lines dropped. Finite, consumed
/// exactly once.
pub struct LinePathSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> LinePathSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for LinePathSource<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return Some(trimmed.to_string());
                    }
                }
                Err(e) => {
                    log::error!("failed to read path list: {}", e);
                    return None;
                }
            }
        }
    }
}
