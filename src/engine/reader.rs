//! File reading and the per-path content cache.

use anyhow::{Context, Result, anyhow};
use memmap2::Mmap;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::ContentTransform;
use crate::utils::config::ReadingConsts;

/// Bytes of one file: owned, or mapped straight from disk.
#[derive(Debug)]
pub enum FileContent {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for FileContent {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            FileContent::Owned(bytes) => bytes,
            FileContent::Mapped(mmap) => mmap,
        }
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        FileContent::Owned(bytes)
    }
}

/// Reads file contents. `Ok(None)` means the file does not exist.
pub trait FileReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<Option<FileContent>>;
}

/// Reads from disk. Files larger than `mmap_threshold` are memory-mapped and measured from the
/// mapping; smaller ones are read into memory.
#[derive(Clone, Copy, Debug)]
pub struct FsReader {
    pub mmap_threshold: u64,
}

impl Default for FsReader {
    fn default() -> Self {
        Self {
            mmap_threshold: ReadingConsts::MMAP_THRESHOLD,
        }
    }
}

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> Result<Option<FileContent>> {
        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("open '{}'", path.display())),
        };
        let size = file
            .metadata()
            .with_context(|| format!("read metadata of '{}'", path.display()))?
            .len();
        if size > self.mmap_threshold {
            // SAFETY: read-only mapping; this process never writes the file.
            let mmap = unsafe { Mmap::map(&file) }
                .with_context(|| format!("map '{}'", path.display()))?;
            Ok(Some(FileContent::Mapped(mmap)))
        } else {
            let mut buf = Vec::with_capacity(size as usize);
            file.read_to_end(&mut buf)
                .with_context(|| format!("read '{}'", path.display()))?;
            Ok(Some(FileContent::Owned(buf)))
        }
    }
}

/// File contents keyed by path, read once and transformed once.
#[derive(Debug, Default)]
pub struct ContentCache {
    contents: HashMap<PathBuf, FileContent>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every path not already cached (in parallel), applying `transform` once per file.
    /// A missing file is an error: discovery promised it exists.
    pub fn load<'a, I>(
        &mut self,
        paths: I,
        reader: &dyn FileReader,
        transform: Option<&ContentTransform>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut todo: Vec<&Path> = paths
            .into_iter()
            .filter(|p| !self.contents.contains_key(*p))
            .collect();
        todo.sort_unstable();
        todo.dedup();

        let loaded: Vec<(PathBuf, FileContent)> = todo
            .par_iter()
            .map(|&path| {
                let raw = reader
                    .read(path)?
                    .ok_or_else(|| anyhow!("Could not read '{}'", path.display()))?;
                let content = match transform {
                    Some(t) => FileContent::Owned(t.apply(&raw)),
                    None => raw,
                };
                Ok((path.to_path_buf(), content))
            })
            .collect::<Result<_>>()?;

        log::debug!("Read {} files into the content cache", loaded.len());
        self.contents.extend(loaded);
        Ok(())
    }

    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.contents.get(path).map(|c| &**c)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
