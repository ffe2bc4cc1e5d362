//! Public and internal types for the filesize API and pipeline.

use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::utils::config::ReportConsts;

/// Compression applied before measuring. Declaration order is column order and record index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Encoding {
    Brotli,
    Gzip,
    None,
}

impl Encoding {
    pub const COUNT: usize = 3;
    pub const ALL: [Encoding; Encoding::COUNT] = [Encoding::Brotli, Encoding::Gzip, Encoding::None];

    /// Position of this encoding inside a [`SizeRecord`].
    pub fn index(self) -> usize {
        match self {
            Encoding::Brotli => 0,
            Encoding::Gzip => 1,
            Encoding::None => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Brotli => "brotli",
            Encoding::Gzip => "gzip",
            Encoding::None => "none",
        }
    }

    /// Case-insensitive name lookup. An empty name means no compression.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "brotli" => Some(Encoding::Brotli),
            "gzip" => Some(Encoding::Gzip),
            "none" | "" => Some(Encoding::None),
            _ => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maximum allowed size for one (file, encoding) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Budget {
    /// Tracked for display only; never fails.
    Unbounded,
    Bounded(u64),
}

impl Budget {
    /// True when `size` fits the budget (strictly below a bounded limit).
    pub fn allows(self, size: u64) -> bool {
        match self {
            Budget::Unbounded => true,
            Budget::Bounded(max) => size < max,
        }
    }

    pub fn classify(self, size: u64) -> Verdict {
        match self {
            Budget::Unbounded => Verdict::Untracked,
            Budget::Bounded(max) if size >= max => Verdict::Fail,
            Budget::Bounded(max) => {
                let headroom = 1.0 - size as f64 / max as f64;
                if headroom < ReportConsts::WARNING_MARGIN {
                    Verdict::Warn
                } else {
                    Verdict::Pass
                }
            }
        }
    }
}

/// Outcome of comparing a measured size against its budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Passes, but within the warning margin of the budget.
    Warn,
    Fail,
    /// Unbounded budget: shown, not counted.
    Untracked,
}

/// One encoding cell of a [`SizeRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Not tracked for this path.
    Excluded,
    /// Tracked, compression not finished.
    Pending(Budget),
    /// Measured size; set exactly once.
    Resolved(u64, Budget),
}

impl Slot {
    pub fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending(_))
    }

    pub fn size(&self) -> Option<u64> {
        match *self {
            Slot::Resolved(size, _) => Some(size),
            _ => None,
        }
    }

    /// Verdict of a resolved slot; `None` while excluded or pending.
    pub fn verdict(&self) -> Option<Verdict> {
        match *self {
            Slot::Resolved(size, budget) => Some(budget.classify(size)),
            _ => None,
        }
    }
}

/// Fixed-size per-path record: one [`Slot`] per [`Encoding`], in encoding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeRecord {
    slots: [Slot; Encoding::COUNT],
}

impl Default for SizeRecord {
    fn default() -> Self {
        Self {
            slots: [Slot::Excluded; Encoding::COUNT],
        }
    }
}

impl SizeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::track`].
    pub fn with(mut self, encoding: Encoding, budget: Budget) -> Self {
        self.track(encoding, budget);
        self
    }

    /// Mark `encoding` as expected with `budget`. Only valid before compression starts.
    pub fn track(&mut self, encoding: Encoding, budget: Budget) {
        self.slots[encoding.index()] = Slot::Pending(budget);
    }

    pub fn slot(&self, encoding: Encoding) -> &Slot {
        &self.slots[encoding.index()]
    }

    pub fn slots(&self) -> impl Iterator<Item = (Encoding, &Slot)> {
        Encoding::ALL.iter().map(move |&e| (e, &self.slots[e.index()]))
    }

    pub fn has_pending(&self) -> bool {
        self.slots.iter().any(Slot::is_pending)
    }

    /// Write the measured size for a pending slot. Errors on excluded or already resolved slots.
    pub fn resolve(&mut self, encoding: Encoding, size: u64) -> Result<()> {
        let slot = &mut self.slots[encoding.index()];
        match *slot {
            Slot::Pending(budget) => {
                *slot = Slot::Resolved(size, budget);
                Ok(())
            }
            Slot::Excluded => bail!("'{}' is not tracked", encoding),
            Slot::Resolved(..) => bail!("'{}' was already measured", encoding),
        }
    }
}

/// Insertion-ordered map of absolute path to [`SizeRecord`]. Order drives report order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SizeTable {
    entries: Vec<(PathBuf, SizeRecord)>,
    index: HashMap<PathBuf, usize>,
}

impl SizeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new path. Returns false (and leaves the table untouched) if the path is already present.
    pub fn insert(&mut self, path: PathBuf, record: SizeRecord) -> bool {
        if self.index.contains_key(&path) {
            return false;
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push((path, record));
        true
    }

    pub fn get(&self, path: &Path) -> Option<&SizeRecord> {
        self.index.get(path).map(|&i| &self.entries[i].1)
    }

    pub(crate) fn get_mut(&mut self, path: &Path) -> Option<&mut SizeRecord> {
        let i = *self.index.get(path)?;
        Some(&mut self.entries[i].1)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &SizeRecord)> {
        self.entries.iter().map(|(p, r)| (p.as_path(), r))
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(p, _)| p.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve one slot. The single write path for measured sizes.
    pub fn resolve(&mut self, path: &Path, encoding: Encoding, size: u64) -> Result<()> {
        let record = self
            .get_mut(path)
            .ok_or_else(|| anyhow!("'{}' is not in the size table", path.display()))?;
        record.resolve(encoding, size)
    }

    /// True when no slot of any path is still pending.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|(_, r)| !r.has_pending())
    }
}

/// An immutable unit of work: compress `path` with `encoding` and check against `budget`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressionJob {
    pub path: PathBuf,
    pub encoding: Encoding,
    pub budget: Budget,
}

/// Path as presented to the user (config or glob spelling), keyed by absolute path.
#[derive(Clone, Debug, Default)]
pub struct DisplayPaths(HashMap<PathBuf, String>);

impl DisplayPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: PathBuf, display: impl Into<String>) {
        self.0.insert(path, display.into());
    }

    /// Display string for `path`, falling back to the path itself.
    pub fn display(&self, path: &Path) -> String {
        self.0
            .get(path)
            .cloned()
            .unwrap_or_else(|| path.display().to_string())
    }
}

/// Caller-supplied content normalization, applied once per file before compression.
#[derive(Clone)]
pub struct ContentTransform(Arc<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>);

impl ContentTransform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, content: &[u8]) -> Vec<u8> {
        (self.0)(content)
    }
}

impl fmt::Debug for ContentTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentTransform(..)")
    }
}

/// Which rendering strategy the reporter uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Live redraw on a terminal with few jobs, sequential otherwise.
    #[default]
    Auto,
    Live,
    Sequential,
    Plain,
}

/// Options for a measuring run (CLI and lib).
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Suppress all report output; success is still computed.
    pub silent: bool,
    /// Debug logging (CLI).
    pub verbose: bool,
    /// Override the worker count. When None, uses all available threads.
    pub concurrency: Option<usize>,
    pub reporter: ReportMode,
    /// Always measure the uncompressed size, even when only compressed encodings are configured.
    pub default_sizes: bool,
    pub transform: Option<ContentTransform>,
}

impl Opts {
    /// Library defaults: no report output, uncompressed size measured for every file.
    pub fn for_api() -> Self {
        Self {
            silent: true,
            default_sizes: true,
            ..Self::default()
        }
    }
}

/// Result of a run: overall success and the final table.
#[derive(Clone, Debug)]
pub struct RunResult {
    pub success: bool,
    pub table: SizeTable,
}
