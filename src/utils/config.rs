//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    settings_filename: String,
    config_key: &'static str,
    manifest_filename: &'static str,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                settings_filename: format!(".{pkg}.toml"),
                config_key: "filesize",
                manifest_filename: "package.json",
            }
        })
    }

    /// Run settings file looked up in the project directory (e.g. `.filesize.toml`).
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }

    /// Key inside the project manifest that holds the budgets.
    pub fn config_key(&self) -> &str {
        self.config_key
    }

    /// Manifest looked up when a project directory (not a config file) is given.
    pub fn manifest_filename(&self) -> &str {
        self.manifest_filename
    }
}

// ---- Worker threads ----

/// Concurrency ceiling for the compression worker pool.
/// Use [`ConcurrencyLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug)]
pub struct ConcurrencyLimits {
    /// Available threads (from rayon); set by [`ConcurrencyLimits::current()`].
    pub all_threads: usize,
    /// Never run with fewer workers than this.
    pub floor: usize,
}

impl Default for ConcurrencyLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl ConcurrencyLimits {
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Effective ceiling: the requested override or all threads, never below the floor.
    pub fn ceiling(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.all_threads).max(self.floor)
    }
}

// ---- Reading ----

/// File reading thresholds.
pub struct ReadingConsts;

impl ReadingConsts {
    /// File size above which contents are memory-mapped instead of read (bytes). 16 MB.
    pub const MMAP_THRESHOLD: u64 = 16 * 1024 * 1024;
}

// ---- Compression ----

/// Encoder settings for the default backend.
pub struct CompressionConsts;

impl CompressionConsts {
    /// Brotli quality (max).
    pub const BROTLI_QUALITY: u32 = 11;
    /// Brotli window size (log2), brotli's default.
    pub const BROTLI_LGWIN: u32 = 22;
    /// Internal buffer size handed to the brotli writer.
    pub const BROTLI_BUFFER_SIZE: usize = 4096;
    /// Gzip level (max).
    pub const GZIP_LEVEL: u32 = 9;
}

// ---- Report ----

/// Report layout and classification thresholds.
pub struct ReportConsts;

impl ReportConsts {
    /// A passing size with less headroom than this fraction of its budget is a warning.
    pub const WARNING_MARGIN: f64 = 0.05;
    /// Above this many jobs the live redraw is not worth it; fall back to sequential output.
    pub const LIVE_REDRAW_MAX_ITEMS: usize = 30;
    /// Longest path column before display paths get truncated from the left.
    pub const MAX_PATH_DISPLAY: usize = 30;
    /// Minimum width of one encoding column (fits `1023.99 KB`).
    pub const MIN_FORMAT_DISPLAY: usize = 10;
    /// Padding added after the widest column content.
    pub const COLUMN_PADDING: usize = 2;
}

// ---- Exit codes ----

/// Exit codes of the CLI.
pub struct ExitCodes;

impl ExitCodes {
    /// Project or configuration could not be discovered or validated.
    pub const DISCOVERY_FAILURE: u8 = 5;
    /// At least one check failed (budget exceeded or compression error).
    pub const CHECK_FAILURE: u8 = 6;
}
