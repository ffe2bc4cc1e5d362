//! Path and size formatting utilities

use std::path::{Component, Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Relative spelling used for display: forward slashes on every platform.
pub fn path_to_display_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Absolute form of `path` (joined onto `base` when relative) with `.` and `..` removed lexically.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Keep the last `max` characters of `s` (the file name end is the useful part).
pub fn truncate_left(s: &str, max: usize) -> &str {
    let count = s.chars().count();
    if count <= max {
        return s;
    }
    let skip = count - max;
    let start = s.char_indices().nth(skip).map(|(i, _)| i).unwrap_or(s.len());
    &s[start..]
}

/// Format a byte count as kilobytes with two decimals, e.g. `3.33 KB`.
pub fn pretty_bytes(size: u64) -> String {
    format!("{:.2} KB", size as f64 / 1024.0)
}

/// Parse a human size like `"10 kB"`, `"3.5kb"`, `"1MB"` or `"512"` into bytes (1024 based).
/// Returns None for empty, negative or unknown units.
pub fn parse_size(input: &str) -> Option<u64> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let value: f64 = number.parse().ok()?;
    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "kb" => 1 << 10,
        "mb" => 1 << 20,
        "gb" => 1 << 30,
        "tb" => 1 << 40,
        "pb" => 1 << 50,
        _ => return None,
    };
    Some((value * multiplier as f64).floor() as u64)
}
