//! Shared row, header and summary rendering.

use colored::Colorize;

use crate::engine::tools::{pretty_bytes, truncate_left};
use crate::utils::config::ReportConsts;
use crate::{Encoding, SizeRecord, Slot, Verdict};

pub struct Icons;

impl Icons {
    pub const TICK: &'static str = if cfg!(windows) { "√" } else { "✔" };
    pub const CROSS: &'static str = if cfg!(windows) { "×" } else { "✖" };
    pub const PROCESSING: &'static str = "-";
    pub const PLACEHOLDER: &'static str = "–";
    pub const TADA: &'static str = "🎉";
}

/// Column widths, fixed when the reporter is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub path_width: usize,
    pub format_width: usize,
}

impl Layout {
    /// Fit the path column to the longest display path, capped at [`ReportConsts::MAX_PATH_DISPLAY`].
    pub fn for_paths<'a, I>(display_paths: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let path_width = display_paths
            .into_iter()
            .map(|p| p.chars().count().min(ReportConsts::MAX_PATH_DISPLAY))
            .max()
            .unwrap_or(0);
        let widest_name = Encoding::ALL
            .iter()
            .map(|e| e.name().len())
            .max()
            .unwrap_or(0);
        Self {
            path_width,
            format_width: widest_name.max(ReportConsts::MIN_FORMAT_DISPLAY)
                + ReportConsts::COLUMN_PADDING,
        }
    }
}

/// Summary counters, accumulated once per resolved path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl Tally {
    pub fn add_record(&mut self, record: &SizeRecord) {
        for (_, slot) in record.slots() {
            match slot.verdict() {
                Some(Verdict::Pass) => self.passed += 1,
                Some(Verdict::Warn) => self.warned += 1,
                Some(Verdict::Fail) => self.failed += 1,
                Some(Verdict::Untracked) | None => {}
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.passed == 0 && self.warned == 0 && self.failed == 0
    }
}

fn checks(n: usize) -> &'static str {
    if n == 1 { "check" } else { "checks" }
}

/// `Filesizes` title plus the encoding column headings.
pub fn render_header(layout: &Layout) -> String {
    let formats: String = Encoding::ALL
        .iter()
        .map(|e| format!("{:<w$}", e.name(), w = layout.format_width))
        .collect();
    format!(
        "{}\n{} {}\n",
        "\n  Filesizes".bold(),
        " ".repeat(layout.path_width + 5),
        formats
    )
}

/// One size column. Excluded and pending slots show the placeholder.
fn render_slot(slot: &Slot, width: usize) -> String {
    let Slot::Resolved(size, _) = *slot else {
        return format!("{:<width$}", Icons::PLACEHOLDER).dimmed().to_string();
    };
    let text = format!("{:<width$}", pretty_bytes(size));
    match slot.verdict() {
        Some(Verdict::Pass) => text.green().dimmed().to_string(),
        Some(Verdict::Warn) => text.yellow().to_string(),
        Some(Verdict::Fail) => text.red().to_string(),
        _ => text.dimmed().to_string(),
    }
}

/// Full row with icon: cross if any slot failed, tick if nothing is pending, processing otherwise.
pub fn render_row(display_path: &str, record: &SizeRecord, layout: &Layout) -> String {
    let mut failed = false;
    let mut processing = false;
    let mut columns = String::new();
    for (_, slot) in record.slots() {
        failed |= slot.verdict() == Some(Verdict::Fail);
        processing |= slot.is_pending();
        columns.push_str(&render_slot(slot, layout.format_width));
    }
    let icon = if failed {
        Icons::CROSS.red().to_string()
    } else if processing {
        Icons::PROCESSING.dimmed().to_string()
    } else {
        Icons::TICK.green().dimmed().to_string()
    };
    let path = truncate_left(display_path, layout.path_width);
    format!(
        "  {} {:<pw$}  {}",
        icon,
        path,
        columns,
        pw = layout.path_width
    )
}

/// Passed / warned / failed lines, zero counts omitted. Empty when nothing was checked.
pub fn render_summary(tally: &Tally) -> String {
    if tally.is_empty() {
        return String::new();
    }
    let mut lines = Vec::new();
    if tally.passed > 0 {
        lines.push(
            format!("{} {} passed", tally.passed, checks(tally.passed))
                .green()
                .to_string(),
        );
    }
    if tally.warned > 0 {
        lines.push(format!(
            "{}{}",
            format!("{} {} warned", tally.warned, checks(tally.warned)).yellow(),
            " (within 5% of allowed size)".dimmed()
        ));
    }
    if tally.failed > 0 {
        lines.push(
            format!("{} {} failed", tally.failed, checks(tally.failed))
                .red()
                .to_string(),
        );
    }
    if tally.failed == 0
        && let Some(first) = lines.first_mut()
    {
        first.push(' ');
        first.push_str(Icons::TADA);
    }
    let mut out: String = lines.iter().map(|l| format!("\n  {l}")).collect();
    out.push_str("\n\n");
    out
}
