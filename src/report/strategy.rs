//! Rendering strategies. They differ only in how newly resolved rows are drawn; which rows are
//! newly resolved is decided by the [`Reporter`](super::Reporter) core.

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use super::row::{self, Layout, Tally};
use crate::utils::config::ReportConsts;
use crate::{ReportMode, SizeTable};

/// A tracked path and the string shown for it.
#[derive(Clone, Debug)]
pub struct ReportRow {
    pub path: std::path::PathBuf,
    pub display: String,
}

/// What a strategy sees on each update.
pub struct UpdateView<'a> {
    pub table: &'a SizeTable,
    /// Every tracked path, in table order.
    pub rows: &'a [ReportRow],
    /// Indexes into `rows` that resolved since the previous update, in table order.
    pub newly_resolved: &'a [usize],
    pub layout: &'a Layout,
}

impl UpdateView<'_> {
    fn render(&self, row: &ReportRow) -> Option<String> {
        self.table
            .get(&row.path)
            .map(|record| row::render_row(&row.display, record, self.layout))
    }

    /// Newly resolved rows, one line each.
    fn resolved_lines(&self) -> String {
        self.newly_resolved
            .iter()
            .filter_map(|&i| self.render(&self.rows[i]))
            .map(|line| line + "\n")
            .collect()
    }
}

pub trait RenderStrategy {
    fn name(&self) -> &'static str;

    fn render_header(&mut self, layout: &Layout) -> String {
        row::render_header(layout)
    }

    fn render_update(&mut self, view: &UpdateView<'_>) -> String;

    fn render_summary(&mut self, tally: &Tally) -> String {
        row::render_summary(tally)
    }

    /// Whether output goes through the ordered output queue (true) or is written synchronously.
    fn queued(&self) -> bool {
        true
    }
}

/// Append-only: each row is printed once, when all of its encodings resolved.
#[derive(Debug, Default)]
pub struct Sequential;

impl RenderStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn render_update(&mut self, view: &UpdateView<'_>) -> String {
        view.resolved_lines()
    }
}

/// Sequential rows, written synchronously.
#[derive(Debug, Default)]
pub struct Plain;

impl RenderStrategy for Plain {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn render_update(&mut self, view: &UpdateView<'_>) -> String {
        view.resolved_lines()
    }

    fn queued(&self) -> bool {
        false
    }
}

/// Terminal redraw: erase the previously drawn block and draw every row again, pending ones
/// with placeholders.
#[derive(Debug, Default)]
pub struct Live {
    drawn_lines: usize,
}

impl RenderStrategy for Live {
    fn name(&self) -> &'static str {
        "live"
    }

    fn render_update(&mut self, view: &UpdateView<'_>) -> String {
        // The cursor sits on the empty line below the block, hence one extra line.
        let mut out = match self.drawn_lines {
            0 => String::new(),
            n => erase_lines(n + 1),
        };
        let mut drawn = 0;
        for row in view.rows {
            if let Some(line) = view.render(row) {
                out.push_str(&line);
                out.push('\n');
                drawn += 1;
            }
        }
        self.drawn_lines = drawn;
        out
    }
}

/// Escape sequence clearing `count` lines upwards from the cursor, leaving it at column 0.
pub fn erase_lines(count: usize) -> String {
    let mut buf: Vec<u8> = Vec::new();
    for i in 0..count {
        let _ = queue!(buf, Clear(ClearType::CurrentLine));
        if i + 1 < count {
            let _ = queue!(buf, MoveUp(1));
        }
    }
    if count > 0 {
        let _ = queue!(buf, MoveToColumn(0));
    }
    String::from_utf8(buf).unwrap_or_default()
}

/// Pick the strategy for `mode`. Auto uses live redraw only on a terminal with few jobs.
pub fn select_strategy(
    mode: ReportMode,
    job_count: usize,
    is_tty: bool,
) -> Box<dyn RenderStrategy> {
    match mode {
        ReportMode::Live => Box::new(Live::default()),
        ReportMode::Sequential => Box::new(Sequential),
        ReportMode::Plain => Box::new(Plain),
        ReportMode::Auto if is_tty && job_count <= ReportConsts::LIVE_REDRAW_MAX_ITEMS => {
            Box::new(Live::default())
        }
        ReportMode::Auto => Box::new(Sequential),
    }
}
