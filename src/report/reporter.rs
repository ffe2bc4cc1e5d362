//! Reporter core: the Created -> Active -> Ended state machine and the `resolved_paths` query
//! shared by every rendering strategy.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use super::output::{Output, OutputQueue};
use super::row::{Layout, Tally};
use super::strategy::{RenderStrategy, ReportRow, UpdateView, select_strategy};
use crate::{DisplayPaths, ReportMode, SizeTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReporterState {
    /// Nothing emitted yet, not even the header.
    Created,
    Active,
    /// Summary emitted; further updates are ignored.
    Ended,
}

pub struct Reporter {
    strategy: Box<dyn RenderStrategy>,
    output: Output,
    rows: Vec<ReportRow>,
    /// Indexes into `rows` not yet fully resolved, in table order.
    waiting: Vec<usize>,
    layout: Layout,
    state: ReporterState,
    silent: bool,
    tally: Tally,
}

impl Reporter {
    /// Reporter over every path of `table` (rows keep the table's order), writing to `writer`.
    pub fn new(
        strategy: Box<dyn RenderStrategy>,
        writer: Box<dyn Write + Send>,
        table: &SizeTable,
        display: &DisplayPaths,
        silent: bool,
    ) -> Self {
        let rows: Vec<ReportRow> = table
            .paths()
            .map(|path| ReportRow {
                path: path.to_path_buf(),
                display: display.display(path),
            })
            .collect();
        let layout = Layout::for_paths(rows.iter().map(|r| r.display.as_str()));
        let output = if silent {
            Output::Null
        } else if strategy.queued() {
            Output::Queued(OutputQueue::spawn(writer))
        } else {
            Output::Direct(writer)
        };
        log::debug!("Reporter strategy: {}", strategy.name());
        Self {
            strategy,
            output,
            waiting: (0..rows.len()).collect(),
            rows,
            layout,
            state: ReporterState::Created,
            silent,
            tally: Tally::default(),
        }
    }

    /// Reporter on stdout with the strategy picked from `mode`, the job count and whether stdout is a terminal.
    pub fn stdout(
        mode: ReportMode,
        job_count: usize,
        table: &SizeTable,
        display: &DisplayPaths,
        silent: bool,
    ) -> Self {
        let stdout = std::io::stdout();
        let strategy = select_strategy(mode, job_count, stdout.is_terminal());
        Self::new(strategy, Box::new(stdout), table, display, silent)
    }

    pub fn state(&self) -> ReporterState {
        self.state
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Paths whose records have no pending slot left, each returned once over the reporter's
    /// lifetime. Removed from the waiting set as they are returned.
    pub fn resolved_paths(&mut self, table: &SizeTable) -> Vec<PathBuf> {
        self.take_resolved(table)
            .into_iter()
            .map(|i| self.rows[i].path.clone())
            .collect()
    }

    fn take_resolved(&mut self, table: &SizeTable) -> Vec<usize> {
        let rows = &self.rows;
        let mut resolved = Vec::new();
        self.waiting.retain(|&i| {
            let done = table
                .get(&rows[i].path)
                .is_some_and(|record| !record.has_pending());
            if done {
                resolved.push(i);
            }
            !done
        });
        resolved
    }

    fn begin(&mut self) {
        if self.state != ReporterState::Created {
            return;
        }
        self.state = ReporterState::Active;
        if !self.silent {
            let header = self.strategy.render_header(&self.layout);
            self.output.write(header);
        }
    }

    /// Render whatever changed in `table` since the last call. Never mutates the table.
    pub fn update(&mut self, table: &SizeTable) {
        if self.state == ReporterState::Ended {
            return;
        }
        self.begin();
        let newly_resolved = self.take_resolved(table);
        for &i in &newly_resolved {
            if let Some(record) = table.get(&self.rows[i].path) {
                self.tally.add_record(record);
            }
        }
        if self.silent {
            return;
        }
        let text = self.strategy.render_update(&UpdateView {
            table,
            rows: &self.rows,
            newly_resolved: &newly_resolved,
            layout: &self.layout,
        });
        self.output.write(text);
    }

    /// Emit the summary and flush all output. No-op when already ended.
    pub fn end(&mut self) {
        if self.state == ReporterState::Ended {
            return;
        }
        self.state = ReporterState::Ended;
        if !self.silent {
            let summary = self.strategy.render_summary(&self.tally);
            self.output.write(summary);
        }
        self.output.close();
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.output.close();
    }
}
