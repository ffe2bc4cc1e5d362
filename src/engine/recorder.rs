//! Result recorder: the per-completion handler, run on the control thread.

use anyhow::Result;
use log::error;

use crate::report::Reporter;
use crate::{CompressionJob, SizeTable};

/// Callback receiving the table after every recorded size.
pub type SnapshotFn<'a> = dyn FnMut(&SizeTable) + 'a;

/// Single writer of measured sizes into the table.
pub struct ResultRecorder<'a> {
    table: &'a mut SizeTable,
    reporter: &'a mut Reporter,
    on_snapshot: Option<&'a mut SnapshotFn<'a>>,
}

impl<'a> ResultRecorder<'a> {
    pub fn new(
        table: &'a mut SizeTable,
        reporter: &'a mut Reporter,
        on_snapshot: Option<&'a mut SnapshotFn<'a>>,
    ) -> Self {
        Self {
            table,
            reporter,
            on_snapshot,
        }
    }

    /// Record one job outcome. Returns whether the check passed.
    ///
    /// A compression error leaves the slot pending and fails the check.
    pub fn record(&mut self, job: &CompressionJob, outcome: Result<u64>) -> bool {
        let size = match outcome {
            Ok(size) => size,
            Err(e) => {
                error!(
                    "Could not compress '{}' with '{}'. ({:#})",
                    job.path.display(),
                    job.encoding,
                    e
                );
                return false;
            }
        };
        if let Err(e) = self.table.resolve(&job.path, job.encoding, size) {
            error!(
                "Could not record '{}' with '{}' in the size table. ({:#})",
                job.path.display(),
                job.encoding,
                e
            );
            return false;
        }
        self.reporter.update(&*self.table);
        if let Some(on_snapshot) = self.on_snapshot.as_mut() {
            on_snapshot(&*self.table);
        }
        job.budget.allows(size)
    }
}
