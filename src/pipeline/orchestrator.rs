use anyhow::Result;
use log::debug;

use crate::engine::backend::CompressionBackend;
use crate::engine::jobs::enumerate_jobs;
use crate::engine::reader::{ContentCache, FileReader};
use crate::engine::recorder::{ResultRecorder, SnapshotFn};
use crate::engine::scheduler::BoundedScheduler;
use crate::report::Reporter;
use crate::{CompressionJob, DisplayPaths, Opts, RunResult, SizeTable};

/// Collaborators of a run.
pub struct RunContext<'a> {
    pub reader: &'a dyn FileReader,
    pub backend: &'a dyn CompressionBackend,
}

/// Compress every job with the bounded scheduler, recording results as they complete and
/// driving `reporter`. Returns the AND of all checks.
///
/// Contents must already be in `cache` for every job path.
pub fn compress_table(
    table: &mut SizeTable,
    jobs: Vec<CompressionJob>,
    cache: &ContentCache,
    backend: &dyn CompressionBackend,
    scheduler: &BoundedScheduler,
    reporter: &mut Reporter,
    on_snapshot: Option<&mut SnapshotFn<'_>>,
) -> bool {
    debug!(
        "Compressing {} jobs with ceiling {}",
        jobs.len(),
        scheduler.ceiling()
    );
    // Header plus every row as pending.
    reporter.update(table);

    let on_snapshot = on_snapshot.map(|f| f as &mut SnapshotFn<'_>);
    let mut recorder = ResultRecorder::new(table, reporter, on_snapshot);
    let success = scheduler.run(
        jobs,
        |job: &CompressionJob| match cache.get(&job.path) {
            Some(content) => backend.compressed_len(job.encoding, content),
            None => Err(anyhow::anyhow!(
                "no content loaded for '{}'",
                job.path.display()
            )),
        },
        |job, outcome| recorder.record(&job, outcome),
    );
    drop(recorder);

    reporter.end();
    success
}

/// Measure `table` and report on stdout. See [`measure_with_reporter`].
pub fn measure<F>(
    table: SizeTable,
    display: &DisplayPaths,
    opts: &Opts,
    ctx: &RunContext<'_>,
    on_snapshot: Option<F>,
) -> Result<RunResult>
where
    F: FnMut(&SizeTable),
{
    measure_with_reporter(
        table,
        opts,
        ctx,
        |job_count, table| Reporter::stdout(opts.reporter, job_count, table, display, opts.silent),
        on_snapshot,
    )
}

/// Enumerate jobs (reading every file once), compress with bounded concurrency and report
/// through the reporter built by `make_reporter` from the job count and the final job table.
///
/// `on_snapshot` receives the table after every recorded size.
pub fn measure_with_reporter<M, F>(
    mut table: SizeTable,
    opts: &Opts,
    ctx: &RunContext<'_>,
    make_reporter: M,
    on_snapshot: Option<F>,
) -> Result<RunResult>
where
    M: FnOnce(usize, &SizeTable) -> Reporter,
    F: FnMut(&SizeTable),
{
    let mut cache = ContentCache::new();
    let jobs = enumerate_jobs(
        &mut table,
        opts.default_sizes,
        ctx.reader,
        opts.transform.as_ref(),
        &mut cache,
    )?;
    let scheduler = BoundedScheduler::new(opts.concurrency);
    let mut reporter = make_reporter(jobs.len(), &table);

    let success = match on_snapshot {
        None => compress_table(
            &mut table,
            jobs,
            &cache,
            ctx.backend,
            &scheduler,
            &mut reporter,
            None,
        ),
        Some(mut f) => compress_table(
            &mut table,
            jobs,
            &cache,
            ctx.backend,
            &scheduler,
            &mut reporter,
            Some(&mut f),
        ),
    };
    Ok(RunResult { success, table })
}
