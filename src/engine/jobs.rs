//! Job enumeration: expand the size table into one compression job per pending slot.

use anyhow::Result;
use log::debug;

use crate::engine::reader::{ContentCache, FileReader};
use crate::{Budget, CompressionJob, ContentTransform, Encoding, SizeTable, Slot};

/// Promote the excluded `none` slot of every path to `Pending(Unbounded)`, so the raw size is
/// always measured. Must run before any job is started.
pub fn track_default_sizes(table: &mut SizeTable) {
    let paths: Vec<_> = table.paths().map(|p| p.to_path_buf()).collect();
    for path in paths {
        if let Some(record) = table.get_mut(&path)
            && *record.slot(Encoding::None) == Slot::Excluded
        {
            record.track(Encoding::None, Budget::Unbounded);
        }
    }
}

/// One job per pending slot, in table order then encoding order. Excluded and resolved slots are skipped.
pub fn pending_jobs(table: &SizeTable) -> Vec<CompressionJob> {
    table
        .iter()
        .flat_map(|(path, record)| {
            record.slots().filter_map(move |(encoding, slot)| match *slot {
                Slot::Pending(budget) => Some(CompressionJob {
                    path: path.to_path_buf(),
                    encoding,
                    budget,
                }),
                _ => None,
            })
        })
        .collect()
}

/// Enumerate the jobs for `table` and fill `cache` with the contents they need.
///
/// With `default_sizes`, the baseline `none` job is synthesized for every path first.
pub fn enumerate_jobs(
    table: &mut SizeTable,
    default_sizes: bool,
    reader: &dyn FileReader,
    transform: Option<&ContentTransform>,
    cache: &mut ContentCache,
) -> Result<Vec<CompressionJob>> {
    if default_sizes {
        track_default_sizes(table);
    }
    let jobs = pending_jobs(table);
    cache.load(jobs.iter().map(|j| j.path.as_path()), reader, transform)?;
    debug!(
        "Enumerated {} compression jobs over {} files",
        jobs.len(),
        cache.len()
    );
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SizeRecord;
    use crate::engine::reader::FileContent;
    use std::path::{Path, PathBuf};

    struct StaticReader;

    impl FileReader for StaticReader {
        fn read(&self, _path: &Path) -> Result<Option<FileContent>> {
            Ok(Some(b"abc".to_vec().into()))
        }
    }

    fn table() -> SizeTable {
        let mut table = SizeTable::new();
        table.insert(
            PathBuf::from("/p/a.js"),
            SizeRecord::new()
                .with(Encoding::Brotli, Budget::Bounded(100))
                .with(Encoding::Gzip, Budget::Bounded(200)),
        );
        table.insert(
            PathBuf::from("/p/b.js"),
            SizeRecord::new().with(Encoding::None, Budget::Bounded(1000)),
        );
        table
    }

    #[test]
    fn test_pending_jobs_skip_excluded() {
        let jobs = pending_jobs(&table());
        let pairs: Vec<_> = jobs
            .iter()
            .map(|j| (j.path.to_str().unwrap(), j.encoding))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("/p/a.js", Encoding::Brotli),
                ("/p/a.js", Encoding::Gzip),
                ("/p/b.js", Encoding::None),
            ]
        );
        assert_eq!(jobs[1].budget, Budget::Bounded(200));
    }

    #[test]
    fn test_resolved_slots_are_not_enumerated() {
        let mut table = table();
        table
            .resolve(Path::new("/p/a.js"), Encoding::Brotli, 90)
            .unwrap();
        assert_eq!(pending_jobs(&table).len(), 2);
    }

    #[test]
    fn test_default_sizes_adds_baseline_job() {
        let mut table = table();
        let mut cache = ContentCache::new();
        let jobs = enumerate_jobs(&mut table, true, &StaticReader, None, &mut cache).unwrap();
        assert_eq!(jobs.len(), 4);
        assert!(jobs.contains(&CompressionJob {
            path: PathBuf::from("/p/a.js"),
            encoding: Encoding::None,
            budget: Budget::Unbounded,
        }));
        // An existing none budget is kept.
        assert_eq!(
            *table.get(Path::new("/p/b.js")).unwrap().slot(Encoding::None),
            Slot::Pending(Budget::Bounded(1000))
        );
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_without_default_sizes_table_untouched() {
        let mut table = table();
        let before = table.clone();
        let mut cache = ContentCache::new();
        let jobs = enumerate_jobs(&mut table, false, &StaticReader, None, &mut cache).unwrap();
        assert_eq!(jobs.len(), 3);
        assert_eq!(table, before);
    }
}
