use filesize::report::row::render_header;
use filesize::report::strategy::erase_lines;
use filesize::report::{
    Icons, Layout, Live, Plain, Reporter, ReporterState, Sequential, render_row, render_summary,
};
use filesize::{Budget, DisplayPaths, Encoding, SizeRecord, SizeTable};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn table() -> (SizeTable, DisplayPaths) {
    let mut table = SizeTable::new();
    let mut display = DisplayPaths::new();
    for name in ["a.js", "b.js"] {
        let path = PathBuf::from("/p").join(name);
        table.insert(
            path.clone(),
            SizeRecord::new()
                .with(Encoding::Brotli, Budget::Bounded(1000))
                .with(Encoding::None, Budget::Unbounded),
        );
        display.insert(path, name);
    }
    (table, display)
}

fn resolve_all(table: &mut SizeTable, name: &str) {
    let path = Path::new("/p").join(name);
    table.resolve(&path, Encoding::Brotli, 100).unwrap();
    table.resolve(&path, Encoding::None, 300).unwrap();
}

#[test]
fn test_end_twice_outputs_summary_once() {
    colored::control::set_override(false);
    let (mut table, display) = table();
    let buf = SharedBuf::default();
    let mut reporter = Reporter::new(
        Box::new(Sequential),
        Box::new(buf.clone()),
        &table,
        &display,
        false,
    );
    reporter.update(&table);
    resolve_all(&mut table, "a.js");
    resolve_all(&mut table, "b.js");
    reporter.update(&table);
    reporter.end();
    let after_first = buf.text();
    reporter.end();
    reporter.update(&table);

    assert_eq!(reporter.state(), ReporterState::Ended);
    assert_eq!(buf.text(), after_first);
    assert_eq!(after_first.matches("checks passed").count(), 1);
    assert!(after_first.ends_with("\n  2 checks passed 🎉\n\n"));
}

#[test]
fn test_silent_outputs_nothing_but_tallies() {
    let (mut table, display) = table();
    let buf = SharedBuf::default();
    let mut reporter = Reporter::new(
        Box::new(Live::default()),
        Box::new(buf.clone()),
        &table,
        &display,
        true,
    );
    reporter.update(&table);
    resolve_all(&mut table, "a.js");
    reporter.update(&table);
    reporter.end();

    assert!(buf.text().is_empty());
    assert_eq!(reporter.tally().passed, 1);
}

#[test]
fn test_resolved_paths_reported_once() {
    let (mut table, display) = table();
    let mut reporter = Reporter::new(
        Box::new(Plain),
        Box::new(std::io::sink()),
        &table,
        &display,
        true,
    );
    assert!(reporter.resolved_paths(&table).is_empty());
    resolve_all(&mut table, "b.js");
    assert_eq!(
        reporter.resolved_paths(&table),
        vec![PathBuf::from("/p/b.js")]
    );
    assert!(reporter.resolved_paths(&table).is_empty());
    resolve_all(&mut table, "a.js");
    assert_eq!(
        reporter.resolved_paths(&table),
        vec![PathBuf::from("/p/a.js")]
    );
}

#[test]
fn test_partially_resolved_row_is_not_printed_by_plain() {
    colored::control::set_override(false);
    let (mut table, display) = table();
    let buf = SharedBuf::default();
    let mut reporter = Reporter::new(
        Box::new(Plain),
        Box::new(buf.clone()),
        &table,
        &display,
        false,
    );
    reporter.update(&table);
    table
        .resolve(Path::new("/p/a.js"), Encoding::Brotli, 100)
        .unwrap();
    reporter.update(&table);
    assert!(!buf.text().contains("a.js"));

    table.resolve(Path::new("/p/a.js"), Encoding::None, 300).unwrap();
    reporter.update(&table);
    assert!(buf.text().contains(&format!("  {} a.js", Icons::TICK)));
    assert!(!buf.text().contains("b.js"));
}

/// Every row of `table` rendered on its own line, in fixture order.
fn block(table: &SizeTable, layout: &Layout, names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| {
            let record = table.get(&Path::new("/p").join(name))?;
            Some(render_row(name, record, layout) + "\n")
        })
        .collect()
}

#[cfg(unix)]
#[test]
fn test_live_redraws_every_row() {
    colored::control::set_override(false);
    let (mut table, display) = table();
    let layout = Layout::for_paths(["a.js", "b.js"]);
    let buf = SharedBuf::default();
    let mut reporter = Reporter::new(
        Box::new(Live::default()),
        Box::new(buf.clone()),
        &table,
        &display,
        false,
    );
    reporter.update(&table);
    let first = block(&table, &layout, &["a.js", "b.js"]);
    resolve_all(&mut table, "b.js");
    reporter.update(&table);
    let second = block(&table, &layout, &["a.js", "b.js"]);
    reporter.end();

    // Two rows drawn, so the redraw clears them plus the cursor line.
    let expected = [
        render_header(&layout),
        first,
        erase_lines(3),
        second,
        render_summary(&reporter.tally()),
    ]
    .concat();
    let out = buf.text();
    assert_eq!(out, expected);
    assert!(out.contains(&format!("  {} a.js", Icons::PROCESSING)));
    assert!(out.contains(&format!("  {} b.js", Icons::TICK)));
    assert!(out.contains(Icons::PLACEHOLDER));
    assert!(out.ends_with("\n  1 check passed 🎉\n\n"));
}

#[cfg(unix)]
#[test]
fn test_live_erases_only_rendered_rows() {
    colored::control::set_override(false);
    let (full, display) = table();
    let layout = Layout::for_paths(["a.js", "b.js"]);
    let b = Path::new("/p/b.js");
    let mut partial = SizeTable::new();
    partial.insert(b.to_path_buf(), *full.get(b).unwrap());

    let buf = SharedBuf::default();
    let mut reporter = Reporter::new(
        Box::new(Live::default()),
        Box::new(buf.clone()),
        &full,
        &display,
        false,
    );
    reporter.update(&full);
    reporter.update(&partial);
    reporter.update(&full);
    reporter.end();

    // a.js is absent from the second table: one line drawn, so the next erase covers two.
    let both = block(&full, &layout, &["a.js", "b.js"]);
    let expected = [
        render_header(&layout),
        both.clone(),
        erase_lines(3),
        block(&partial, &layout, &["a.js", "b.js"]),
        erase_lines(2),
        both,
        render_summary(&reporter.tally()),
    ]
    .concat();
    assert_eq!(buf.text(), expected);
}
