// SPDX-License-Identifier: MIT OR Apache-2.0

//! File output on the blocking path.

use logwire::{Config, ContextEntry, Error, InMemorySink, Logger, OutputMode, Timezone};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn file_logger(path: &Path, levels: &[&str]) -> (Logger, Arc<InMemorySink>) {
    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::open(
        Config::new()
            .file(path)
            .levels(levels.iter().copied())
            .timezone(Timezone::utc())
            .console_sink(sink.clone()),
    )
    .unwrap();
    (logger, sink)
}

#[test]
fn error_entry_is_appended_and_info_is_filtered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.log");
    let (logger, sink) = file_logger(&path, &["ERROR"]);
    assert_eq!(logger.output_mode(), OutputMode::File);
    assert!(!logger.async_available());

    logwire::info!(logger, "not written");
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    let line = line!() + 1;
    logwire::err!(logger, "boom");

    let contents = fs::read_to_string(&path).unwrap();
    let (header, body) = contents.split_once('\n').unwrap();
    assert_eq!(body, "~boom\n");

    let (timestamp, rest) = header.split_once(" [ERROR] ").unwrap();
    assert!(timestamp.ends_with(" +00:00"), "{timestamp}");
    let location = rest.strip_prefix("tests/file_output.rs at ").unwrap();
    let (entry_line, column) = location.split_once(':').unwrap();
    assert_eq!(entry_line, line.to_string());
    assert!(column.parse::<u32>().unwrap() > 0);

    assert!(sink.is_empty(), "non-fatal file entries are not echoed");
    assert_eq!(logger.close(), 0);
}

#[test]
fn entries_accumulate_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let (logger, _sink) = file_logger(&path, &["INFO", "WARN"]);

    for i in 0..3 {
        logwire::info!(logger, "entry {i}");
    }
    logwire::warn!(logger, ctx: [ContextEntry::new("john", "doe")], "with context");

    let contents = fs::read_to_string(&path).unwrap();
    let bodies: Vec<&str> = contents.lines().filter(|l| l.starts_with('~')).collect();
    assert_eq!(bodies, ["~entry 0", "~entry 1", "~entry 2", "~with context"]);
    assert!(contents.contains("\n{john: doe}\n~with context\n"));
    assert!(contents.ends_with('\n'));
    assert_eq!(logger.stats().in_flight(), 0);
}

#[test]
fn reopening_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("append.log");
    fs::write(&path, "existing\n").unwrap();

    let (logger, _sink) = file_logger(&path, &["INFO"]);
    logwire::info!(logger, "first run");
    logger.close();

    let (logger, _sink) = file_logger(&path, &["INFO"]);
    logwire::info!(logger, "second run");
    logger.close();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("existing\n"));
    let first = contents.find("~first run").unwrap();
    let second = contents.find("~second run").unwrap();
    assert!(first < second);
}

#[test]
fn fatal_is_written_to_file_and_echoed_to_console() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fatal.log");
    let (logger, sink) = file_logger(&path, &["FATAL"]);

    logwire::fatal!(logger, "out of {}", "disk");

    let file = fs::read_to_string(&path).unwrap();
    let console = sink.drain_logs();
    assert!(file.contains(" [FATAL] "));
    assert!(file.ends_with("~out of disk\n"));
    assert_eq!(console, file);
}

#[test]
fn test_mode_still_writes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiet.log");
    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::open(
        Config::new()
            .file(&path)
            .levels(["INFO", "FATAL"])
            .test_mode(true)
            .timezone(Timezone::utc())
            .console_sink(sink.clone()),
    )
    .unwrap();

    logwire::info!(logger, "kept on disk");
    logwire::fatal!(logger, "not echoed");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("~kept on disk\n"));
    assert!(contents.ends_with("~not echoed\n"));
    assert!(sink.is_empty(), "the fatal echo is a console write");
    let stats = logger.stats();
    assert_eq!((stats.issued, stats.released), (2, 2));
    assert_eq!(stats.suppressed, 1);
}

#[test]
fn missing_directory_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/app.log");
    let err = Logger::open(Config::new().file(&path).levels(["INFO"])).unwrap_err();
    match err {
        Error::FailedToOpenLogFile { path: failed, source } => {
            assert_eq!(failed, path);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_level_is_reported_before_file_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.log");
    let err = Logger::open(Config::new().file(&path).levels(["INFO", "TRACE"])).unwrap_err();
    assert!(matches!(err, Error::InvalidLogLevel(_)));
    assert!(!path.exists());
}

#[cfg(unix)]
#[test]
fn new_file_permissions_do_not_exceed_0644() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mode.log");
    let (logger, _sink) = file_logger(&path, &["INFO"]);
    logger.close();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode & !logwire::LOG_FILE_MODE, 0, "mode {mode:o}");
    assert_eq!(mode & 0o600, 0o600, "mode {mode:o}");
}
