// SPDX-License-Identifier: MIT OR Apache-2.0

//! Level filtering and buffer accounting on the console path.

use logwire::{Config, ContextEntry, Error, InMemorySink, Level, Logger, OutputMode, Sink};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn console_logger(levels: &[&str]) -> (Logger, Arc<InMemorySink>) {
    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::open(
        Config::new()
            .levels(levels.iter().copied())
            .console_sink(sink.clone()),
    )
    .unwrap();
    (logger, sink)
}

#[test]
fn disabled_levels_do_no_work() {
    let (logger, sink) = console_logger(&["ERROR"]);
    let evaluated = AtomicUsize::new(0);
    let expensive = || {
        evaluated.fetch_add(1, Ordering::Relaxed);
        "value"
    };

    logwire::debug!(logger, "debug {}", expensive());
    logwire::info!(logger, "info {}", expensive());
    logwire::warn!(logger, ctx: [ContextEntry::new("k", "v")], "warn {}", expensive());

    assert_eq!(evaluated.load(Ordering::Relaxed), 0);
    assert_eq!(logger.stats().issued, 0);
    assert!(sink.is_empty());
}

#[test]
fn enabled_level_writes_once_and_frees_once() {
    let (logger, sink) = console_logger(&["INFO", "ERROR"]);
    assert_eq!(logger.output_mode(), OutputMode::Console);

    logwire::info!(logger, "hello {}", "world");
    logwire::err!(logger, "failed with code {code}", code = 7);

    let entries = sink.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].contains(" [INFO] tests/level_filter.rs at "));
    assert!(entries[0].ends_with("\n~hello world\n"));
    assert!(entries[1].contains(" [ERROR] "));
    assert!(entries[1].ends_with("\n~failed with code 7\n"));

    let stats = logger.stats();
    assert_eq!(stats.issued, 2);
    assert_eq!(stats.released, 2);
    assert_eq!(stats.in_flight(), 0);
    assert_eq!(logger.pending_writes(), 0);
}

#[test]
fn methods_match_macros() {
    let (logger, sink) = console_logger(&["DEBUG", "INFO", "WARN", "ERROR", "FATAL"]);
    let site = logwire::CallSite::new("src/worker.rs", 3, 14);
    logger.debug(format_args!("d"), None, site);
    logger.info(format_args!("i"), None, site);
    logger.warn(format_args!("w"), None, site);
    logger.err(format_args!("e"), None, site);
    logger.fatal(format_args!("f"), None, site);

    let tags: Vec<String> = sink
        .entries()
        .iter()
        .map(|entry| {
            let start = entry.find('[').unwrap();
            let end = entry.find(']').unwrap();
            entry[start + 1..end].to_string()
        })
        .collect();
    assert_eq!(tags, ["DEBUG", "INFO", "WARN", "ERROR", "FATAL"]);
    assert!(sink.entries()[0].contains("src/worker.rs at 3:14\n"));
}

#[test]
fn context_is_rendered_between_header_and_message() {
    let (logger, sink) = console_logger(&["WARN"]);
    let owner = String::from("doe");
    let ctx = [
        ContextEntry::new("john", &owner),
        ContextEntry::new("jane", &owner),
    ];
    logwire::warn!(logger, ctx: ctx, "two entries");

    let entry = sink.drain_logs();
    let lines: Vec<&str> = entry.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "{john: doe, jane: doe}");
    assert_eq!(lines[2], "~two entries");
}

#[test]
fn test_mode_suppresses_console_writes() {
    let sink = Arc::new(InMemorySink::new());
    let logger = Logger::open(
        Config::new()
            .levels(["INFO", "FATAL"])
            .test_mode(true)
            .console_sink(sink.clone()),
    )
    .unwrap();

    logwire::info!(logger, "hidden");
    logwire::fatal!(logger, "also hidden");

    assert!(sink.is_empty());
    let stats = logger.stats();
    assert_eq!(stats.issued, 2);
    assert_eq!(stats.released, 2);
    assert_eq!(stats.suppressed, 2);
}

//a console that accepts all but the last byte of every entry
#[derive(Debug)]
struct TruncatingSink;

impl Sink for TruncatingSink {
    fn write_entry(&self, entry: &[u8]) -> io::Result<usize> {
        Ok(entry.len().saturating_sub(1))
    }

    fn prepare_to_die(&self) {}
}

#[test]
#[should_panic(expected = "short write to console")]
fn short_console_write_panics() {
    let logger = Logger::open(
        Config::new()
            .levels(["INFO"])
            .console_sink(Arc::new(TruncatingSink)),
    )
    .unwrap();
    logwire::info!(logger, "cut short");
}

#[test]
fn invalid_level_name_fails_open() {
    let err = Logger::open(Config::new().levels(["DEBUG", "VERBOSE"])).unwrap_err();
    assert!(matches!(err, Error::InvalidLogLevel(ref name) if name == "VERBOSE"));
    assert_eq!(err.to_string(), "invalid log level: \"VERBOSE\"");
}

#[test]
fn default_config_enables_nothing() {
    let (logger, sink) = console_logger(&[]);
    for level in Level::ALL {
        assert!(!logwire::log_enabled!(logger, level));
    }
    logwire::fatal!(logger, "dropped");
    assert!(sink.is_empty());
    assert_eq!(logger.close(), 0);
}
