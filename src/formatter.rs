// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of a log entry.
//!
//! Every entry has the same shape:
//!
//! ```text
//! <timestamp> [<LEVEL>] <file> at <line>:<column>
//! {name1: value1, name2: value2}
//! ~<message>
//! ```
//!
//! The context line is present only when context entries were supplied. Each line,
//! including the last, ends in `\n`, so entries can be appended to a file back to back.
//!
//! The formatter depends only on its inputs. The caller reads the clock; this keeps
//! every output here reproducible in tests.
//!
//! The message template is rendered straight into the entry's buffer. Every append
//! reserves fallibly, so running out of memory anywhere while formatting takes the
//! same exit path.

use crate::Level;
use crate::context::ContextEntry;
use crate::log_record::{CallSite, LogRecord};
use chrono::{DateTime, FixedOffset};
use std::collections::TryReserveError;
use std::fmt::{Arguments, Write};

/// The timestamp layout used at the start of every entry.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %:z";

/// Exit code used when a log buffer cannot be allocated.
pub const ALLOCATION_FAILURE_EXIT_CODE: i32 = 3;

//upper bound on the rendered timestamp, tag and punctuation
const FIXED_OVERHEAD: usize = 64;

/**
Formats one entry into a new, exclusively owned record.

`message` is the call's template with its arguments, rendered into the record.
`context` is copied into the record; passing `Some(&[])` renders the same as `None`.

```
use logwire::{CallSite, ContextEntry, Level};
use logwire::formatter::format_record;
use chrono::{FixedOffset, TimeZone};

let utc = FixedOffset::east_opt(0).unwrap();
let ts = utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
let record = format_record(
    Level::Warn,
    format_args!("disk almost {}", "full"),
    Some(&[ContextEntry::new("mount", "/var")]),
    CallSite::new("src/main.rs", 10, 5),
    &ts,
);
assert_eq!(
    record.as_str(),
    "2024-05-01 12:30:00.000 +00:00 [WARN] src/main.rs at 10:5\n{mount: /var}\n~disk almost full\n"
);
```
*/
pub fn format_record(
    level: Level,
    message: Arguments<'_>,
    context: Option<&[ContextEntry<'_>]>,
    site: CallSite,
    timestamp: &DateTime<FixedOffset>,
) -> LogRecord {
    let context = context.filter(|entries| !entries.is_empty());
    let mut record = LogRecord::new(level);
    let estimate = FIXED_OVERHEAD
        + site.file.len()
        + message.as_str().map_or(0, str::len)
        + context.map_or(0, |entries| {
            entries
                .iter()
                .map(|e| e.name.len() + e.value.len() + 4)
                .sum::<usize>()
                + 3
        });
    if let Err(e) = record.try_reserve(estimate) {
        allocation_failure(e);
    }
    if let Err(e) = write_entry(&mut record, level, message, context, site, timestamp) {
        allocation_failure(e);
    }
    record
}

fn write_entry(
    record: &mut LogRecord,
    level: Level,
    message: Arguments<'_>,
    context: Option<&[ContextEntry<'_>]>,
    site: CallSite,
    timestamp: &DateTime<FixedOffset>,
) -> Result<(), TryReserveError> {
    record.try_log_fmt(format_args!(
        "{} [{}] {}\n",
        timestamp.format(TIMESTAMP_FORMAT),
        level,
        site
    ))?;
    if let Some(entries) = context {
        record.try_log("{")?;
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                record.try_log(", ")?;
            }
            record.try_log_fmt(format_args!("{entry}"))?;
        }
        record.try_log("}\n")?;
    }
    record.try_log("~")?;
    record.try_log_fmt(message)?;
    record.try_log("\n")
}

/**
Renders context entries as `{name1: value1, name2: value2}`.

```
use logwire::ContextEntry;
use logwire::formatter::render_context;

let block = render_context(&[ContextEntry::new("john", "doe"), ContextEntry::new("jane", "doe")]);
assert_eq!(block, "{john: doe, jane: doe}");
```
*/
pub fn render_context(entries: &[ContextEntry<'_>]) -> String {
    let mut out = String::from("{");
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{entry}");
    }
    out.push('}');
    out
}

/**
Reports a failed buffer allocation on stderr and terminates the process.

There is no degraded mode: a logger that cannot allocate cannot report anything.
*/
fn allocation_failure(error: TryReserveError) -> ! {
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("logwire: failed to allocate a log entry: {error}");
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&wasm_bindgen::JsValue::from_str(
        "logwire: failed to allocate a log entry",
    ));
    #[cfg(target_arch = "wasm32")]
    let _ = error;
    std::process::exit(ALLOCATION_FAILURE_EXIT_CODE)
}
