// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logger configuration.
//!
//! A [`Config`] is built once and consumed by [`crate::Logger::open`] or
//! [`crate::global_logger::init`]. Level names are validated at open time, not
//! while building, so a config assembled from untrusted input reports
//! [`crate::Error::InvalidLogLevel`] from the same place as a file-open failure.
//!
//! ```
//! use logwire::{Config, Timezone};
//!
//! let config = Config::new()
//!     .file("/var/log/app.log")
//!     .levels(["INFO", "WARN", "ERROR", "FATAL"])
//!     .timezone(Timezone::utc());
//! # let _ = config;
//! ```

use crate::executor::AsyncWriteExecutor;
use crate::sink::Sink;
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use std::path::PathBuf;
use std::sync::Arc;

/// Comma-separated level names, e.g. `INFO,WARN,ERROR`.
pub const LEVELS_ENV: &str = "LOGWIRE_LEVELS";
/// Path of the log file. Unset means console output.
pub const FILE_ENV: &str = "LOGWIRE_FILE";
/// `1` or `true` enables test mode.
pub const TEST_MODE_ENV: &str = "LOGWIRE_TEST_MODE";

/// The offset timestamps are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timezone {
    /// The host's local offset, read at each log call.
    #[default]
    Local,
    /// A fixed offset regardless of host settings.
    Fixed(FixedOffset),
}

impl Timezone {
    pub fn utc() -> Self {
        Timezone::Fixed(Utc.fix())
    }

    /// The current time in this timezone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        match self {
            Timezone::Local => {
                let now = Local::now();
                now.with_timezone(now.offset())
            }
            Timezone::Fixed(offset) => Utc::now().with_timezone(offset),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub(crate) file: Option<PathBuf>,
    pub(crate) levels: Vec<String>,
    pub(crate) test_mode: bool,
    pub(crate) timezone: Timezone,
    pub(crate) console: Option<Arc<dyn Sink>>,
    pub(crate) executor: Option<Arc<dyn AsyncWriteExecutor>>,
}

impl Config {
    /// Console output, no levels enabled, local time, no executor.
    pub fn new() -> Self {
        Self::default()
    }

    /**
    Reads [`LEVELS_ENV`], [`FILE_ENV`] and [`TEST_MODE_ENV`] from the process environment.

    Unset variables keep the defaults of [`Config::new`].
    */
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::new();
        if let Some(levels) = lookup(LEVELS_ENV) {
            config = config.levels(
                levels
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty()),
            );
        }
        if let Some(path) = lookup(FILE_ENV).filter(|p| !p.is_empty()) {
            config = config.file(path);
        }
        if let Some(flag) = lookup(TEST_MODE_ENV) {
            config = config.test_mode(matches!(flag.trim(), "1" | "true"));
        }
        config
    }

    /// Write entries to `path` instead of the console.
    ///
    /// The file is created if needed and appended to.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Write entries to the console. This is the default.
    pub fn console(mut self) -> Self {
        self.file = None;
        self
    }

    /// Level names to enable, replacing any set earlier.
    pub fn levels<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = names.into_iter().map(Into::into).collect();
        self
    }

    /// In test mode console writes are skipped; everything else runs as usual.
    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    pub fn timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Replace the stdout console with another sink.
    pub fn console_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.console = Some(sink);
        self
    }

    /// Enable the async path. Only file output on Linux submits through the executor.
    pub fn executor(mut self, executor: Arc<dyn AsyncWriteExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_vars(vars(&[]));
        assert!(config.file.is_none());
        assert!(config.levels.is_empty());
        assert!(!config.test_mode);
        assert_eq!(config.timezone, Timezone::Local);
    }

    #[test]
    fn environment_is_parsed() {
        let config = Config::from_vars(vars(&[
            (LEVELS_ENV, " INFO, ERROR ,,"),
            (FILE_ENV, "/tmp/app.log"),
            (TEST_MODE_ENV, "true"),
        ]));
        assert_eq!(config.levels, ["INFO", "ERROR"]);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/app.log")));
        assert!(config.test_mode);
    }

    #[test]
    fn fixed_timezone_uses_its_offset() {
        let offset = FixedOffset::east_opt(-3 * 3600).unwrap();
        let now = Timezone::Fixed(offset).now();
        assert_eq!(now.offset(), &offset);
        assert_eq!(Timezone::utc().now().offset().local_minus_utc(), 0);
    }
}
