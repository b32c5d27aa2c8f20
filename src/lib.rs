//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# logwire

logwire is a leveled logging engine with exactly one output per logger: the
console, or an append-only log file.

# Levels

| Name  | Macro     | Notes                                                        |
|-------|-----------|--------------------------------------------------------------|
| DEBUG | `debug!`  |                                                              |
| INFO  | `info!`   |                                                              |
| WARN  | `warn!`   |                                                              |
| ERROR | `err!`    |                                                              |
| FATAL | `fatal!`  | always written synchronously, always echoed to the console   |

Each level is enabled independently by name when the logger is opened. A disabled
level costs one bitmask test: no formatting, no allocation, no I/O.

# The API

```rust
use logwire::{Config, ContextEntry, Logger};

let logger = Logger::open(Config::new().levels(["INFO", "ERROR"]).test_mode(true))?;

logwire::info!(logger, "Hello {world}!", world = "there");
logwire::err!(logger, ctx: [ContextEntry::new("user", "alice")], "login failed");
logwire::debug!(logger, "not written, DEBUG is disabled");
# Ok::<(), logwire::Error>(())
```

Every entry renders as

```text
2024-05-01 12:30:00.000 +02:00 [ERROR] src/main.rs at 10:5
{user: alice}
~login failed
```

where the context line appears only when context entries were passed.

# Blocking and async writes

Without an executor every write is blocking: the whole entry is written before the
log call returns, and the formatted buffer is dropped right after.

With an [`executor::AsyncWriteExecutor`] configured and file output on Linux, the
log file is kept as a raw descriptor and non-fatal entries are submitted to the
executor instead. The log call returns immediately; the buffer waits in a
pending-write table until the executor's completion callback reclaims it.

**Async writes are fire-and-forget.** A failed async write is not reported to the
caller and is never retried. Closing a logger does not wait for in-flight writes;
await [`Logger::drain`] first if they must land.

# Process-wide logger

[`global_logger::init`] installs one logger for the whole process. It may succeed
only once; a second call panics.
*/

mod config;
pub mod context;
mod dispatch;
mod error;
pub mod executor;
pub mod formatter;
pub mod global_logger;
mod inmemory_sink;
mod level;
mod log_record;
mod logger;
mod macros;
pub mod pending;
mod sink;
mod spinlock;
mod stdout_sink;

pub use config::{Config, Timezone, FILE_ENV, LEVELS_ENV, TEST_MODE_ENV};
pub use context::ContextEntry;
pub use dispatch::{LOG_FILE_MODE, OutputMode};
pub use error::{Error, Result};
pub use formatter::ALLOCATION_FAILURE_EXIT_CODE;
pub use inmemory_sink::InMemorySink;
pub use level::{Level, LevelMask};
pub use log_record::{CallSite, LogRecord};
pub use logger::Logger;
pub use pending::{BufferStats, Drain, OpId};
pub use sink::Sink;
pub use stdout_sink::StdoutSink;
