// SPDX-License-Identifier: MIT OR Apache-2.0
use std::fmt::Debug;
use std::io;

/**
The console destination of a logger.

A logger writes console output, and the console echo of FATAL entries, through a
sink. [`crate::StdoutSink`] is the default; [`crate::InMemorySink`] records entries
for tests.
*/
pub trait Sink: Debug + Send + Sync {
    /**
    Writes one complete entry.

    Returns the number of bytes written. The dispatcher treats any count other than
    `entry.len()` as a fatal short write.
    */
    fn write_entry(&self, entry: &[u8]) -> io::Result<usize>;

    /**
    The application may imminently exit.  Ensure all buffers are flushed and up to date.
    */
    fn prepare_to_die(&self);
}

/*
Boilerplate notes.

# Sink

Clone on Sink doesn't make sense, loggers share sinks through Arc.
PartialEq/Eq/Hash: unclear whether we'd mean data equality or provenance, so no.
Default is not sensible since who knows how a sink is constructed.
Send/Sync are required, completion callbacks and log calls can arrive on any thread.
*/
