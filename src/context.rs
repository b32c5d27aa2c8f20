// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat key/value pairs rendered alongside a log message.

use std::fmt::{Display, Formatter};

/**
One caller-supplied context pair.

Entries borrow their text; the formatter copies it into the log buffer before
returning, so a context slice only has to live for the duration of the log call.

```
use logwire::ContextEntry;

let entries = [ContextEntry::new("request", "42"), ContextEntry::new("user", "alice")];
assert_eq!(entries[0].to_string(), "request: 42");
```
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextEntry<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> ContextEntry<'a> {
    pub const fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }
}

impl<'a> From<(&'a str, &'a str)> for ContextEntry<'a> {
    fn from((name, value): (&'a str, &'a str)) -> Self {
        Self::new(name, value)
    }
}

impl Display for ContextEntry<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}
