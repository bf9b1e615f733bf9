//! Debug diagnostics
//!
//! Console-style calls (`info`, `warn`, `dir`, ...) that are only emitted
//! when a container runs with `debug` on. Output goes through `tracing`
//! under the `paging` target. Nothing here feeds back into control flow.

use serde_json::{Map, Value};

const METHODS: &[&str] = &["info", "warn", "error", "debug", "log", "dir"];

/// Gate for debug output
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics {
    enabled: bool,
}

impl Diagnostics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// One named call. Unknown method names are dropped.
    ///
    /// Returns whether anything was emitted.
    pub fn emit(&self, method: &str, args: &[Value]) -> bool {
        if !self.enabled || !METHODS.contains(&method) {
            return false;
        }
        write(method, args);
        true
    }

    /// Several calls at once, keyed by method name. An array value is the
    /// argument list; anything else a single argument. Unknown method names
    /// fall back to `log`.
    pub fn emit_map(&self, calls: &Map<String, Value>) -> usize {
        if !self.enabled {
            return 0;
        }
        for (method, value) in calls {
            let args = match value {
                Value::Array(items) => items.as_slice(),
                other => std::slice::from_ref(other),
            };
            let method = if METHODS.contains(&method.as_str()) { method.as_str() } else { "log" };
            write(method, args);
        }
        calls.len()
    }
}

fn write(method: &str, args: &[Value]) {
    let line = render(args);
    match method {
        "error" => tracing::error!(target: "paging", "{}", line),
        "warn" => tracing::warn!(target: "paging", "{}", line),
        "debug" => tracing::debug!(target: "paging", "{}", line),
        _ => tracing::info!(target: "paging", "{}", line),
    }
}

/// Space-joined arguments; strings verbatim, other values as JSON
fn render(args: &[Value]) -> String {
    args.iter()
        .map(|arg| match arg {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
