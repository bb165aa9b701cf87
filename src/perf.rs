//! Lightweight performance instrumentation.
//!
//! Scopes are free when disabled; when enabled each one reports its elapsed
//! time as a `perf` tracing event on drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
#[must_use = "a scope measures until it is dropped"]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Scope {
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(target: "perf", scope = self.name, elapsed_ms, "{}: {elapsed_ms:.2} ms", self.name);
    }
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}
