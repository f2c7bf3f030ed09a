//! Synthetic identifiers for result holders
//!
//! The id only has to be non-empty and distinct across calls. It is a
//! nanosecond Unix timestamp, bumped past the previous value when two calls
//! land on the same tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use once_cell::sync::Lazy;

/// Lock-free, strictly increasing id source
#[derive(Debug, Default)]
pub struct SyntheticIdGenerator {
    last: AtomicU64,
}

impl SyntheticIdGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> String {
        self.next_value().to_string()
    }

    fn next_value(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

static GLOBAL_IDS: Lazy<SyntheticIdGenerator> = Lazy::new(SyntheticIdGenerator::new);

/// Next id from the process-wide generator
pub fn next_synthetic_id() -> String {
    GLOBAL_IDS.next_id()
}
