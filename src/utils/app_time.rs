// src/utils/app_time.rs

use std::sync::Mutex;
use std::time::Duration;

pub type AppInstant = std::time::Instant;

pub fn now() -> AppInstant {
    std::time::Instant::now()
}

/// Source of "now" for anything with an expiry. Injected so cache lifetimes can
/// be driven by hand in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> AppInstant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> AppInstant {
        now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<AppInstant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> AppInstant {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}
