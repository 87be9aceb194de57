//! Product id allocation.
//!
//! Ids are millisecond timestamps, bumped past the highest id already seen so
//! that two creations inside the same millisecond still get distinct ids.

use pureextracts_shared::ProductId;

/// Source of the current time in Unix milliseconds.
pub type Clock = fn() -> i64;

/// Wall-clock [`Clock`].
pub fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Hands out strictly increasing ids.
#[derive(Debug, Clone)]
pub(crate) struct IdAllocator {
    clock: Clock,
    highest: Option<i64>,
}

impl IdAllocator {
    pub(crate) fn new(clock: Clock) -> Self {
        Self {
            clock,
            highest: None,
        }
    }

    /// Record an id that is already in use.
    pub(crate) fn observe(&mut self, id: ProductId) {
        self.highest = Some(self.highest.map_or(id.0, |h| h.max(id.0)));
    }

    pub(crate) fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// The next unused id, or `None` once an id of `i64::MAX` has been seen.
    pub(crate) fn next(&mut self) -> Option<ProductId> {
        let now = (self.clock)();
        let id = match self.highest {
            None => now,
            Some(highest) => now.max(highest.checked_add(1)?),
        };
        self.highest = Some(id);
        Some(ProductId(id))
    }
}
