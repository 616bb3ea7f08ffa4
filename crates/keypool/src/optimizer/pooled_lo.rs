use crate::{AccessCallback, Optimizer, Result};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct PooledLoState {
    last_source_value: Option<i64>,
    next: i64,
}

/// Pooled optimization with lazy bounds: only the last fetched source value
/// is stored, and the block's exclusive upper limit is derived as
/// `last_source_value + increment` at each call.
///
/// Hands out the same blocks as [`PooledOptimizer`]; preferred where the
/// structure's initial-value semantics make the stored counter read as "low
/// end of the next unreserved block" rather than "high end of the current
/// one".
///
/// [`PooledOptimizer`]: crate::PooledOptimizer
pub struct PooledLoOptimizer {
    increment_size: u32,
    state: Mutex<PooledLoState>,
}

impl PooledLoOptimizer {
    pub fn new(increment_size: u32) -> Self {
        Self {
            increment_size,
            state: Mutex::new(PooledLoState::default()),
        }
    }
}

impl Optimizer for PooledLoOptimizer {
    fn generate(&self, callback: &mut dyn AccessCallback) -> Result<i64> {
        let increment = i64::from(self.increment_size);
        let mut state = self.state.lock();
        let exhausted = match state.last_source_value {
            None => true,
            Some(low) => state.next >= low + increment,
        };
        if exhausted {
            let low = callback.next_raw_value()?;
            state.last_source_value = Some(low);
            state.next = low;
        }
        let value = state.next;
        state.next += 1;
        Ok(value)
    }

    fn increment_size(&self) -> u32 {
        self.increment_size
    }

    fn applies_increment_to_source(&self) -> bool {
        true
    }

    fn last_source_value(&self) -> Option<i64> {
        self.state.lock().last_source_value
    }
}
