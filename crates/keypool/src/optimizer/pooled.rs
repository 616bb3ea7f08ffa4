use crate::{AccessCallback, Optimizer, Result};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct PooledState {
    last_source_value: Option<i64>,
    /// Next value to hand out; valid only while `<= upper`.
    next: i64,
    /// Inclusive upper bound of the current block.
    upper: i64,
}

/// Pooled optimization: the source itself steps by the increment size, so
/// each fetched raw value `v` is the low end of a freshly reserved block
/// `[v, v + increment)` handed out one value at a time.
///
/// Because the source moves in plain steps of the increment, the physical
/// counter stays compatible with any external writer that advances it by the
/// same step.
pub struct PooledOptimizer {
    increment_size: u32,
    state: Mutex<PooledState>,
}

impl PooledOptimizer {
    pub fn new(increment_size: u32) -> Self {
        Self {
            increment_size,
            state: Mutex::new(PooledState::default()),
        }
    }
}

impl Optimizer for PooledOptimizer {
    fn generate(&self, callback: &mut dyn AccessCallback) -> Result<i64> {
        let increment = i64::from(self.increment_size);
        let mut state = self.state.lock();
        if state.last_source_value.is_none() || state.next > state.upper {
            let low = callback.next_raw_value()?;
            state.last_source_value = Some(low);
            state.next = low;
            state.upper = low + increment - 1;
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
