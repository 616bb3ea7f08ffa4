use crate::{AccessCallback, Optimizer, Result};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct HiLoState {
    last_source_value: Option<i64>,
    /// Next value to hand out; valid only while `<= upper`.
    next: i64,
    /// Inclusive upper bound of the current block.
    upper: i64,
}

/// Hi-lo pooling: the source steps by one, and each fetched "hi" value `h`
/// unlocks the block `[h * increment, h * increment + increment)`.
///
/// The mapping from raw value to identifier is strategy-specific, so the
/// physical counter must never be shared with a writer that is not hi-lo
/// aware.
pub struct HiLoOptimizer {
    increment_size: u32,
    state: Mutex<HiLoState>,
}

impl HiLoOptimizer {
    pub fn new(increment_size: u32) -> Self {
        Self {
            increment_size,
            state: Mutex::new(HiLoState::default()),
        }
    }
}

impl Optimizer for HiLoOptimizer {
    fn generate(&self, callback: &mut dyn AccessCallback) -> Result<i64> {
        let increment = i64::from(self.increment_size);
        let mut state = self.state.lock();
        if state.last_source_value.is_none() || state.next > state.upper {
            let hi = callback.next_raw_value()?;
            state.last_source_value = Some(hi);
            state.next = hi * increment;
            state.upper = hi * increment + increment - 1;
        }
        let value = state.next;
        state.next += 1;
        Ok(value)
    }

    fn increment_size(&self) -> u32 {
        self.increment_size
    }

    fn applies_increment_to_source(&self) -> bool {
        false
    }

    fn last_source_value(&self) -> Option<i64> {
        self.state.lock().last_source_value
    }
}
