use crate::{AccessCallback, Optimizer, Result};
use parking_lot::Mutex;

/// No pooling: every call performs one round trip and the raw value is the
/// identifier. Always correct, least efficient under high insert volume.
pub struct NoopOptimizer {
    increment_size: u32,
    last_source_value: Mutex<Option<i64>>,
}

impl NoopOptimizer {
    pub fn new(increment_size: u32) -> Self {
        Self {
            increment_size,
            last_source_value: Mutex::new(None),
        }
    }
}

impl Optimizer for NoopOptimizer {
    fn generate(&self, callback: &mut dyn AccessCallback) -> Result<i64> {
        let value = callback.next_raw_value()?;
        *self.last_source_value.lock() = Some(value);
        Ok(value)
    }

    fn increment_size(&self) -> u32 {
        self.increment_size
    }

    fn applies_increment_to_source(&self) -> bool {
        false
    }

    fn last_source_value(&self) -> Option<i64> {
        *self.last_source_value.lock()
    }
}
