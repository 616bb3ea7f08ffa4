use crate::{
    AccessCallback, Error, HiLoOptimizer, NoopOptimizer, PooledLoOptimizer, PooledOptimizer,
    Result,
};

/// The in-process value-pooling policy of one generator.
///
/// Given an [`AccessCallback`], an optimizer decides whether to hit the
/// database or hand out the next value from an already-reserved pool. One
/// instance serves all concurrent callers within the process; implementations
/// guard their pool state with an internal mutex.
///
/// Two invariants bind every strategy:
///
/// - no two calls to [`generate`](Self::generate) ever return the same value,
///   because pooled values are drawn from a block reserved exclusively by a
///   single prior round trip;
/// - a failed round trip leaves the pool state untouched, so the next call
///   retries from the same pre-failure state with no partial reservation.
pub trait Optimizer: Send + Sync {
    /// Returns the next identifier value, performing a round trip through
    /// `callback` only when the current pool is exhausted.
    fn generate(&self, callback: &mut dyn AccessCallback) -> Result<i64>;

    /// The configured block size.
    fn increment_size(&self) -> u32;

    /// Whether the backing structure should step its source values by the
    /// increment size (`true`) or by one (`false`).
    fn applies_increment_to_source(&self) -> bool;

    /// The most recent raw value fetched from the backing store, if any.
    /// Diagnostic only.
    fn last_source_value(&self) -> Option<i64>;
}

/// The selectable optimizer strategies, keyed by their external names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptimizerKind {
    /// One round trip per value.
    None,
    /// Source steps by one; each fetch unlocks `increment` computed values.
    HiLo,
    /// Source steps by the increment; each fetch yields a contiguous block.
    Pooled,
    /// Pooled with lazy upper-bound bookkeeping.
    PooledLo,
}

impl OptimizerKind {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "none" => Ok(Self::None),
            "hilo" => Ok(Self::HiLo),
            "pooled" => Ok(Self::Pooled),
            "pooled-lo" => Ok(Self::PooledLo),
            other => Err(Error::configuration(format!(
                "unknown optimizer `{other}` (expected none, hilo, pooled, or pooled-lo)"
            ))),
        }
    }

    pub fn external_name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::HiLo => "hilo",
            Self::Pooled => "pooled",
            Self::PooledLo => "pooled-lo",
        }
    }

    /// The default strategy for a given increment size: `none` when no
    /// pooling can apply, otherwise one of the pooled strategies.
    pub fn default_for(increment_size: u32, prefer_pooled_lo: bool) -> Self {
        if increment_size <= 1 {
            Self::None
        } else if prefer_pooled_lo {
            Self::PooledLo
        } else {
            Self::Pooled
        }
    }

    pub fn build(self, increment_size: u32) -> Box<dyn Optimizer> {
        match self {
            Self::None => Box::new(NoopOptimizer::new(increment_size)),
            Self::HiLo => Box::new(HiLoOptimizer::new(increment_size)),
            Self::Pooled => Box::new(PooledOptimizer::new(increment_size)),
            Self::PooledLo => Box::new(PooledLoOptimizer::new(increment_size)),
        }
    }
}
