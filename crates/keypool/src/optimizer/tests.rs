use crate::{
    AccessCallback, Error, HiLoOptimizer, NoopOptimizer, Optimizer, OptimizerKind,
    PooledLoOptimizer, PooledOptimizer, Result, SqlError,
};

/// Plays the role of a backing structure: hands out source values `start`,
/// `start + step`, `start + 2 * step`, ... and counts round trips.
struct CountingCallback {
    next: i64,
    step: i64,
    calls: u32,
}

impl CountingCallback {
    fn new(start: i64, step: i64) -> Self {
        Self {
            next: start,
            step,
            calls: 0,
        }
    }
}

impl AccessCallback for CountingCallback {
    fn next_raw_value(&mut self) -> Result<i64> {
        let value = self.next;
        self.next += self.step;
        self.calls += 1;
        Ok(value)
    }
}

/// Fails the first `failures` round trips, then behaves like
/// [`CountingCallback`].
struct FlakyCallback {
    inner: CountingCallback,
    failures: u32,
}

impl AccessCallback for FlakyCallback {
    fn next_raw_value(&mut self) -> Result<i64> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(Error::database(
                "select nextval('app_seq')",
                SqlError::new("connection reset"),
            ));
        }
        self.inner.next_raw_value()
    }
}

fn run_block_strategy(optimizer: &dyn Optimizer, expected: &[i64], expected_calls: u32) {
    let step = if optimizer.applies_increment_to_source() {
        i64::from(optimizer.increment_size())
    } else {
        1
    };
    let mut callback = CountingCallback::new(1, step);
    let produced: Vec<i64> = (0..expected.len())
        .map(|_| optimizer.generate(&mut callback).unwrap())
        .collect();
    assert_eq!(produced, expected);
    assert_eq!(callback.calls, expected_calls);
}

#[test]
fn noop_performs_one_round_trip_per_value() {
    let optimizer = NoopOptimizer::new(1);
    run_block_strategy(&optimizer, &[1, 2, 3, 4], 4);
    assert_eq!(optimizer.last_source_value(), Some(4));
}

#[test]
fn hilo_unlocks_increment_values_per_fetch() {
    // Source values 1, 2, 3 map to blocks [5,9], [10,14], [15,19].
    let optimizer = HiLoOptimizer::new(5);
    run_block_strategy(
        &optimizer,
        &[5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
        3,
    );
    assert_eq!(optimizer.last_source_value(), Some(3));
}

#[test]
fn pooled_hands_out_contiguous_blocks() {
    // Source steps by 5: fetches 1, 6 yield blocks [1,5], [6,10].
    let optimizer = PooledOptimizer::new(5);
    run_block_strategy(&optimizer, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 2);
    assert_eq!(optimizer.last_source_value(), Some(6));
}

#[test]
fn pooled_lo_matches_pooled_blocks() {
    let optimizer = PooledLoOptimizer::new(5);
    run_block_strategy(&optimizer, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 2);
    assert_eq!(optimizer.last_source_value(), Some(6));
}

#[test]
fn exhaustion_is_the_only_trigger_for_a_round_trip() {
    let optimizer = PooledOptimizer::new(5);
    let mut callback = CountingCallback::new(1, 5);
    for _ in 0..5 {
        optimizer.generate(&mut callback).unwrap();
    }
    assert_eq!(callback.calls, 1);
    optimizer.generate(&mut callback).unwrap();
    assert_eq!(callback.calls, 2);
}

#[test]
fn failed_round_trip_leaves_pool_state_untouched() {
    for kind in [
        OptimizerKind::None,
        OptimizerKind::HiLo,
        OptimizerKind::Pooled,
        OptimizerKind::PooledLo,
    ] {
        let optimizer = kind.build(5);
        let step = if optimizer.applies_increment_to_source() {
            5
        } else {
            1
        };
        let mut callback = FlakyCallback {
            inner: CountingCallback::new(1, step),
            failures: 2,
        };

        assert!(matches!(
            optimizer.generate(&mut callback),
            Err(Error::Database { .. })
        ));
        assert_eq!(optimizer.last_source_value(), None);
        assert!(matches!(
            optimizer.generate(&mut callback),
            Err(Error::Database { .. })
        ));

        // The retry sees exactly the state a fresh optimizer would: the
        // first successful fetch starts the first block.
        let first = optimizer.generate(&mut callback).unwrap();
        let second = optimizer.generate(&mut callback).unwrap();
        assert_eq!(second, first + 1, "{:?}", kind);
    }
}

#[test]
fn kind_parses_external_names() {
    assert_eq!(OptimizerKind::from_name("none").unwrap(), OptimizerKind::None);
    assert_eq!(OptimizerKind::from_name("hilo").unwrap(), OptimizerKind::HiLo);
    assert_eq!(
        OptimizerKind::from_name("pooled").unwrap(),
        OptimizerKind::Pooled
    );
    assert_eq!(
        OptimizerKind::from_name("pooled-lo").unwrap(),
        OptimizerKind::PooledLo
    );
    assert!(matches!(
        OptimizerKind::from_name("hi-lo"),
        Err(Error::Configuration { .. })
    ));
}

#[test]
fn kind_defaults_follow_increment_size() {
    assert_eq!(OptimizerKind::default_for(1, false), OptimizerKind::None);
    assert_eq!(OptimizerKind::default_for(20, false), OptimizerKind::Pooled);
    assert_eq!(
        OptimizerKind::default_for(20, true),
        OptimizerKind::PooledLo
    );
}

#[test]
fn concurrent_callers_never_share_a_value() {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread::scope;

    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 250;

    // The shared callback stands in for the database counter; its own lock
    // mimics the row-level atomicity of the real store.
    let source = Arc::new(Mutex::new(CountingCallback::new(1, 10)));
    let optimizer = Arc::new(PooledOptimizer::new(10));
    let seen = Arc::new(Mutex::new(HashSet::with_capacity(THREADS * IDS_PER_THREAD)));

    struct SharedCallback(Arc<Mutex<CountingCallback>>);
    impl AccessCallback for SharedCallback {
        fn next_raw_value(&mut self) -> Result<i64> {
            self.0.lock().unwrap().next_raw_value()
        }
    }

    scope(|s| {
        for _ in 0..THREADS {
            let optimizer = Arc::clone(&optimizer);
            let source = Arc::clone(&source);
            let seen = Arc::clone(&seen);
            s.spawn(move || {
                let mut callback = SharedCallback(source);
                for _ in 0..IDS_PER_THREAD {
                    let id = optimizer.generate(&mut callback).unwrap();
                    assert!(seen.lock().unwrap().insert(id), "duplicate id {id}");
                }
            });
        }
    });

    assert_eq!(seen.lock().unwrap().len(), THREADS * IDS_PER_THREAD);
    assert_eq!(
        source.lock().unwrap().calls as usize,
        THREADS * IDS_PER_THREAD / 10
    );
}
