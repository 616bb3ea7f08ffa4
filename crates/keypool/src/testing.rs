//! In-memory stand-in for the host database, shared by the unit tests.
//!
//! Dispatches on the statement shapes the structures actually emit: a
//! sequence fetch, a counter-row read, and the compare-and-swap update. Each
//! statement takes the state lock independently, so concurrent units of work
//! interleave the same way rows do under a real database's row-level
//! atomicity. Update failures can be injected to exercise the optimistic
//! retry loop.

use crate::{Connection, Database, Result, SqlError, SqlValue};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Row key used by structures without a segment column.
const PLAIN_ROW: &str = "";

#[derive(Debug)]
struct SequenceState {
    next: i64,
    step: i64,
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: HashMap<String, i64>,
    sequence: Option<SequenceState>,
    fail_next_updates: u32,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryDatabase {
    state: Mutex<MemoryState>,
    round_trips: AtomicU64,
}

impl MemoryDatabase {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A database holding one sequence seeded the way `create sequence ...
    /// start with {initial} increment by {step}` would.
    pub(crate) fn with_sequence(initial: i64, step: i64) -> Self {
        let db = Self::new();
        db.state.lock().sequence = Some(SequenceState {
            next: initial,
            step,
        });
        db
    }

    /// A database whose plain counter row is already seeded.
    pub(crate) fn with_row(value: i64) -> Self {
        let db = Self::new();
        db.seed_segment(PLAIN_ROW, value);
        db
    }

    pub(crate) fn seed_segment(&self, segment: &str, value: i64) {
        self.state.lock().rows.insert(segment.to_owned(), value);
    }

    /// Forces the next `count` updates to report zero affected rows, as if a
    /// concurrent caller kept winning the race.
    pub(crate) fn fail_updates(&self, count: u32) {
        self.state.lock().fail_next_updates = count;
    }

    pub(crate) fn round_trips(&self) -> u64 {
        self.round_trips.load(Ordering::Relaxed)
    }

    pub(crate) fn stored_row(&self) -> Option<i64> {
        self.stored_segment(PLAIN_ROW)
    }

    pub(crate) fn stored_segment(&self, segment: &str) -> Option<i64> {
        self.state.lock().rows.get(segment).copied()
    }
}

impl Database for MemoryDatabase {
    fn isolated_work(
        &self,
        work: &mut dyn FnMut(&mut dyn Connection) -> Result<i64>,
    ) -> Result<i64> {
        self.round_trips.fetch_add(1, Ordering::Relaxed);
        let mut conn = MemoryConnection { db: self };
        work(&mut conn)
    }
}

struct MemoryConnection<'a> {
    db: &'a MemoryDatabase,
}

impl Connection for MemoryConnection<'_> {
    fn query_value(
        &mut self,
        sql: &str,
        params: &[SqlValue<'_>],
    ) -> core::result::Result<Option<i64>, SqlError> {
        let mut state = self.db.state.lock();
        if sql.contains("nextval") {
            let sequence = state
                .sequence
                .as_mut()
                .ok_or_else(|| SqlError::new("sequence does not exist"))?;
            let value = sequence.next;
            sequence.next += sequence.step;
            return Ok(Some(value));
        }
        let key = match params.first() {
            Some(SqlValue::Str(segment)) => *segment,
            _ => PLAIN_ROW,
        };
        Ok(state.rows.get(key).copied())
    }

    fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue<'_>],
    ) -> core::result::Result<u64, SqlError> {
        let mut state = self.db.state.lock();
        if sql.starts_with("update") {
            if state.fail_next_updates > 0 {
                state.fail_next_updates -= 1;
                return Ok(0);
            }
            let (next, expected) = match params {
                [SqlValue::I64(next), SqlValue::I64(expected), ..] => (*next, *expected),
                _ => return Err(SqlError::new("malformed update bindings")),
            };
            let key = match params.get(2) {
                Some(SqlValue::Str(segment)) => *segment,
                _ => PLAIN_ROW,
            };
            return match state.rows.get_mut(key) {
                Some(current) if *current == expected => {
                    *current = next;
                    Ok(1)
                }
                _ => Ok(0),
            };
        }
        if sql.starts_with("insert") {
            match params {
                [SqlValue::Str(segment), SqlValue::I64(value)] => {
                    state.rows.insert((*segment).to_owned(), *value);
                }
                [SqlValue::I64(value)] => {
                    state.rows.insert(PLAIN_ROW.to_owned(), *value);
                }
                _ => return Err(SqlError::new("malformed insert bindings")),
            }
            return Ok(1);
        }
        Err(SqlError::new(format!("unsupported statement: {sql}")))
    }
}
