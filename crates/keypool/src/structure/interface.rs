use crate::{Database, Dialect, Optimizer, QualifiedName, Result};

/// One round trip against the backing store.
///
/// Built fresh for every generate call and discarded afterwards; never
/// retained across round trips.
pub trait AccessCallback {
    /// Performs the round trip and returns the new raw counter value.
    fn next_raw_value(&mut self) -> Result<i64>;
}

/// The physical representation of a counter: a native sequence object or a
/// single row in an ordinary table.
///
/// A structure is created once at generator configuration time and bound to
/// that generator for the process lifetime. The physical database object is
/// created by schema-export tooling, not by the structure itself; the
/// structure only emits the DDL text for it.
pub trait DatabaseStructure: Send + Sync {
    fn name(&self) -> &QualifiedName;

    fn initial_value(&self) -> i64;

    fn increment_size(&self) -> u32;

    /// Successful round trips so far. Diagnostic only.
    fn times_accessed(&self) -> u64;

    /// Records whether `optimizer` wants the increment size folded into the
    /// source values (the physical counter steps by N) or left at one.
    /// Called exactly once, before any callback is built.
    fn prepare(&mut self, optimizer: &dyn Optimizer);

    /// Builds the callback for one generate call against `db`.
    fn build_callback<'a>(&'a self, db: &'a dyn Database) -> Box<dyn AccessCallback + 'a>;

    /// DDL creating the physical object, in execution order.
    fn sql_create_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>>;

    /// DDL dropping everything `sql_create_strings` creates.
    fn sql_drop_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>>;
}
