use crate::{Result, SqlError};

/// A positional SQL statement parameter.
///
/// The two variants cover everything this crate binds: counter values and
/// segment keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlValue<'a> {
    I64(i64),
    Str(&'a str),
}

/// A live database connection, as seen by this crate.
///
/// Implemented by the host application over its actual driver. Only two
/// statement shapes are ever issued: a single-value query (sequence fetch or
/// counter-row read) and an update/insert returning an affected-row count.
pub trait Connection {
    /// Executes a query expected to return at most one row holding one
    /// integral column. `Ok(None)` means the query matched no row.
    fn query_value(
        &mut self,
        sql: &str,
        params: &[SqlValue<'_>],
    ) -> core::result::Result<Option<i64>, SqlError>;

    /// Executes a statement and returns the number of rows affected.
    fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue<'_>],
    ) -> core::result::Result<u64, SqlError>;
}

/// The execution context supplied by the surrounding session/transaction
/// manager.
///
/// Identifier round trips must commit immediately so that a reserved value
/// block survives a rollback of the caller's business transaction; a recycled
/// block would race with callers already holding adjacent values. Implementors
/// therefore run `work` on a dedicated connection in its own short-lived
/// transaction, never nested inside any ambient one.
pub trait Database: Send + Sync {
    /// Runs `work` as one independent unit of work, committed before this
    /// method returns.
    fn isolated_work(
        &self,
        work: &mut dyn FnMut(&mut dyn Connection) -> Result<i64>,
    ) -> Result<i64>;
}
