use crate::{Error, Result};

/// Per-family SQL syntax for sequences, row-locking hints, and DDL.
///
/// One implementation per supported database family; the default methods
/// cover the common ANSI-ish behavior so most implementations only override
/// what their family actually does differently.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the family has native sequence objects at all.
    fn supports_sequences(&self) -> bool;

    /// Whether sequences may be created with an arbitrary `increment by`
    /// step. Families answering `false` force pooled optimizers to be
    /// downgraded when backed by a sequence.
    fn supports_pooled_sequences(&self) -> bool {
        self.supports_sequences()
    }

    /// The parameterless query fetching the next value of `name`.
    fn sequence_next_value_sql(&self, name: &str) -> Result<String>;

    fn create_sequence_sql(&self, name: &str, initial: i64, step: i64) -> Result<String>;

    fn drop_sequence_sql(&self, name: &str) -> Result<String>;

    /// Appends this family's row-locking hint to a SELECT.
    fn lock_hint(&self, select: &str) -> String {
        format!("{select} for update")
    }

    fn create_table_prefix(&self) -> &'static str {
        "create table"
    }

    fn drop_table_sql(&self, name: &str) -> String {
        format!("drop table if exists {name}")
    }

    /// Column type used for counter values.
    fn integer_type(&self) -> &'static str {
        "bigint"
    }

    /// Column type used for segment keys.
    fn varchar_type(&self, length: u32) -> String {
        format!("varchar({length})")
    }
}

/// Shared failure for families without native sequences.
pub(crate) fn no_sequence_support(dialect: &dyn Dialect) -> Error {
    Error::configuration(format!(
        "dialect `{}` does not support sequences",
        dialect.name()
    ))
}
