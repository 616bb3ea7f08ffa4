use crate::{Dialect, Result, dialect::interface::no_sequence_support};

/// MySQL family: no native sequences; generators fall back to a table-backed
/// structure.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn sequence_next_value_sql(&self, _name: &str) -> Result<String> {
        Err(no_sequence_support(self))
    }

    fn create_sequence_sql(&self, _name: &str, _initial: i64, _step: i64) -> Result<String> {
        Err(no_sequence_support(self))
    }

    fn drop_sequence_sql(&self, _name: &str) -> Result<String> {
        Err(no_sequence_support(self))
    }
}
