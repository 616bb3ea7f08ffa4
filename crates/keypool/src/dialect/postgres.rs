use crate::{Dialect, Result};

/// PostgreSQL family: native sequences with arbitrary step sizes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn supports_sequences(&self) -> bool {
        true
    }

    fn sequence_next_value_sql(&self, name: &str) -> Result<String> {
        Ok(format!("select nextval('{name}')"))
    }

    fn create_sequence_sql(&self, name: &str, initial: i64, step: i64) -> Result<String> {
        Ok(format!(
            "create sequence {name} start with {initial} increment by {step}"
        ))
    }

    fn drop_sequence_sql(&self, name: &str) -> Result<String> {
        Ok(format!("drop sequence if exists {name}"))
    }
}
