use crate::{Dialect, Result};

/// Oracle family: native sequences, no `if exists` guards.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn supports_sequences(&self) -> bool {
        true
    }

    fn sequence_next_value_sql(&self, name: &str) -> Result<String> {
        Ok(format!("select {name}.nextval from dual"))
    }

    fn create_sequence_sql(&self, name: &str, initial: i64, step: i64) -> Result<String> {
        Ok(format!(
            "create sequence {name} start with {initial} increment by {step}"
        ))
    }

    fn drop_sequence_sql(&self, name: &str) -> Result<String> {
        Ok(format!("drop sequence {name}"))
    }

    fn drop_table_sql(&self, name: &str) -> String {
        format!("drop table {name}")
    }

    fn integer_type(&self) -> &'static str {
        "number(19,0)"
    }

    fn varchar_type(&self, length: u32) -> String {
        format!("varchar2({length})")
    }
}
