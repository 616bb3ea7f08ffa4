use crate::{Error, Result};
use std::collections::HashMap;

/// Recognized configuration parameter keys.
pub mod keys {
    /// Physical sequence name used by [`SequenceGenerator`].
    ///
    /// [`SequenceGenerator`]: crate::SequenceGenerator
    pub const SEQUENCE_NAME: &str = "sequence_name";
    /// Physical table name used by [`TableGenerator`].
    ///
    /// [`TableGenerator`]: crate::TableGenerator
    pub const TABLE_NAME: &str = "table_name";
    /// First raw value the structure is seeded with.
    pub const INITIAL_VALUE: &str = "initial_value";
    /// Block size reserved per round trip when pooling applies.
    pub const INCREMENT_SIZE: &str = "increment_size";
    /// Optimizer strategy selected by external name.
    pub const OPTIMIZER: &str = "optimizer";
    /// Forces a table-backed structure even when the dialect has native
    /// sequences.
    pub const FORCE_TABLE_USE: &str = "force_table_use";
    /// Counter column of a table-backed structure.
    pub const VALUE_COLUMN_NAME: &str = "value_column_name";
    /// Column holding the segment key when one table multiplexes several
    /// counters.
    pub const SEGMENT_COLUMN_NAME: &str = "segment_column_name";
    /// Segment key identifying this generator's row.
    pub const SEGMENT_VALUE: &str = "segment_value";
    /// Declared length of the segment column, used only for DDL.
    pub const SEGMENT_VALUE_LENGTH: &str = "segment_value_length";
    /// When set, a segmented generator defaults its segment value to the
    /// entity's table name instead of [`DEFAULT_SEGMENT_VALUE`].
    ///
    /// [`DEFAULT_SEGMENT_VALUE`]: super::DEFAULT_SEGMENT_VALUE
    pub const PREFER_SEGMENT_PER_ENTITY: &str = "prefer_entity_table_as_segment_value";
    /// Flips the default pooled strategy to `pooled-lo`.
    pub const PREFER_POOLED_LO: &str = "prefer_pooled_lo";
    /// Table of the entity this generator serves; consulted only by
    /// [`PREFER_SEGMENT_PER_ENTITY`].
    pub const TARGET_TABLE: &str = "target_table";
    /// Default catalog qualifier applied to unqualified object names.
    pub const CATALOG: &str = "catalog";
    /// Default schema qualifier applied to unqualified object names.
    pub const SCHEMA: &str = "schema";
}

pub const DEFAULT_SEQUENCE_NAME: &str = "hibernate_sequence";
pub const DEFAULT_TABLE_NAME: &str = "hibernate_sequences";
pub const DEFAULT_VALUE_COLUMN: &str = "next_val";
pub const DEFAULT_SEGMENT_COLUMN: &str = "sequence_name";
pub const DEFAULT_SEGMENT_VALUE: &str = "default";
pub const DEFAULT_SEGMENT_VALUE_LENGTH: u32 = 255;
pub const DEFAULT_INITIAL_VALUE: i64 = 1;
pub const DEFAULT_INCREMENT_SIZE: u32 = 1;

/// String-keyed generator parameters, as handed down by the mapping layer.
///
/// All values arrive as text; the typed accessors raise
/// [`Error::Configuration`] on anything malformed.
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_owned()
    }

    pub fn get_i64(&self, key: &str, default: i64) -> Result<i64> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                Error::configuration(format!("parameter `{key}` is not an integer: `{raw}`"))
            }),
        }
    }

    pub fn get_u32(&self, key: &str, default: u32) -> Result<u32> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                Error::configuration(format!(
                    "parameter `{key}` is not a non-negative integer: `{raw}`"
                ))
            }),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None => Ok(default),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(raw) => Err(Error::configuration(format!(
                "parameter `{key}` is not a boolean: `{raw}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_apply_defaults() {
        let params = Params::new();
        assert_eq!(params.get_i64(keys::INITIAL_VALUE, 1).unwrap(), 1);
        assert_eq!(params.get_u32(keys::INCREMENT_SIZE, 1).unwrap(), 1);
        assert!(!params.get_bool(keys::FORCE_TABLE_USE, false).unwrap());
    }

    #[test]
    fn malformed_values_are_configuration_errors() {
        let params = Params::new()
            .with(keys::INCREMENT_SIZE, "five")
            .with(keys::FORCE_TABLE_USE, "yes");
        assert!(matches!(
            params.get_u32(keys::INCREMENT_SIZE, 1),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            params.get_bool(keys::FORCE_TABLE_USE, false),
            Err(Error::Configuration { .. })
        ));
    }
}
