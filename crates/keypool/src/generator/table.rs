use crate::{
    Database, DatabaseStructure, Dialect, Error, IdType, IdValue, Optimizer, OptimizerKind,
    Params, Result, SegmentSpec, TableStructure,
    config::{
        DEFAULT_INCREMENT_SIZE, DEFAULT_INITIAL_VALUE, DEFAULT_SEGMENT_COLUMN,
        DEFAULT_SEGMENT_VALUE, DEFAULT_SEGMENT_VALUE_LENGTH, DEFAULT_TABLE_NAME,
        DEFAULT_VALUE_COLUMN, keys,
    },
    generator::{determine_name, resolve_optimizer},
};
use parking_lot::Mutex;
use tracing::{debug, instrument};

/// The table-style generator: one physical table multiplexes any number of
/// logical counters, one row per segment key.
///
/// Unlike the plain table fallback of [`SequenceGenerator`], this generator
/// owns its segment row and seeds it at the configured initial value on
/// first use.
///
/// [`SequenceGenerator`]: crate::SequenceGenerator
pub struct TableGenerator {
    structure: TableStructure,
    optimizer: Box<dyn Optimizer>,
    optimizer_kind: OptimizerKind,
    id_type: IdType,
    /// All in-process generate calls run under this lock, held across the
    /// full round trip; cross-process contention is left to the
    /// compare-and-swap.
    serializer: Mutex<()>,
}

impl TableGenerator {
    pub fn configure(dialect: &dyn Dialect, params: &Params, id_type: IdType) -> Result<Self> {
        let name = determine_name(params, keys::TABLE_NAME, DEFAULT_TABLE_NAME)?;
        let value_column = params.get_str(keys::VALUE_COLUMN_NAME, DEFAULT_VALUE_COLUMN);
        let segment_column = params.get_str(keys::SEGMENT_COLUMN_NAME, DEFAULT_SEGMENT_COLUMN);
        let segment_length =
            params.get_u32(keys::SEGMENT_VALUE_LENGTH, DEFAULT_SEGMENT_VALUE_LENGTH)?;
        let segment_value = determine_segment_value(params, &segment_column)?;
        let initial_value = params.get_i64(keys::INITIAL_VALUE, DEFAULT_INITIAL_VALUE)?;
        let mut increment_size = params.get_u32(keys::INCREMENT_SIZE, DEFAULT_INCREMENT_SIZE)?;

        let optimizer_kind = resolve_optimizer(params, &mut increment_size)?;
        let optimizer = optimizer_kind.build(increment_size);

        let mut structure = TableStructure::new(
            dialect,
            name,
            value_column,
            Some(SegmentSpec {
                column: segment_column,
                value: segment_value,
                length: segment_length,
            }),
            initial_value,
            increment_size,
            true,
        );
        structure.prepare(optimizer.as_ref());

        Ok(Self {
            structure,
            optimizer,
            optimizer_kind,
            id_type,
            serializer: Mutex::new(()),
        })
    }

    /// Returns the next identifier value, coerced to the configured
    /// identifier type.
    #[instrument(level = "trace", skip_all)]
    pub fn generate(&self, db: &dyn Database) -> Result<IdValue> {
        let _serialized = self.serializer.lock();
        let mut callback = self.structure.build_callback(db);
        let raw = self.optimizer.generate(callback.as_mut())?;
        self.id_type.coerce(raw)
    }

    pub fn structure(&self) -> &TableStructure {
        &self.structure
    }

    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    pub fn optimizer_kind(&self) -> OptimizerKind {
        self.optimizer_kind
    }

    /// The segment key identifying this generator's row.
    pub fn segment_value(&self) -> &str {
        // configure always installs a segment
        self.structure
            .segment()
            .map(|segment| segment.value.as_str())
            .unwrap_or_default()
    }

    /// Successful round trips so far. Diagnostic only.
    pub fn times_accessed(&self) -> u64 {
        self.structure.times_accessed()
    }

    pub fn sql_create_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>> {
        self.structure.sql_create_strings(dialect)
    }

    pub fn sql_drop_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>> {
        self.structure.sql_drop_strings(dialect)
    }
}

/// The explicit segment value, or the configured default: the entity's table
/// name when `prefer_entity_table_as_segment_value` is set, else the shared
/// default row key.
fn determine_segment_value(params: &Params, segment_column: &str) -> Result<String> {
    match params.get(keys::SEGMENT_VALUE) {
        Some(value) if !value.trim().is_empty() => return Ok(value.to_owned()),
        _ => {}
    }
    let prefer_entity_table = params.get_bool(keys::PREFER_SEGMENT_PER_ENTITY, false)?;
    let default = if prefer_entity_table {
        params
            .get(keys::TARGET_TABLE)
            .ok_or_else(|| {
                Error::configuration(format!(
                    "`{}` is set but `{}` was not supplied",
                    keys::PREFER_SEGMENT_PER_ENTITY,
                    keys::TARGET_TABLE
                ))
            })?
            .to_owned()
    } else {
        DEFAULT_SEGMENT_VALUE.to_owned()
    };
    debug!(
        segment_column,
        segment_value = default.as_str(),
        "no explicit segment value; using default"
    );
    Ok(default)
}
