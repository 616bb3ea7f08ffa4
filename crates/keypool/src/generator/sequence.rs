use crate::{
    Database, DatabaseStructure, Dialect, IdType, IdValue, Optimizer, OptimizerKind, Params,
    Result, SequenceStructure, TableStructure,
    config::{
        DEFAULT_INCREMENT_SIZE, DEFAULT_INITIAL_VALUE, DEFAULT_SEQUENCE_NAME,
        DEFAULT_VALUE_COLUMN, keys,
    },
    generator::{determine_name, resolve_optimizer},
};
use parking_lot::Mutex;
use tracing::{instrument, warn};

/// The sequence-style generator: prefers the database's native sequence
/// object and falls back to an emulated one where the dialect has none (or
/// where `force_table_use` says so).
///
/// Wires exactly one [`DatabaseStructure`] to exactly one [`Optimizer`];
/// immutable after [`configure`](Self::configure).
pub struct SequenceGenerator {
    structure: Box<dyn DatabaseStructure>,
    optimizer: Box<dyn Optimizer>,
    optimizer_kind: OptimizerKind,
    id_type: IdType,
    table_backed: bool,
    /// Serializes in-process generate calls when the structure is a table:
    /// racing the optimistic update loop against ourselves would only burn
    /// round trips. Held across the full round trip.
    serializer: Mutex<()>,
}

impl SequenceGenerator {
    pub fn configure(dialect: &dyn Dialect, params: &Params, id_type: IdType) -> Result<Self> {
        let name = determine_name(params, keys::SEQUENCE_NAME, DEFAULT_SEQUENCE_NAME)?;
        let initial_value = params.get_i64(keys::INITIAL_VALUE, DEFAULT_INITIAL_VALUE)?;
        let mut increment_size = params.get_u32(keys::INCREMENT_SIZE, DEFAULT_INCREMENT_SIZE)?;
        let force_table_use = params.get_bool(keys::FORCE_TABLE_USE, false)?;
        let table_backed = force_table_use || !dialect.supports_sequences();

        let mut optimizer_kind = resolve_optimizer(params, &mut increment_size)?;
        if matches!(
            optimizer_kind,
            OptimizerKind::Pooled | OptimizerKind::PooledLo
        ) && !table_backed
            && !dialect.supports_pooled_sequences()
        {
            warn!(
                dialect = dialect.name(),
                optimizer = optimizer_kind.external_name(),
                "dialect cannot step sequences by an arbitrary increment; downgrading to hilo"
            );
            optimizer_kind = OptimizerKind::HiLo;
        }
        let optimizer = optimizer_kind.build(increment_size);

        let mut structure: Box<dyn DatabaseStructure> = if table_backed {
            let value_column = params.get_str(keys::VALUE_COLUMN_NAME, DEFAULT_VALUE_COLUMN);
            Box::new(TableStructure::new(
                dialect,
                name,
                value_column,
                None,
                initial_value,
                increment_size,
                false,
            ))
        } else {
            Box::new(SequenceStructure::new(
                dialect,
                name,
                initial_value,
                increment_size,
            )?)
        };
        structure.prepare(optimizer.as_ref());

        Ok(Self {
            structure,
            optimizer,
            optimizer_kind,
            id_type,
            table_backed,
            serializer: Mutex::new(()),
        })
    }

    /// Returns the next identifier value, coerced to the configured
    /// identifier type.
    #[instrument(level = "trace", skip_all)]
    pub fn generate(&self, db: &dyn Database) -> Result<IdValue> {
        let _serialized = self.table_backed.then(|| self.serializer.lock());
        let mut callback = self.structure.build_callback(db);
        let raw = self.optimizer.generate(callback.as_mut())?;
        self.id_type.coerce(raw)
    }

    pub fn structure(&self) -> &dyn DatabaseStructure {
        self.structure.as_ref()
    }

    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    pub fn optimizer_kind(&self) -> OptimizerKind {
        self.optimizer_kind
    }

    /// Whether configuration fell back to (or forced) a table-backed
    /// structure.
    pub fn is_table_backed(&self) -> bool {
        self.table_backed
    }

    pub fn sql_create_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>> {
        self.structure.sql_create_strings(dialect)
    }

    pub fn sql_drop_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>> {
        self.structure.sql_drop_strings(dialect)
    }
}
