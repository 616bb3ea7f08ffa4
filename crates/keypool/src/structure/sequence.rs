use crate::{
    AccessCallback, Database, DatabaseStructure, Dialect, Error, Optimizer, QualifiedName, Result,
    SqlError,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// A counter backed by the database's own sequence object.
///
/// One query equals one guaranteed-unique value; the database's sequence
/// implementation provides the atomicity, so no retry logic exists here.
pub struct SequenceStructure {
    name: QualifiedName,
    physical_name: String,
    initial_value: i64,
    increment_size: u32,
    /// Step the physical sequence advances by; fixed by [`prepare`].
    ///
    /// [`prepare`]: DatabaseStructure::prepare
    source_step: i64,
    next_value_sql: String,
    times_accessed: AtomicU64,
}

impl SequenceStructure {
    pub fn new(
        dialect: &dyn Dialect,
        name: QualifiedName,
        initial_value: i64,
        increment_size: u32,
    ) -> Result<Self> {
        let physical_name = name.render();
        let next_value_sql = dialect.sequence_next_value_sql(&physical_name)?;
        Ok(Self {
            name,
            physical_name,
            initial_value,
            increment_size,
            source_step: 1,
            next_value_sql,
            times_accessed: AtomicU64::new(0),
        })
    }
}

impl DatabaseStructure for SequenceStructure {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn initial_value(&self) -> i64 {
        self.initial_value
    }

    fn increment_size(&self) -> u32 {
        self.increment_size
    }

    fn times_accessed(&self) -> u64 {
        self.times_accessed.load(Ordering::Relaxed)
    }

    fn prepare(&mut self, optimizer: &dyn Optimizer) {
        self.source_step = if optimizer.applies_increment_to_source() {
            i64::from(self.increment_size)
        } else {
            1
        };
    }

    fn build_callback<'a>(&'a self, db: &'a dyn Database) -> Box<dyn AccessCallback + 'a> {
        Box::new(SequenceCallback { structure: self, db })
    }

    fn sql_create_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>> {
        Ok(vec![dialect.create_sequence_sql(
            &self.physical_name,
            self.initial_value,
            self.source_step,
        )?])
    }

    fn sql_drop_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>> {
        Ok(vec![dialect.drop_sequence_sql(&self.physical_name)?])
    }
}

struct SequenceCallback<'a> {
    structure: &'a SequenceStructure,
    db: &'a dyn Database,
}

impl AccessCallback for SequenceCallback<'_> {
    fn next_raw_value(&mut self) -> Result<i64> {
        let sql = self.structure.next_value_sql.as_str();
        let value = self.db.isolated_work(&mut |conn| {
            debug!(sql, "fetching next sequence value");
            match conn.query_value(sql, &[]) {
                Ok(Some(value)) => Ok(value),
                Ok(None) => Err(Error::database(
                    sql,
                    SqlError::new("sequence query returned no row"),
                )),
                Err(source) => Err(Error::database(sql, source)),
            }
        })?;
        self.structure.times_accessed.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }
}
