use crate::{
    AccessCallback, Database, DatabaseStructure, Dialect, Error, Optimizer, QualifiedName, Result,
    SqlValue,
};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Upper bound on optimistic update attempts per round trip. Lost updates
/// are expected and cheap, but an unbounded loop would livelock if the
/// update raced pathologically; exceeding the cap surfaces as
/// [`Error::RetriesExhausted`].
pub const MAX_CAS_ATTEMPTS: u32 = 100;

/// Segment key multiplexing several logical counters in one physical table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSpec {
    /// Column holding the segment key; acts as the table's primary key.
    pub column: String,
    /// The key identifying this counter's row.
    pub value: String,
    /// Declared column length, used only for DDL.
    pub length: u32,
}

/// A counter emulated with a single table row and an optimistic update loop.
///
/// Each round trip reads the row, computes the stepped value, and issues an
/// update conditioned on the column still holding what was read (a
/// compare-and-swap via `where value = ?`). Zero rows updated means a
/// concurrent caller won the race; the loop re-reads and tries again, making
/// progress whenever any writer succeeds. The whole loop runs as one
/// independent unit of work so contention resolves immediately instead of
/// being held for the duration of the caller's transaction.
pub struct TableStructure {
    name: QualifiedName,
    physical_name: String,
    value_column: String,
    segment: Option<SegmentSpec>,
    initial_value: i64,
    increment_size: u32,
    source_step: i64,
    /// When set, a missing counter row is seeded at the initial value instead
    /// of failing; used by segmented generators that own their rows.
    insert_missing_row: bool,
    select_sql: String,
    update_sql: String,
    insert_sql: String,
    times_accessed: AtomicU64,
}

impl TableStructure {
    pub fn new(
        dialect: &dyn Dialect,
        name: QualifiedName,
        value_column: impl Into<String>,
        segment: Option<SegmentSpec>,
        initial_value: i64,
        increment_size: u32,
        insert_missing_row: bool,
    ) -> Self {
        let physical_name = name.render();
        let value_column = value_column.into();
        let select_sql = build_select(dialect, &physical_name, &value_column, segment.as_ref());
        let update_sql = build_update(&physical_name, &value_column, segment.as_ref());
        let insert_sql = build_insert(&physical_name, &value_column, segment.as_ref());
        Self {
            name,
            physical_name,
            value_column,
            segment,
            initial_value,
            increment_size,
            source_step: 1,
            insert_missing_row,
            select_sql,
            update_sql,
            insert_sql,
            times_accessed: AtomicU64::new(0),
        }
    }

    pub fn segment(&self) -> Option<&SegmentSpec> {
        self.segment.as_ref()
    }

    fn missing_row_error(&self) -> Error {
        Error::MissingRow {
            table: self.physical_name.clone(),
            segment: self.segment.as_ref().map(|s| s.value.clone()),
        }
    }
}

fn build_select(
    dialect: &dyn Dialect,
    table: &str,
    value_column: &str,
    segment: Option<&SegmentSpec>,
) -> String {
    let alias = "tbl";
    let select = match segment {
        Some(segment) => format!(
            "select {alias}.{value_column} from {table} {alias} where {alias}.{col}=?",
            col = segment.column
        ),
        None => format!("select {alias}.{value_column} from {table} {alias}"),
    };
    dialect.lock_hint(&select)
}

fn build_update(table: &str, value_column: &str, segment: Option<&SegmentSpec>) -> String {
    match segment {
        Some(segment) => format!(
            "update {table} set {value_column}=? where {value_column}=? and {col}=?",
            col = segment.column
        ),
        None => format!("update {table} set {value_column}=? where {value_column}=?"),
    }
}

fn build_insert(table: &str, value_column: &str, segment: Option<&SegmentSpec>) -> String {
    match segment {
        Some(segment) => format!(
            "insert into {table} ({col}, {value_column}) values (?, ?)",
            col = segment.column
        ),
        None => format!("insert into {table} ({value_column}) values (?)"),
    }
}

impl DatabaseStructure for TableStructure {
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
        Box::new(TableCallback { structure: self, db })
    }

    fn sql_create_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>> {
        let table = &self.physical_name;
        let value_column = &self.value_column;
        let integer = dialect.integer_type();
        let prefix = dialect.create_table_prefix();
        match &self.segment {
            Some(segment) => Ok(vec![format!(
                "{prefix} {table} ( {col} {key_type} not null, {value_column} {integer}, primary key ( {col} ) )",
                col = segment.column,
                key_type = dialect.varchar_type(segment.length),
            )]),
            // The plain structure's single row is part of the schema itself.
            None => Ok(vec![
                format!("{prefix} {table} ( {value_column} {integer} not null )"),
                format!(
                    "insert into {table} ({value_column}) values ({})",
                    self.initial_value
                ),
            ]),
        }
    }

    fn sql_drop_strings(&self, dialect: &dyn Dialect) -> Result<Vec<String>> {
        Ok(vec![dialect.drop_table_sql(&self.physical_name)])
    }
}

struct TableCallback<'a> {
    structure: &'a TableStructure,
    db: &'a dyn Database,
}

impl AccessCallback for TableCallback<'_> {
    fn next_raw_value(&mut self) -> Result<i64> {
        let s = self.structure;
        let segment_value = s.segment.as_ref().map(|seg| seg.value.as_str());
        let select_params: Vec<SqlValue<'_>> =
            segment_value.map(SqlValue::Str).into_iter().collect();

        let value = self.db.isolated_work(&mut |conn| {
            for attempt in 0..MAX_CAS_ATTEMPTS {
                debug!(sql = s.select_sql.as_str(), "reading counter row");
                let current = conn
                    .query_value(&s.select_sql, &select_params)
                    .map_err(|source| Error::database(&s.select_sql, source))?;

                let current = match current {
                    Some(value) => value,
                    None if s.insert_missing_row => {
                        debug!(sql = s.insert_sql.as_str(), "seeding counter row");
                        let mut params: Vec<SqlValue<'_>> =
                            segment_value.map(SqlValue::Str).into_iter().collect();
                        params.push(SqlValue::I64(s.initial_value));
                        conn.execute(&s.insert_sql, &params)
                            .map_err(|source| Error::database(&s.insert_sql, source))?;
                        s.initial_value
                    }
                    None => return Err(s.missing_row_error()),
                };

                let next = current + s.source_step;
                let mut params = vec![SqlValue::I64(next), SqlValue::I64(current)];
                if let Some(segment) = segment_value {
                    params.push(SqlValue::Str(segment));
                }
                debug!(sql = s.update_sql.as_str(), "advancing counter row");
                let rows = conn
                    .execute(&s.update_sql, &params)
                    .map_err(|source| Error::database(&s.update_sql, source))?;
                if rows == 0 {
                    trace!(attempt, "lost optimistic counter update, retrying");
                    continue;
                }
                return Ok(current);
            }
            Err(Error::RetriesExhausted {
                table: s.physical_name.clone(),
                attempts: MAX_CAS_ATTEMPTS,
            })
        })?;
        s.times_accessed.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }
}
