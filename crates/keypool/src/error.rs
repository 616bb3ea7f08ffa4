use crate::value::IdType;

pub type Result<T> = core::result::Result<T, Error>;

/// An opaque driver-level failure reported by a [`Connection`].
///
/// The host application supplies the actual database driver; this crate only
/// sees its failures as text. Structures wrap it together with the SQL that
/// was being executed (see [`Error::Database`]).
///
/// [`Connection`]: crate::Connection
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct SqlError {
    pub message: String,
}

impl SqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Unified error type for identifier generation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The generator configuration is unusable (malformed object name,
    /// unparseable parameter, unsupported dialect combination). Raised at
    /// setup; the generator is never constructed.
    #[error("invalid generator configuration: {reason}")]
    Configuration { reason: String },

    /// A table-backed structure found no counter row. This indicates a
    /// deployment error, not contention, and is never retried.
    #[error(
        "generator table `{table}` has no counter row{}; the seed row must be created by schema export",
        segment_clause(.segment)
    )]
    MissingRow {
        table: String,
        segment: Option<String>,
    },

    /// A round trip failed; carries the failing SQL and the driver error.
    #[error("error executing `{sql}`")]
    Database {
        sql: String,
        #[source]
        source: SqlError,
    },

    /// The optimistic update loop kept losing the race and gave up.
    #[error("gave up after {attempts} optimistic update attempts on `{table}`")]
    RetriesExhausted { table: String, attempts: u32 },

    /// A generated value does not fit the identifier's declared runtime type.
    #[error("generated value {value} does not fit identifier type {target:?}")]
    ValueOverflow { value: i64, target: IdType },
}

impl Error {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn database(sql: impl Into<String>, source: SqlError) -> Self {
        Self::Database {
            sql: sql.into(),
            source,
        }
    }
}

fn segment_clause(segment: &Option<String>) -> String {
    match segment {
        Some(value) => format!(" for segment `{value}`"),
        None => String::new(),
    }
}
