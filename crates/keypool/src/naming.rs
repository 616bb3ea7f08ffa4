use crate::{Error, Result};
use core::fmt;

/// A database object name, optionally qualified by catalog and schema.
///
/// Rendered as `catalog.schema.object`, omitting absent qualifiers. A schema
/// is required whenever a catalog is present, matching how every supported
/// database family resolves three-part names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    catalog: Option<String>,
    schema: Option<String>,
    object: String,
}

impl QualifiedName {
    /// An unqualified object name.
    pub fn new(object: impl Into<String>) -> Result<Self> {
        Self::qualified(None, None, object)
    }

    pub fn qualified(
        catalog: Option<&str>,
        schema: Option<&str>,
        object: impl Into<String>,
    ) -> Result<Self> {
        let object = object.into();
        if catalog.is_some() && schema.is_none() {
            return Err(Error::configuration(format!(
                "object name `{object}` has a catalog qualifier but no schema"
            )));
        }
        for part in [Some(object.as_str()), catalog, schema].into_iter().flatten() {
            if part.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "object name `{object}` contains an empty name part"
                )));
            }
        }
        Ok(Self {
            catalog: catalog.map(str::to_owned),
            schema: schema.map(str::to_owned),
            object,
        })
    }

    /// Parses a dotted name of one to three parts.
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split('.').collect();
        match parts.as_slice() {
            [object] => Self::new(*object),
            [schema, object] => Self::qualified(None, Some(schema), *object),
            [catalog, schema, object] => Self::qualified(Some(catalog), Some(schema), *object),
            _ => Err(Error::configuration(format!(
                "malformed object name `{text}`: expected at most catalog.schema.object"
            ))),
        }
    }

    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// The unqualified object part of the name.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// The fully rendered name, suitable for embedding in SQL text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(catalog) = &self.catalog {
            write!(f, "{catalog}.")?;
        }
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        write!(f, "{}", self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::QualifiedName;
    use crate::Error;

    #[test]
    fn parses_all_arities() {
        assert_eq!(QualifiedName::parse("seq").unwrap().render(), "seq");
        assert_eq!(
            QualifiedName::parse("app.seq").unwrap().render(),
            "app.seq"
        );
        let full = QualifiedName::parse("main.app.seq").unwrap();
        assert_eq!(full.catalog(), Some("main"));
        assert_eq!(full.schema(), Some("app"));
        assert_eq!(full.object(), "seq");
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(matches!(
            QualifiedName::parse("a.b.c.d"),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            QualifiedName::parse("a..c"),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            QualifiedName::qualified(Some("cat"), None, "seq"),
            Err(Error::Configuration { .. })
        ));
    }
}
