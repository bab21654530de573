//! Qualified names.

use core::fmt;

use serde::Serialize;

/// Writes a name part, backquoting it.
fn quoted(f: &mut fmt::Formatter<'_>, part: &str) -> fmt::Result {
    write!(f, "`{}`", part.replace('`', "``"))
}

/// A table name with an optional database qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableIdentifier {
    /// The database, if given.
    pub database: Option<String>,
    /// The table name.
    pub table: String,
}

impl TableIdentifier {
    /// Creates an unqualified table identifier.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            database: None,
            table: table.into(),
        }
    }

    /// Creates a database-qualified table identifier.
    #[must_use]
    pub fn qualified(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(database) = &self.database {
            quoted(f, database)?;
            f.write_str(".")?;
        }
        quoted(f, &self.table)
    }
}

/// A function name with an optional database qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionIdentifier {
    /// The database, if given.
    pub database: Option<String>,
    /// The function name.
    pub name: String,
}

impl FunctionIdentifier {
    /// Creates an unqualified function identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            database: None,
            name: name.into(),
        }
    }

    /// Creates a database-qualified function identifier.
    #[must_use]
    pub fn qualified(database: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for FunctionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(database) = &self.database {
            quoted(f, database)?;
            f.write_str(".")?;
        }
        quoted(f, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_backquotes_parts() {
        assert_eq!(TableIdentifier::new("t").to_string(), "`t`");
        assert_eq!(TableIdentifier::qualified("db", "a`b").to_string(), "`db`.`a``b`");
        assert_eq!(FunctionIdentifier::qualified("db", "f").to_string(), "`db`.`f`");
    }
}
