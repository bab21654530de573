//! SQL data type definitions.

use core::fmt;

use serde::Serialize;

/// Largest precision a decimal type may declare.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// SQL data types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataType {
    /// Boolean.
    Boolean,

    // Integer types
    /// 1-byte integer (`TINYINT`, `BYTE`).
    Byte,
    /// 2-byte integer (`SMALLINT`, `SHORT`).
    Short,
    /// 4-byte integer (`INT`, `INTEGER`).
    Integer,
    /// 8-byte integer (`BIGINT`, `LONG`).
    Long,

    // Floating point
    /// 4-byte float.
    Float,
    /// 8-byte float.
    Double,
    /// Fixed-point decimal.
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after the decimal point.
        scale: u8,
    },

    // Strings and binary
    /// Unbounded string.
    String,
    /// Fixed-length character string.
    Char(u32),
    /// Bounded variable-length character string.
    Varchar(u32),
    /// Byte sequence.
    Binary,

    // Date/time types
    /// Calendar date.
    Date,
    /// Timestamp.
    Timestamp,

    // Complex types
    /// Array of elements of one type.
    Array(Box<DataType>),
    /// Map from keys of one type to values of another.
    Map(Box<DataType>, Box<DataType>),
    /// Record of named fields.
    Struct(StructType),
}

impl DataType {
    /// The decimal type used when no precision is given.
    pub const DEFAULT_DECIMAL: Self = Self::Decimal {
        precision: 10,
        scale: 0,
    };

    /// Returns the SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("BOOLEAN"),
            Self::Byte => f.write_str("TINYINT"),
            Self::Short => f.write_str("SMALLINT"),
            Self::Integer => f.write_str("INT"),
            Self::Long => f.write_str("BIGINT"),
            Self::Float => f.write_str("FLOAT"),
            Self::Double => f.write_str("DOUBLE"),
            Self::Decimal { precision, scale } => write!(f, "DECIMAL({precision},{scale})"),
            Self::String => f.write_str("STRING"),
            Self::Char(n) => write!(f, "CHAR({n})"),
            Self::Varchar(n) => write!(f, "VARCHAR({n})"),
            Self::Binary => f.write_str("BINARY"),
            Self::Date => f.write_str("DATE"),
            Self::Timestamp => f.write_str("TIMESTAMP"),
            Self::Array(element) => write!(f, "ARRAY<{element}>"),
            Self::Map(key, value) => write!(f, "MAP<{key},{value}>"),
            Self::Struct(st) => write!(f, "{st}"),
        }
    }
}

/// A named, typed field of a struct or table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructField {
    /// Field name.
    pub name: String,
    /// Field type.
    pub data_type: DataType,
    /// Whether the field accepts NULL.
    pub nullable: bool,
    /// Optional `COMMENT`.
    pub comment: Option<String>,
}

impl StructField {
    /// Creates a nullable field without comment.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            comment: None,
        }
    }
}

impl fmt::Display for StructField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.data_type)?;
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}

/// An ordered list of fields. Used both for `STRUCT<...>` and table schemas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StructType {
    /// The fields, in declaration order.
    pub fields: Vec<StructField>,
}

impl StructType {
    /// Creates a struct type from its fields.
    #[must_use]
    pub fn new(fields: Vec<StructField>) -> Self {
        Self { fields }
    }

    /// Looks up a field by name, case-insensitively.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("STRUCT<")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_to_sql() {
        assert_eq!(DataType::Integer.to_sql(), "INT");
        assert_eq!(DataType::DEFAULT_DECIMAL.to_sql(), "DECIMAL(10,0)");
        assert_eq!(DataType::Varchar(255).to_sql(), "VARCHAR(255)");
        assert_eq!(
            DataType::Map(Box::new(DataType::String), Box::new(DataType::Long)).to_sql(),
            "MAP<STRING,BIGINT>"
        );
    }

    #[test]
    fn test_struct_display_and_lookup() {
        let mut id = StructField::new("id", DataType::Long);
        id.nullable = false;
        let st = StructType::new(vec![id, StructField::new("Name", DataType::String)]);
        assert_eq!(st.to_string(), "STRUCT<id:BIGINT NOT NULL,Name:STRING>");
        assert!(st.field("name").is_some());
        assert!(st.field("other").is_none());
    }
}
