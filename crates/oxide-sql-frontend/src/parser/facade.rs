//! The public parsing entry points.

use tracing::debug;

use super::driver::ParseDriver;
use super::error::ParseError;
use crate::ast::{DataType, Expr, FunctionIdentifier, LogicalPlan, StructType, TableIdentifier};
use crate::builder::{AstBuilder, DefaultAstBuilder};
use crate::config::ParserConfig;

/// Parses SQL text into typed results.
///
/// Holds only immutable configuration and the AST builder, so one instance
/// can serve any number of threads. Every call builds its own lexer, token
/// stream and parse tree.
///
/// # Example
///
/// ```rust
/// use oxide_sql_frontend::ast::TableIdentifier;
/// use oxide_sql_frontend::SqlParser;
///
/// let parser = SqlParser::default();
/// let table = parser.parse_table_identifier("sales.orders").unwrap();
/// assert_eq!(table, TableIdentifier::qualified("sales", "orders"));
///
/// let err = parser.parse_plan("SELECT * FORM t").unwrap_err();
/// assert_eq!(err.start.line, Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct SqlParser<B = DefaultAstBuilder> {
    driver: ParseDriver,
    builder: B,
}

impl SqlParser {
    /// Creates a parser using the default AST builder.
    #[must_use]
    pub const fn new(config: ParserConfig) -> Self {
        Self::with_builder(config, DefaultAstBuilder)
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new(ParserConfig::DEFAULT)
    }
}

impl<B: AstBuilder> SqlParser<B> {
    /// Creates a parser using a custom AST builder.
    #[must_use]
    pub const fn with_builder(config: ParserConfig, builder: B) -> Self {
        Self {
            driver: ParseDriver::new(config),
            builder,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        self.driver.config()
    }

    /// Parses a data type such as `map<string, array<int>>`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed or unsupported input.
    pub fn parse_data_type(&self, sql: &str) -> Result<DataType, ParseError> {
        debug!(sql, "parsing data type");
        self.driver.parse(sql, |p| {
            let tree = p.single_data_type()?;
            Ok(self.builder.visit_single_data_type(&tree)?)
        })
    }

    /// Parses a single, optionally aliased expression.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed or unsupported input.
    pub fn parse_expression(&self, sql: &str) -> Result<Expr, ParseError> {
        debug!(sql, "parsing expression");
        self.driver.parse(sql, |p| {
            let tree = p.single_expression()?;
            Ok(self.builder.visit_single_expression(&tree)?)
        })
    }

    /// Parses a `[database.]table` name.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed input.
    pub fn parse_table_identifier(&self, sql: &str) -> Result<TableIdentifier, ParseError> {
        debug!(sql, "parsing table identifier");
        self.driver.parse(sql, |p| {
            let tree = p.single_table_identifier()?;
            Ok(self.builder.visit_single_table_identifier(&tree)?)
        })
    }

    /// Parses a `[database.]function` name.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed input.
    pub fn parse_function_identifier(&self, sql: &str) -> Result<FunctionIdentifier, ParseError> {
        debug!(sql, "parsing function identifier");
        self.driver.parse(sql, |p| {
            let tree = p.single_function_identifier()?;
            Ok(self.builder.visit_single_function_identifier(&tree)?)
        })
    }

    /// Parses a column list such as `a INT, b STRING NOT NULL`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed or unsupported input.
    pub fn parse_table_schema(&self, sql: &str) -> Result<StructType, ParseError> {
        debug!(sql, "parsing table schema");
        self.driver.parse(sql, |p| {
            let tree = p.single_table_schema()?;
            Ok(self.builder.visit_single_table_schema(&tree)?)
        })
    }

    /// Parses one statement into a logical plan.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed input, and
    /// `Unsupported SQL statement` at an unknown origin for statements that
    /// have no plan form.
    pub fn parse_plan(&self, sql: &str) -> Result<LogicalPlan, ParseError> {
        debug!(sql, "parsing plan");
        let statement = self.driver.parse(sql, |p| {
            let tree = p.single_statement()?;
            Ok(self.builder.visit_single_statement(&tree)?)
        })?;
        statement
            .into_plan()
            .ok_or_else(|| ParseError::unpositioned("Unsupported SQL statement").with_command(sql))
    }
}
