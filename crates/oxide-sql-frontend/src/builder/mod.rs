//! AST Builder
//!
//! Turns a post-processed parse tree into typed results. The parser only
//! guarantees the tree is grammatical; the builder decodes literals, maps type
//! names and assembles logical plans, rejecting what it cannot represent.
//!
//! # Example
//!
//! ```rust
//! use oxide_sql_frontend::ast::DataType;
//! use oxide_sql_frontend::SqlParser;
//!
//! let parser = SqlParser::default();
//! let dt = parser.parse_data_type("array<decimal(12, 2)>").unwrap();
//! assert_eq!(
//!     dt,
//!     DataType::Array(Box::new(DataType::Decimal { precision: 12, scale: 2 }))
//! );
//! ```

mod expression;
mod plan;
mod types;

use crate::ast::{DataType, Expr, FunctionIdentifier, Statement, StructType, TableIdentifier};
use crate::parser::{ParseError, Rule, RuleNode};

/// Errors raised while building typed results from a parse tree.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The input is rejected at a known position.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Decimal precision above the supported maximum.
    #[error("Decimal can only support precision up to {max}, got {precision}")]
    DecimalPrecision {
        /// The declared precision.
        precision: u64,
        /// The supported maximum.
        max: u8,
    },

    /// Decimal scale above its precision.
    #[error("Decimal scale ({scale}) cannot be greater than precision ({precision}).")]
    DecimalScale {
        /// The declared precision.
        precision: u64,
        /// The declared scale.
        scale: u64,
    },

    /// A `L`-suffixed literal that does not fit in 64 bits.
    #[error(
        "Numeric literal {0} does not fit in range \
         [-9223372036854775808, 9223372036854775807] for type bigint"
    )]
    BigIntOutOfRange(String),

    /// The tree does not have the shape its rule promises.
    #[error("Malformed parse tree: {parent:?} has no {missing}")]
    Malformed {
        /// The node being built.
        parent: Rule,
        /// What was looked for.
        missing: &'static str,
    },
}

impl BuildError {
    /// Creates a positioned error spanning `node`.
    #[must_use]
    pub fn at(message: impl Into<String>, node: &RuleNode) -> Self {
        Self::Parse(ParseError::new(message, node.start, node.stop))
    }
}

/// Builds typed results from entry-rule trees.
///
/// One method per entry rule. Each receives the finished, post-processed tree
/// of that rule.
pub trait AstBuilder {
    /// Builds the result of `singleStatement`.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] when the statement cannot be represented.
    fn visit_single_statement(&self, node: &RuleNode) -> Result<Statement, BuildError>;

    /// Builds the result of `singleExpression`.
    ///
    /// # Errors
    ///
    /// See [`AstBuilder::visit_single_statement`].
    fn visit_single_expression(&self, node: &RuleNode) -> Result<Expr, BuildError>;

    /// Builds the result of `singleTableIdentifier`.
    ///
    /// # Errors
    ///
    /// See [`AstBuilder::visit_single_statement`].
    fn visit_single_table_identifier(
        &self,
        node: &RuleNode,
    ) -> Result<TableIdentifier, BuildError>;

    /// Builds the result of `singleFunctionIdentifier`.
    ///
    /// # Errors
    ///
    /// See [`AstBuilder::visit_single_statement`].
    fn visit_single_function_identifier(
        &self,
        node: &RuleNode,
    ) -> Result<FunctionIdentifier, BuildError>;

    /// Builds the result of `singleDataType`.
    ///
    /// # Errors
    ///
    /// See [`AstBuilder::visit_single_statement`].
    fn visit_single_data_type(&self, node: &RuleNode) -> Result<DataType, BuildError>;

    /// Builds the result of `singleTableSchema`.
    ///
    /// # Errors
    ///
    /// See [`AstBuilder::visit_single_statement`].
    fn visit_single_table_schema(&self, node: &RuleNode) -> Result<StructType, BuildError>;
}

/// The builder used unless another one is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAstBuilder;

impl AstBuilder for DefaultAstBuilder {
    fn visit_single_statement(&self, node: &RuleNode) -> Result<Statement, BuildError> {
        plan::statement(first_rule(node)?)
    }

    fn visit_single_expression(&self, node: &RuleNode) -> Result<Expr, BuildError> {
        expression::named_expression(child(node, Rule::NamedExpression)?)
    }

    fn visit_single_table_identifier(
        &self,
        node: &RuleNode,
    ) -> Result<TableIdentifier, BuildError> {
        types::table_identifier(child(node, Rule::TableIdentifier)?)
    }

    fn visit_single_function_identifier(
        &self,
        node: &RuleNode,
    ) -> Result<FunctionIdentifier, BuildError> {
        types::function_identifier(child(node, Rule::FunctionIdentifier)?)
    }

    fn visit_single_data_type(&self, node: &RuleNode) -> Result<DataType, BuildError> {
        types::data_type(types::data_type_child(node)?)
    }

    fn visit_single_table_schema(&self, node: &RuleNode) -> Result<StructType, BuildError> {
        types::col_type_list(child(node, Rule::ColTypeList)?)
    }
}

/// Returns the first child of `node` produced by `rule`.
pub(crate) fn child(node: &RuleNode, rule: Rule) -> Result<&RuleNode, BuildError> {
    node.rule_of(rule).ok_or(BuildError::Malformed {
        parent: node.rule,
        missing: "expected rule child",
    })
}

/// Returns the first interior child of `node`.
pub(crate) fn first_rule(node: &RuleNode) -> Result<&RuleNode, BuildError> {
    nth_rule(node, 0)
}

/// Returns the `n`-th interior child of `node`.
pub(crate) fn nth_rule(node: &RuleNode, n: usize) -> Result<&RuleNode, BuildError> {
    node.rules().nth(n).ok_or(BuildError::Malformed {
        parent: node.rule,
        missing: "operand",
    })
}
