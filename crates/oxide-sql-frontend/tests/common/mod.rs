//! Shared test helpers for the front-end integration tests.

#![allow(dead_code)]

use oxide_sql_frontend::ast::{DataType, Expr, LogicalPlan, StructType};
use oxide_sql_frontend::{ParseError, ParserConfig, PredictionStrategy, SqlParser};

/// A parser with the default configuration.
pub fn parser() -> SqlParser {
    SqlParser::default()
}

/// A parser that predicts exactly from the start.
pub fn exact_parser() -> SqlParser {
    SqlParser::new(ParserConfig::DEFAULT.with_prediction(PredictionStrategy::ExactOnly))
}

/// Parses a statement into a plan, panicking on failure.
pub fn plan(sql: &str) -> LogicalPlan {
    parser()
        .parse_plan(sql)
        .unwrap_or_else(|e| panic!("Failed to parse plan: {sql}\nError: {e}"))
}

/// Parses a statement that must fail.
pub fn plan_err(sql: &str) -> ParseError {
    parser()
        .parse_plan(sql)
        .expect_err(&format!("Expected plan parse error for: {sql}"))
}

/// Parses an expression, panicking on failure.
pub fn expr(sql: &str) -> Expr {
    parser()
        .parse_expression(sql)
        .unwrap_or_else(|e| panic!("Failed to parse expression: {sql}\nError: {e}"))
}

/// Parses an expression that must fail.
pub fn expr_err(sql: &str) -> ParseError {
    parser()
        .parse_expression(sql)
        .expect_err(&format!("Expected expression parse error for: {sql}"))
}

/// Parses a data type, panicking on failure.
pub fn data_type(sql: &str) -> DataType {
    parser()
        .parse_data_type(sql)
        .unwrap_or_else(|e| panic!("Failed to parse data type: {sql}\nError: {e}"))
}

/// Parses a data type that must fail.
pub fn data_type_err(sql: &str) -> ParseError {
    parser()
        .parse_data_type(sql)
        .expect_err(&format!("Expected data type parse error for: {sql}"))
}

/// Parses a column list, panicking on failure.
pub fn schema(sql: &str) -> StructType {
    parser()
        .parse_table_schema(sql)
        .unwrap_or_else(|e| panic!("Failed to parse schema: {sql}\nError: {e}"))
}

/// Asserts that adaptive and exact prediction agree on `sql`, success or
/// failure alike.
pub fn assert_same_as_exact(sql: &str) {
    assert_eq!(
        parser().parse_plan(sql),
        exact_parser().parse_plan(sql),
        "adaptive and exact parses differ for: {sql}"
    );
}

/// Shorthand for a boxed plan.
pub fn boxed(plan: LogicalPlan) -> Box<LogicalPlan> {
    Box::new(plan)
}
