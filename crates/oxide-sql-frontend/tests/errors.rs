//! Tests for error reporting: positions, messages, the rendered SQL
//! excerpt and the attached command text.

mod common;
use common::*;

use oxide_sql_frontend::ast::{
    DataType, Expr, FunctionIdentifier, Statement, StructType, TableIdentifier,
};
use oxide_sql_frontend::builder::{AstBuilder, BuildError, DefaultAstBuilder};
use oxide_sql_frontend::parser::RuleNode;
use oxide_sql_frontend::{Origin, ParserConfig, SqlParser};

// ===================================================================
// Positions and messages
// ===================================================================

#[test]
fn missing_select_list() {
    let err = plan_err("SELECT FROM t");
    assert_eq!(err.message, "no viable alternative at input 'FROM'");
    assert_eq!(err.start, Origin::new(1, 7));
    assert_eq!(err.stop, Origin::new(1, 11));
}

#[test]
fn incomplete_where() {
    let err = plan_err("SELECT * FROM t WHERE");
    assert_eq!(err.message, "no viable alternative at input '<EOF>'");
    assert_eq!(err.start, Origin::new(1, 21));
}

#[test]
fn unexpected_trailing_token() {
    let err = plan_err("SELECT a FROM t t2 t3");
    assert_eq!(err.message, "mismatched input 't3' expecting {<EOF>, ';'}");
    assert_eq!(err.start, Origin::new(1, 19));
}

#[test]
fn misspelled_keyword() {
    let err = plan_err("SELECT * FORM t");
    assert_eq!(err.message, "mismatched input 't' expecting {<EOF>, ';'}");
    assert_eq!(err.start, Origin::new(1, 14));
}

#[test]
fn unknown_statement() {
    let err = plan_err("FROB t");
    assert_eq!(err.message, "no viable alternative at input 'FROB'");
    assert_eq!(err.start, Origin::new(1, 0));
}

#[test]
fn position_on_later_line() {
    let err = plan_err("SELECT a\nFROM t\nWHERE");
    assert_eq!(err.start, Origin::new(3, 5));
}

#[test]
fn only_the_first_error_is_reported() {
    let err = plan_err("SELECT FROM WHERE )");
    assert_eq!(err.message, "no viable alternative at input 'FROM'");
    assert_eq!(err.start, Origin::new(1, 7));
}

#[test]
fn lexer_errors_fail_fast() {
    let err = plan_err("SELECT # FROM t WHERE )");
    assert!(
        err.message.starts_with("token recognition error at: '#"),
        "{}",
        err.message
    );
    assert_eq!(err.start, Origin::new(1, 7));
}

#[test]
fn unterminated_string() {
    let err = expr_err("'abc");
    assert!(
        err.message.starts_with("token recognition error at:"),
        "{}",
        err.message
    );
    assert_eq!(err.start, Origin::new(1, 0));
}

// ===================================================================
// Nesting depth
// ===================================================================

fn nested_calls(depth: usize) -> String {
    format!("SELECT {}x{}", "f(".repeat(depth), ")".repeat(depth))
}

fn nested_parens(depth: usize) -> String {
    format!("{}1{}", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn deeply_nested_calls_are_rejected() {
    let err = plan_err(&nested_calls(5000));
    assert!(
        err.message.starts_with("input nested too deeply at 'f' (maximum depth is 200)"),
        "{}",
        err.message
    );
    assert_eq!(err.start.line, Some(1));
    assert!(err.stop.start_position > err.start.start_position);
}

#[test]
fn deeply_nested_parentheses_are_rejected() {
    let err = expr_err(&nested_parens(5000));
    assert!(err.message.contains("nested too deeply"), "{}", err.message);

    let err = exact_parser().parse_expression(&nested_parens(5000)).unwrap_err();
    assert!(err.message.contains("nested too deeply"), "{}", err.message);
}

#[test]
fn moderate_nesting_is_accepted() {
    assert!(parser().parse_plan(&nested_calls(25)).is_ok());
    assert_eq!(expr(&nested_parens(25)), expr("1"));
    assert_same_as_exact(&nested_calls(25));
}

#[test]
fn nesting_limit_is_configurable() {
    let shallow = SqlParser::new(ParserConfig::DEFAULT.with_max_depth(16));
    let err = shallow.parse_plan(&nested_calls(8)).unwrap_err();
    assert!(err.message.contains("maximum depth is 16"), "{}", err.message);
    assert_eq!(err.command(), Some(nested_calls(8).as_str()));

    assert!(shallow.parse_plan("SELECT f(x) FROM t").is_ok());
    assert!(parser().parse_plan(&nested_calls(8)).is_ok());
}

// ===================================================================
// Rendering
// ===================================================================

#[test]
fn rendering_points_at_the_error() {
    let err = plan_err("SELECT * FROM t WHERE");
    assert_eq!(
        err.to_string(),
        "no viable alternative at input '<EOF>'(line 1, pos 21)\n\n\
         == SQL ==\n\
         SELECT * FROM t WHERE\n\
         ---------------------^^^\n"
    );
}

#[test]
fn rendering_splits_multi_line_commands() {
    let err = plan_err("SELECT\nFROM t\nWHERE a");
    assert_eq!(
        err.to_string(),
        "no viable alternative at input 'FROM'(line 2, pos 0)\n\n\
         == SQL ==\n\
         SELECT\n\
         FROM t\n\
         ^^^\n\
         WHERE a\n"
    );
}

#[test]
fn rendering_without_position() {
    let err = plan_err("USE db");
    assert_eq!(err.to_string(), "Unsupported SQL statement\n\n== SQL ==\nUSE db");
}

#[test]
fn command_is_attached_exactly_once() {
    let err = plan_err("SELECT ((SELECT 1)) FROM");
    assert_eq!(err.command(), Some("SELECT ((SELECT 1)) FROM"));
    assert_eq!(err.to_string().matches("== SQL ==").count(), 1);
}

#[test]
fn errors_serialize_as_json() {
    let err = plan_err("SELECT FROM t");
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["message"], "no viable alternative at input 'FROM'");
    assert_eq!(json["start"]["line"], 1);
    assert_eq!(json["start"]["start_position"], 7);
}

// ===================================================================
// Custom builders
// ===================================================================

/// Delegates to the default builder but refuses every statement.
struct ReadOnly;

impl AstBuilder for ReadOnly {
    fn visit_single_statement(&self, node: &RuleNode) -> Result<Statement, BuildError> {
        Err(BuildError::at("statements are disabled", node))
    }

    fn visit_single_expression(&self, node: &RuleNode) -> Result<Expr, BuildError> {
        DefaultAstBuilder.visit_single_expression(node)
    }

    fn visit_single_table_identifier(
        &self,
        node: &RuleNode,
    ) -> Result<TableIdentifier, BuildError> {
        DefaultAstBuilder.visit_single_table_identifier(node)
    }

    fn visit_single_function_identifier(
        &self,
        node: &RuleNode,
    ) -> Result<FunctionIdentifier, BuildError> {
        DefaultAstBuilder.visit_single_function_identifier(node)
    }

    fn visit_single_data_type(
        &self,
        node: &RuleNode,
    ) -> Result<DataType, BuildError> {
        DefaultAstBuilder.visit_single_data_type(node)
    }

    fn visit_single_table_schema(
        &self,
        node: &RuleNode,
    ) -> Result<StructType, BuildError> {
        DefaultAstBuilder.visit_single_table_schema(node)
    }
}

#[test]
fn custom_builder_errors_are_enriched() {
    let p = SqlParser::with_builder(ParserConfig::DEFAULT, ReadOnly);
    let err = p.parse_plan("  SELECT 1").unwrap_err();
    assert_eq!(err.message, "statements are disabled");
    assert_eq!(err.start, Origin::new(1, 2));
    assert_eq!(err.command(), Some("  SELECT 1"));

    assert_eq!(p.parse_expression("a").unwrap(), Expr::column("a"));
}
