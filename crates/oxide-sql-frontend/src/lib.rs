//! # oxide-sql-frontend
//!
//! Turns SQL text into typed values: data types, expressions, qualified
//! names, table schemas and logical plans.
//!
//! This crate provides:
//! - A case-insensitive lexer that keeps the original casing in token text
//! - A recursive descent parser with Pratt expression parsing and adaptive
//!   prediction (approximate first, exact on demand)
//! - Structured, positioned errors that render the offending SQL
//!
//! ## Parsing
//!
//! ```rust
//! use oxide_sql_frontend::ast::{Expr, LogicalPlan};
//! use oxide_sql_frontend::SqlParser;
//!
//! let parser = SqlParser::default();
//!
//! let dt = parser.parse_data_type("MAP<STRING, BIGINT>").unwrap();
//! assert_eq!(dt.to_sql(), "MAP<STRING,BIGINT>");
//!
//! let expr = parser.parse_expression("a + 1 AS b").unwrap();
//! assert!(matches!(expr, Expr::Alias { .. }));
//!
//! let plan = parser.parse_plan("select * from users where active").unwrap();
//! assert!(matches!(plan, LogicalPlan::Project { .. }));
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`ParseError`] carrying the position of the problem and
//! the command text:
//!
//! ```rust
//! use oxide_sql_frontend::SqlParser;
//!
//! let err = SqlParser::default().parse_plan("SELECT a FROM").unwrap_err();
//! assert_eq!(err.start.line, Some(1));
//! assert_eq!(err.start.start_position, Some(13));
//! assert!(err.to_string().contains("== SQL =="));
//! ```

pub mod ast;
pub mod builder;
pub mod config;
pub mod lexer;
pub mod parser;

pub use ast::{DataType, Expr, LogicalPlan, Statement};
pub use builder::{AstBuilder, BuildError, DefaultAstBuilder};
pub use config::{ParserConfig, PredictionStrategy};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Origin, ParseError, Parser, SqlParser};
