//! Typed results of parsing: data types, names, expressions and logical
//! plans.

mod expression;
mod identifier;
mod plan;
mod types;

pub use expression::{BinaryOp, Expr, FunctionCall, Literal, UnaryOp, WhenClause};
pub use identifier::{FunctionIdentifier, TableIdentifier};
pub use plan::{
    Assignment, JoinCondition, JoinType, LogicalPlan, NamedQuery, NativeCommand, NullOrdering,
    OrderDirection, SetOperator, SortOrder, Statement,
};
pub use types::{DataType, StructField, StructType, MAX_DECIMAL_PRECISION};
