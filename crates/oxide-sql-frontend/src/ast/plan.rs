//! Logical plan AST types.
//!
//! Plans are unresolved: table and column names are kept as written and no
//! catalog is consulted.

use serde::Serialize;

use super::{Expr, StructType, TableIdentifier};

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortOrder {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction.
    pub direction: OrderDirection,
    /// Explicit null ordering, if given.
    pub nulls: Option<NullOrdering>,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinType {
    /// INNER JOIN (also plain JOIN).
    Inner,
    /// CROSS JOIN.
    Cross,
    /// LEFT [OUTER] JOIN.
    LeftOuter,
    /// LEFT SEMI JOIN.
    LeftSemi,
    /// LEFT ANTI JOIN.
    LeftAnti,
    /// RIGHT [OUTER] JOIN.
    RightOuter,
    /// FULL [OUTER] JOIN.
    FullOuter,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Cross => "CROSS JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::LeftSemi => "LEFT SEMI JOIN",
            Self::LeftAnti => "LEFT ANTI JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
        }
    }
}

/// How the two sides of a join are matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JoinCondition {
    /// `ON condition`.
    On(Expr),
    /// `USING (a, b)`.
    Using(Vec<String>),
    /// `NATURAL ... JOIN`.
    Natural,
}

/// Set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SetOperator {
    /// UNION.
    Union,
    /// EXCEPT.
    Except,
    /// INTERSECT.
    Intersect,
}

impl SetOperator {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Except => "EXCEPT",
            Self::Intersect => "INTERSECT",
        }
    }
}

/// A `SET column = value` entry of UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    /// Column name parts.
    pub column: Vec<String>,
    /// The new value.
    pub value: Expr,
}

/// A common table expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedQuery {
    /// The name queries refer to it by.
    pub name: String,
    /// Its definition.
    pub query: LogicalPlan,
}

/// An unresolved logical plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LogicalPlan {
    /// A table referenced by name.
    UnresolvedRelation(TableIdentifier),

    /// The single empty row a FROM-less SELECT reads.
    OneRowRelation,

    /// `VALUES` rows.
    InlineTable {
        /// Row values, one vector per row.
        rows: Vec<Vec<Expr>>,
    },

    /// SELECT list without aggregation.
    Project {
        /// Output expressions.
        expressions: Vec<Expr>,
        /// Input.
        child: Box<LogicalPlan>,
    },

    /// WHERE or HAVING.
    Filter {
        /// Predicate rows must satisfy.
        condition: Expr,
        /// Input.
        child: Box<LogicalPlan>,
    },

    /// SELECT list with GROUP BY.
    Aggregate {
        /// Grouping expressions.
        grouping: Vec<Expr>,
        /// Output expressions.
        aggregates: Vec<Expr>,
        /// Input.
        child: Box<LogicalPlan>,
    },

    /// SELECT DISTINCT.
    Distinct {
        /// Input.
        child: Box<LogicalPlan>,
    },

    /// ORDER BY.
    Sort {
        /// Sort keys, most significant first.
        order: Vec<SortOrder>,
        /// Input.
        child: Box<LogicalPlan>,
    },

    /// LIMIT.
    Limit {
        /// Row count expression.
        limit: Expr,
        /// Input.
        child: Box<LogicalPlan>,
    },

    /// OFFSET.
    Offset {
        /// Skipped row count expression.
        offset: Expr,
        /// Input.
        child: Box<LogicalPlan>,
    },

    /// Two relations joined.
    Join {
        /// Left input.
        left: Box<LogicalPlan>,
        /// Right input.
        right: Box<LogicalPlan>,
        /// Join type.
        join_type: JoinType,
        /// Join condition, if any.
        condition: Option<JoinCondition>,
    },

    /// A named relation or subquery.
    SubqueryAlias {
        /// The alias.
        alias: String,
        /// Input.
        child: Box<LogicalPlan>,
    },

    /// UNION, EXCEPT or INTERSECT.
    SetOperation {
        /// The operator.
        op: SetOperator,
        /// Whether ALL was given. Without it duplicates are removed.
        all: bool,
        /// Left input.
        left: Box<LogicalPlan>,
        /// Right input.
        right: Box<LogicalPlan>,
    },

    /// WITH.
    With {
        /// Common table expressions in declaration order.
        ctes: Vec<NamedQuery>,
        /// The main query.
        child: Box<LogicalPlan>,
    },

    /// INSERT INTO / INSERT OVERWRITE.
    InsertIntoTable {
        /// Target table.
        table: TableIdentifier,
        /// Explicit target columns; empty when omitted.
        columns: Vec<String>,
        /// Whether existing rows are replaced.
        overwrite: bool,
        /// Rows to insert.
        query: Box<LogicalPlan>,
    },

    /// DELETE FROM.
    DeleteFromTable {
        /// Target table.
        table: TableIdentifier,
        /// Table alias.
        alias: Option<String>,
        /// WHERE predicate.
        condition: Option<Expr>,
    },

    /// UPDATE.
    UpdateTable {
        /// Target table.
        table: TableIdentifier,
        /// Table alias.
        alias: Option<String>,
        /// SET entries.
        assignments: Vec<Assignment>,
        /// WHERE predicate.
        condition: Option<Expr>,
    },

    /// CREATE TABLE.
    CreateTable {
        /// The new table.
        table: TableIdentifier,
        /// Its columns.
        schema: StructType,
        /// IF NOT EXISTS was given.
        if_not_exists: bool,
    },

    /// DROP TABLE.
    DropTable {
        /// The dropped table.
        table: TableIdentifier,
        /// IF EXISTS was given.
        if_exists: bool,
    },

    /// EXPLAIN.
    Explain {
        /// The explained statement.
        child: Box<LogicalPlan>,
        /// EXTENDED was given.
        extended: bool,
    },
}

impl LogicalPlan {
    /// Creates a reference to an unqualified table.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self::UnresolvedRelation(TableIdentifier::new(name))
    }

    /// Projects `expressions` over this plan.
    #[must_use]
    pub fn project(self, expressions: Vec<Expr>) -> Self {
        Self::Project {
            expressions,
            child: Box::new(self),
        }
    }

    /// Filters this plan.
    #[must_use]
    pub fn filter(self, condition: Expr) -> Self {
        Self::Filter {
            condition,
            child: Box::new(self),
        }
    }

    /// Names this plan.
    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        Self::SubqueryAlias {
            alias: alias.into(),
            child: Box::new(self),
        }
    }

    /// Returns the name of the plan node, for logging.
    #[must_use]
    pub const fn node_name(&self) -> &'static str {
        match self {
            Self::UnresolvedRelation(_) => "UnresolvedRelation",
            Self::OneRowRelation => "OneRowRelation",
            Self::InlineTable { .. } => "InlineTable",
            Self::Project { .. } => "Project",
            Self::Filter { .. } => "Filter",
            Self::Aggregate { .. } => "Aggregate",
            Self::Distinct { .. } => "Distinct",
            Self::Sort { .. } => "Sort",
            Self::Limit { .. } => "Limit",
            Self::Offset { .. } => "Offset",
            Self::Join { .. } => "Join",
            Self::SubqueryAlias { .. } => "SubqueryAlias",
            Self::SetOperation { .. } => "SetOperation",
            Self::With { .. } => "With",
            Self::InsertIntoTable { .. } => "InsertIntoTable",
            Self::DeleteFromTable { .. } => "DeleteFromTable",
            Self::UpdateTable { .. } => "UpdateTable",
            Self::CreateTable { .. } => "CreateTable",
            Self::DropTable { .. } => "DropTable",
            Self::Explain { .. } => "Explain",
        }
    }
}

/// A statement passed through verbatim because it has no plan form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeCommand {
    /// The leading keyword, upper-cased.
    pub keyword: String,
    /// The statement text.
    pub text: String,
}

/// The result of building a top-level statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// A statement with a logical plan.
    Plan(LogicalPlan),
    /// A native command.
    Native(NativeCommand),
}

impl Statement {
    /// Returns the plan, if this statement has one.
    #[must_use]
    pub fn into_plan(self) -> Option<LogicalPlan> {
        match self {
            Self::Plan(plan) => Some(plan),
            Self::Native(_) => None,
        }
    }
}
