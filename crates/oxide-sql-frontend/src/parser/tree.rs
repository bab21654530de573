//! Concrete parse trees.

use super::error::Origin;
use crate::lexer::{Keyword, Token, TokenKind};

/// Grammar rules, one per kind of interior parse-tree node.
///
/// Where a grammar rule has labelled alternatives, each alternative gets its
/// own variant so the AST builder can dispatch on the node alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Rule {
    // Entry points
    SingleStatement,
    SingleExpression,
    SingleTableIdentifier,
    SingleFunctionIdentifier,
    SingleDataType,
    SingleTableSchema,

    // Statements
    StatementDefault,
    InsertInto,
    DeleteFromTable,
    UpdateTable,
    Assignment,
    CreateTable,
    DropTable,
    Explain,
    NativeCommand,

    // Queries
    Query,
    Ctes,
    NamedQuery,
    QueryNoWith,
    QueryTerm,
    IntersectTerm,
    QuerySpecification,
    TableQuery,
    InlineTable,
    ParenthesizedQuery,
    NamedExpression,
    FromClause,
    WhereClause,
    AggregationClause,
    HavingClause,
    SortItem,

    // Relations
    Relation,
    JoinRelation,
    JoinType,
    JoinCriteria,
    TableName,
    AliasedQuery,
    AliasedRelation,
    InlineTableRelation,
    TableAlias,

    // Expressions
    Expression,
    LogicalNot,
    LogicalBinary,
    Comparison,
    Between,
    InList,
    InSubquery,
    Like,
    IsNull,
    ArithmeticBinary,
    ArithmeticUnary,
    Dereference,
    Subscript,
    NullLiteral,
    BooleanLiteral,
    NumericLiteral,
    StringLiteral,
    TypeConstructor,
    Star,
    QualifiedStar,
    FunctionCall,
    SearchedCase,
    SimpleCase,
    WhenClause,
    Cast,
    Exists,
    SubqueryExpression,
    Parenthesized,
    RowConstructor,
    ColumnReference,

    // Types and names
    ComplexDataType,
    PrimitiveDataType,
    ComplexColTypeList,
    ComplexColType,
    ColTypeList,
    ColType,
    TableIdentifier,
    FunctionIdentifier,
    QualifiedName,
    IdentifierList,
    Identifier,
    QuotedIdentifier,
    NonReserved,
}

/// A parse-tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree {
    /// An interior node.
    Rule(RuleNode),
    /// A leaf holding one token.
    Terminal(Token),
}

/// An interior parse-tree node: one matched rule and its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNode {
    /// The rule that produced this node.
    pub rule: Rule,
    /// Children in input order.
    pub children: Vec<ParseTree>,
    /// Position of the first token.
    pub start: Origin,
    /// Position just past the last token. Equal to `start` for a node
    /// without children.
    pub stop: Origin,
}

impl RuleNode {
    /// Creates an empty node.
    #[must_use]
    pub const fn new(rule: Rule, start: Origin) -> Self {
        Self {
            rule,
            children: Vec::new(),
            start,
            stop: start,
        }
    }

    /// Iterates over the interior children.
    pub fn rules(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            ParseTree::Rule(node) => Some(node),
            ParseTree::Terminal(_) => None,
        })
    }

    /// Iterates over the interior children produced by `rule`.
    pub fn rules_of(&self, rule: Rule) -> impl Iterator<Item = &Self> {
        self.rules().filter(move |node| node.rule == rule)
    }

    /// Returns the first interior child produced by `rule`.
    #[must_use]
    pub fn rule_of(&self, rule: Rule) -> Option<&Self> {
        self.rules_of(rule).next()
    }

    /// Iterates over the leaf children.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|child| match child {
            ParseTree::Terminal(token) => Some(token),
            ParseTree::Rule(_) => None,
        })
    }

    /// Returns the first leaf child of the given kind.
    #[must_use]
    pub fn token_of(&self, kind: TokenKind) -> Option<&Token> {
        self.tokens().find(|token| token.kind == kind)
    }

    /// Returns true if a leaf child is the given keyword.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.token_of(TokenKind::Keyword(keyword)).is_some()
    }

    /// Returns the first leaf of the whole subtree.
    #[must_use]
    pub fn first_token(&self) -> Option<&Token> {
        self.children.iter().find_map(|child| match child {
            ParseTree::Terminal(token) => Some(token),
            ParseTree::Rule(node) => node.first_token(),
        })
    }

    /// Collects every leaf of the subtree in input order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match child {
                ParseTree::Terminal(token) => out.push(token),
                ParseTree::Rule(node) => node.collect_leaves(out),
            }
        }
    }

    /// Returns the leaf texts of the subtree joined by single spaces, EOF
    /// excluded.
    #[must_use]
    pub fn text(&self) -> String {
        self.leaves()
            .into_iter()
            .filter(|token| !token.is_eof())
            .map(|token| token.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Observes rule exits while the tree is being built.
pub trait TreeListener {
    /// Called when `node` is complete, before it is attached to its parent.
    ///
    /// Returning a token replaces the node in its parent with that token.
    fn exit_rule(&self, node: &RuleNode) -> Option<Token>;
}
