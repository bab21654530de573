//! Statements, queries and relations.
//!
//! A query specification is assembled bottom-up: relation, WHERE filter,
//! projection or aggregation, HAVING filter, DISTINCT. Set operations,
//! ORDER BY, OFFSET, LIMIT and WITH wrap the result in that order.

use super::expression::{expression, named_expression};
use super::types::{alias, col_type_list, identifier, identifiers, table_identifier};
use super::{child, first_rule, BuildError};
use crate::ast::{
    Assignment, Expr, JoinCondition, JoinType, LogicalPlan, NamedQuery, NativeCommand,
    NullOrdering, OrderDirection, SetOperator, SortOrder, Statement,
};
use crate::lexer::{Keyword, TokenKind};
use crate::parser::{ParseTree, Rule, RuleNode};

/// Builds a statement node.
pub fn statement(node: &RuleNode) -> Result<Statement, BuildError> {
    let plan = match node.rule {
        Rule::StatementDefault => query(child(node, Rule::Query)?)?,
        Rule::InsertInto => insert_into(node)?,
        Rule::DeleteFromTable => LogicalPlan::DeleteFromTable {
            table: table_identifier(child(node, Rule::TableIdentifier)?)?,
            alias: alias(child(node, Rule::TableAlias)?)?,
            condition: where_clause(node)?,
        },
        Rule::UpdateTable => LogicalPlan::UpdateTable {
            table: table_identifier(child(node, Rule::TableIdentifier)?)?,
            alias: alias(child(node, Rule::TableAlias)?)?,
            assignments: node
                .rules_of(Rule::Assignment)
                .map(assignment)
                .collect::<Result<_, _>>()?,
            condition: where_clause(node)?,
        },
        Rule::CreateTable => LogicalPlan::CreateTable {
            table: table_identifier(child(node, Rule::TableIdentifier)?)?,
            schema: col_type_list(child(node, Rule::ColTypeList)?)?,
            if_not_exists: node.has_keyword(Keyword::If),
        },
        Rule::DropTable => LogicalPlan::DropTable {
            table: table_identifier(child(node, Rule::TableIdentifier)?)?,
            if_exists: node.has_keyword(Keyword::If),
        },
        Rule::Explain => match statement(first_rule(node)?)? {
            Statement::Plan(plan) => LogicalPlan::Explain {
                child: Box::new(plan),
                extended: node.has_keyword(Keyword::Extended),
            },
            Statement::Native(_) => return Ok(Statement::Native(native_command(node))),
        },
        Rule::NativeCommand => return Ok(Statement::Native(native_command(node))),
        other => {
            return Err(BuildError::Malformed {
                parent: other,
                missing: "statement",
            })
        }
    };
    Ok(Statement::Plan(plan))
}

fn native_command(node: &RuleNode) -> NativeCommand {
    NativeCommand {
        keyword: node
            .first_token()
            .map(|token| token.text.to_uppercase())
            .unwrap_or_default(),
        text: node.text(),
    }
}

fn insert_into(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    let columns = match node.rule_of(Rule::IdentifierList) {
        Some(list) => identifiers(list)?,
        None => Vec::new(),
    };
    Ok(LogicalPlan::InsertIntoTable {
        table: table_identifier(child(node, Rule::TableIdentifier)?)?,
        columns,
        overwrite: node.has_keyword(Keyword::Overwrite),
        query: Box::new(query(child(node, Rule::Query)?)?),
    })
}

fn assignment(node: &RuleNode) -> Result<Assignment, BuildError> {
    Ok(Assignment {
        column: identifiers(child(node, Rule::QualifiedName)?)?,
        value: expression(child(node, Rule::Expression)?)?,
    })
}

fn where_clause(node: &RuleNode) -> Result<Option<Expr>, BuildError> {
    node.rule_of(Rule::WhereClause)
        .map(|clause| expression(child(clause, Rule::Expression)?))
        .transpose()
}

// -------------------------------------------------------------------------
// Queries
// -------------------------------------------------------------------------

/// Builds a `query` node.
pub fn query(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    let body = query_no_with(child(node, Rule::QueryNoWith)?)?;
    let Some(ctes) = node.rule_of(Rule::Ctes) else {
        return Ok(body);
    };
    let ctes = ctes
        .rules_of(Rule::NamedQuery)
        .map(|named| {
            Ok(NamedQuery {
                name: identifier(child(named, Rule::Identifier)?)?,
                query: query(child(named, Rule::Query)?)?,
            })
        })
        .collect::<Result<_, BuildError>>()?;
    Ok(LogicalPlan::With {
        ctes,
        child: Box::new(body),
    })
}

fn query_no_with(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    let mut plan = query_term(child(node, Rule::QueryTerm)?)?;

    let order: Vec<SortOrder> = node
        .rules_of(Rule::SortItem)
        .map(sort_item)
        .collect::<Result<_, _>>()?;
    if !order.is_empty() {
        plan = LogicalPlan::Sort {
            order,
            child: Box::new(plan),
        };
    }

    // LIMIT and OFFSET are told apart by the keyword before them.
    let mut limit = None;
    let mut clause = None;
    for child in &node.children {
        match child {
            ParseTree::Terminal(token) => {
                if let Some(kw @ (Keyword::Limit | Keyword::Offset)) = token.as_keyword() {
                    clause = Some(kw);
                }
            }
            ParseTree::Rule(expr) if expr.rule == Rule::Expression => {
                let value = expression(expr)?;
                match clause {
                    Some(Keyword::Offset) => {
                        plan = LogicalPlan::Offset {
                            offset: value,
                            child: Box::new(plan),
                        };
                    }
                    _ => limit = Some(value),
                }
            }
            ParseTree::Rule(_) => {}
        }
    }
    if let Some(limit) = limit {
        plan = LogicalPlan::Limit {
            limit,
            child: Box::new(plan),
        };
    }
    Ok(plan)
}

fn sort_item(node: &RuleNode) -> Result<SortOrder, BuildError> {
    let direction = if node.has_keyword(Keyword::Desc) {
        OrderDirection::Desc
    } else {
        OrderDirection::Asc
    };
    let nulls = if node.has_keyword(Keyword::First) {
        Some(NullOrdering::First)
    } else if node.has_keyword(Keyword::Last) {
        Some(NullOrdering::Last)
    } else {
        None
    };
    Ok(SortOrder {
        expr: expression(child(node, Rule::Expression)?)?,
        direction,
        nulls,
    })
}

/// Folds `left (op quantifier? right)*` into left-deep set operations.
fn set_operations(
    node: &RuleNode,
    operand: fn(&RuleNode) -> Result<LogicalPlan, BuildError>,
) -> Result<LogicalPlan, BuildError> {
    let mut plan: Option<LogicalPlan> = None;
    let mut op = SetOperator::Union;
    let mut all = false;
    for child in &node.children {
        match child {
            ParseTree::Terminal(token) => match token.as_keyword() {
                Some(Keyword::Union) => op = SetOperator::Union,
                Some(Keyword::Except) => op = SetOperator::Except,
                Some(Keyword::Intersect) => op = SetOperator::Intersect,
                Some(Keyword::All) => all = true,
                _ => {}
            },
            ParseTree::Rule(next) => {
                let right = operand(next)?;
                let Some(left) = plan.take() else {
                    plan = Some(right);
                    continue;
                };
                plan = Some(LogicalPlan::SetOperation {
                    op,
                    all,
                    left: Box::new(left),
                    right: Box::new(right),
                });
                all = false;
            }
        }
    }
    plan.ok_or(BuildError::Malformed {
        parent: node.rule,
        missing: "query term",
    })
}

fn query_term(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    set_operations(node, intersect_term)
}

fn intersect_term(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    set_operations(node, query_primary)
}

fn query_primary(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    match node.rule {
        Rule::QuerySpecification => query_specification(node),
        Rule::TableQuery => Ok(LogicalPlan::UnresolvedRelation(table_identifier(child(
            node,
            Rule::TableIdentifier,
        )?)?)),
        Rule::InlineTable => inline_table(node),
        Rule::ParenthesizedQuery => query_no_with(child(node, Rule::QueryNoWith)?),
        other => Err(BuildError::Malformed {
            parent: other,
            missing: "query primary",
        }),
    }
}

fn query_specification(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    let expressions: Vec<Expr> = node
        .rules_of(Rule::NamedExpression)
        .map(named_expression)
        .collect::<Result<_, _>>()?;

    let mut plan = match node.rule_of(Rule::FromClause) {
        Some(from) => from_clause(from)?,
        None => LogicalPlan::OneRowRelation,
    };
    if let Some(condition) = where_clause(node)? {
        plan = plan.filter(condition);
    }

    let having = node
        .rule_of(Rule::HavingClause)
        .map(|clause| expression(child(clause, Rule::Expression)?))
        .transpose()?;
    let grouping = node
        .rule_of(Rule::AggregationClause)
        .map(|clause| {
            clause
                .rules_of(Rule::Expression)
                .map(expression)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    // HAVING without GROUP BY aggregates over a single group.
    plan = match (grouping, &having) {
        (Some(grouping), _) => LogicalPlan::Aggregate {
            grouping,
            aggregates: expressions,
            child: Box::new(plan),
        },
        (None, Some(_)) => LogicalPlan::Aggregate {
            grouping: Vec::new(),
            aggregates: expressions,
            child: Box::new(plan),
        },
        (None, None) => plan.project(expressions),
    };
    if let Some(condition) = having {
        plan = plan.filter(condition);
    }
    if node.has_keyword(Keyword::Distinct) {
        plan = LogicalPlan::Distinct {
            child: Box::new(plan),
        };
    }
    Ok(plan)
}

fn inline_table(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    let rows = node
        .rules_of(Rule::Expression)
        .map(|row| {
            Ok(match expression(row)? {
                Expr::Row(values) => values,
                value => vec![value],
            })
        })
        .collect::<Result<_, BuildError>>()?;
    Ok(LogicalPlan::InlineTable { rows })
}

// -------------------------------------------------------------------------
// Relations
// -------------------------------------------------------------------------

/// Comma-separated relations are inner-joined without a condition.
fn from_clause(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    let mut relations = node.rules_of(Rule::Relation).map(relation);
    let first = relations.next().ok_or(BuildError::Malformed {
        parent: node.rule,
        missing: "relation",
    })??;
    relations.try_fold(first, |left, right| {
        Ok(LogicalPlan::Join {
            left: Box::new(left),
            right: Box::new(right?),
            join_type: JoinType::Inner,
            condition: None,
        })
    })
}

fn relation(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    let mut plan = relation_primary(first_rule(node)?)?;
    for join in node.rules_of(Rule::JoinRelation) {
        let natural = join.has_keyword(Keyword::Natural);
        let join_type = join_type(child(join, Rule::JoinType)?);
        let right = relation_primary(
            join.rules()
                .find(|n| n.rule != Rule::JoinType && n.rule != Rule::JoinCriteria)
                .ok_or(BuildError::Malformed {
                    parent: join.rule,
                    missing: "joined relation",
                })?,
        )?;
        let condition = if natural {
            Some(JoinCondition::Natural)
        } else {
            join.rule_of(Rule::JoinCriteria)
                .map(join_criteria)
                .transpose()?
        };
        plan = LogicalPlan::Join {
            left: Box::new(plan),
            right: Box::new(right),
            join_type,
            condition,
        };
    }
    Ok(plan)
}

fn join_type(node: &RuleNode) -> JoinType {
    let keywords: Vec<Keyword> = node.tokens().filter_map(|token| token.as_keyword()).collect();
    match keywords.as_slice() {
        [Keyword::Cross] => JoinType::Cross,
        [Keyword::Left, Keyword::Semi] => JoinType::LeftSemi,
        [Keyword::Left, Keyword::Anti] => JoinType::LeftAnti,
        [Keyword::Left, ..] => JoinType::LeftOuter,
        [Keyword::Right, ..] => JoinType::RightOuter,
        [Keyword::Full, ..] => JoinType::FullOuter,
        _ => JoinType::Inner,
    }
}

fn join_criteria(node: &RuleNode) -> Result<JoinCondition, BuildError> {
    if node.token_of(TokenKind::Keyword(Keyword::Using)).is_some() {
        Ok(JoinCondition::Using(identifiers(child(
            node,
            Rule::IdentifierList,
        )?)?))
    } else {
        Ok(JoinCondition::On(expression(child(node, Rule::Expression)?)?))
    }
}

fn relation_primary(node: &RuleNode) -> Result<LogicalPlan, BuildError> {
    let mut plan = match node.rule {
        Rule::TableName => {
            LogicalPlan::UnresolvedRelation(table_identifier(child(node, Rule::TableIdentifier)?)?)
        }
        Rule::AliasedQuery => query_no_with(child(node, Rule::QueryNoWith)?)?,
        Rule::AliasedRelation => relation(child(node, Rule::Relation)?)?,
        Rule::InlineTableRelation => inline_table(child(node, Rule::InlineTable)?)?,
        other => {
            return Err(BuildError::Malformed {
                parent: other,
                missing: "relation",
            })
        }
    };
    if let Some(name) = alias(child(node, Rule::TableAlias)?)? {
        plan = plan.alias(name);
    }
    Ok(plan)
}
