//! Expressions and literals.

use super::plan::query;
use super::types::{data_type, data_type_child, identifier, identifiers};
use super::{child, first_rule, nth_rule, BuildError};
use crate::ast::{
    BinaryOp, Expr, FunctionCall, FunctionIdentifier, Literal, LogicalPlan, UnaryOp, WhenClause,
};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::parser::{Rule, RuleNode};

/// Builds a `namedExpression` node: an expression with an optional alias.
pub fn named_expression(node: &RuleNode) -> Result<Expr, BuildError> {
    let expr = expression(child(node, Rule::Expression)?)?;
    match node.rule_of(Rule::Identifier) {
        Some(alias) => Ok(expr.alias(identifier(alias)?)),
        None => Ok(expr),
    }
}

/// Builds any expression node.
pub fn expression(node: &RuleNode) -> Result<Expr, BuildError> {
    match node.rule {
        Rule::Expression => expression(first_rule(node)?),
        Rule::Parenthesized => expression(child(node, Rule::Expression)?),
        rule if is_binary(rule) => binary_chain(node),
        Rule::LogicalNot | Rule::ArithmeticUnary => unary(node),
        Rule::IsNull | Rule::Between | Rule::InList | Rule::InSubquery | Rule::Like => {
            predicate(node)
        }
        Rule::Dereference => dereference(node),
        Rule::Subscript => Ok(Expr::Subscript {
            expr: operand(node, 0)?,
            index: operand(node, 1)?,
        }),
        Rule::NullLiteral
        | Rule::BooleanLiteral
        | Rule::NumericLiteral
        | Rule::StringLiteral
        | Rule::TypeConstructor => literal(node),
        Rule::SearchedCase | Rule::SimpleCase => case_expression(node),
        _ => primary(node),
    }
}

const fn is_binary(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::LogicalBinary | Rule::Comparison | Rule::ArithmeticBinary
    )
}

fn operand(node: &RuleNode, n: usize) -> Result<Box<Expr>, BuildError> {
    Ok(Box::new(expression(nth_rule(node, n)?)?))
}

fn subquery(node: &RuleNode) -> Result<Box<LogicalPlan>, BuildError> {
    Ok(Box::new(query(child(node, Rule::Query)?)?))
}

/// Builds nested binary operators. Operators of equal precedence nest on the
/// left, so the left spine is walked in a loop.
fn binary_chain(node: &RuleNode) -> Result<Expr, BuildError> {
    let mut spine = vec![node];
    let mut leftmost = first_rule(node)?;
    while is_binary(leftmost.rule) {
        spine.push(leftmost);
        leftmost = first_rule(leftmost)?;
    }

    let mut expr = expression(leftmost)?;
    for binary in spine.into_iter().rev() {
        expr = Expr::Binary {
            left: Box::new(expr),
            op: binary_op(binary)?,
            right: operand(binary, 1)?,
        };
    }
    Ok(expr)
}

fn unary(node: &RuleNode) -> Result<Expr, BuildError> {
    let op = match node.rule {
        Rule::LogicalNot => UnaryOp::Not,
        _ => unary_op(node)?,
    };
    Ok(Expr::Unary {
        op,
        operand: operand(node, 0)?,
    })
}

fn predicate(node: &RuleNode) -> Result<Expr, BuildError> {
    let negated = node.has_keyword(Keyword::Not);
    let expr = match node.rule {
        Rule::IsNull => Expr::IsNull {
            expr: operand(node, 0)?,
            negated,
        },
        Rule::Between => Expr::Between {
            expr: operand(node, 0)?,
            low: operand(node, 1)?,
            high: operand(node, 2)?,
            negated,
        },
        Rule::InList => Expr::In {
            expr: operand(node, 0)?,
            list: node
                .rules_of(Rule::Expression)
                .map(expression)
                .collect::<Result<_, _>>()?,
            negated,
        },
        Rule::InSubquery => Expr::InSubquery {
            expr: operand(node, 0)?,
            query: subquery(node)?,
            negated,
        },
        _ => {
            let op = if node.has_keyword(Keyword::Rlike) {
                BinaryOp::RLike
            } else {
                BinaryOp::Like
            };
            let like = Expr::Binary {
                left: operand(node, 0)?,
                op,
                right: operand(node, 1)?,
            };
            if negated {
                Expr::unary(UnaryOp::Not, like)
            } else {
                like
            }
        }
    };
    Ok(expr)
}

/// `a.b` on a column extends the column name; on anything else it is a field
/// access.
fn dereference(node: &RuleNode) -> Result<Expr, BuildError> {
    let field = identifier(child(node, Rule::Identifier)?)?;
    let expr = match expression(first_rule(node)?)? {
        Expr::Column { mut name } => {
            name.push(field);
            Expr::Column { name }
        }
        base => Expr::Dereference {
            expr: Box::new(base),
            field,
        },
    };
    Ok(expr)
}

fn literal(node: &RuleNode) -> Result<Expr, BuildError> {
    let expr = match node.rule {
        Rule::NullLiteral => Expr::null(),
        Rule::BooleanLiteral => Expr::boolean(node.has_keyword(Keyword::True)),
        Rule::NumericLiteral => Expr::Literal(numeric_literal(node)?),
        Rule::StringLiteral => Expr::string(string_literal(node)),
        _ => Expr::Literal(typed_literal(node)?),
    };
    Ok(expr)
}

fn primary(node: &RuleNode) -> Result<Expr, BuildError> {
    let expr = match node.rule {
        Rule::Star => Expr::Star { target: None },
        Rule::QualifiedStar => Expr::Star {
            target: Some(identifiers(child(node, Rule::QualifiedName)?)?),
        },
        Rule::ColumnReference => Expr::Column {
            name: vec![identifier(child(node, Rule::Identifier)?)?],
        },
        Rule::FunctionCall => Expr::Function(function_call(node)?),
        Rule::Cast => Expr::Cast {
            expr: operand(node, 0)?,
            data_type: data_type(data_type_child(node)?)?,
        },
        Rule::Exists => Expr::Exists(subquery(node)?),
        Rule::SubqueryExpression => Expr::Subquery(subquery(node)?),
        Rule::RowConstructor => Expr::Row(
            node.rules_of(Rule::Expression)
                .map(expression)
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(BuildError::Malformed {
                parent: other,
                missing: "expression",
            })
        }
    };
    Ok(expr)
}

/// Returns the operator token of a unary or binary node.
fn operator(node: &RuleNode) -> Result<&Token, BuildError> {
    node.tokens().next().ok_or(BuildError::Malformed {
        parent: node.rule,
        missing: "operator",
    })
}

fn unary_op(node: &RuleNode) -> Result<UnaryOp, BuildError> {
    match operator(node)?.kind {
        TokenKind::Minus => Ok(UnaryOp::Neg),
        TokenKind::Plus => Ok(UnaryOp::Plus),
        TokenKind::BitNot => Ok(UnaryOp::BitNot),
        _ => Err(BuildError::Malformed {
            parent: node.rule,
            missing: "unary operator",
        }),
    }
}

fn binary_op(node: &RuleNode) -> Result<BinaryOp, BuildError> {
    let op = match operator(node)?.kind {
        TokenKind::Keyword(Keyword::And) => BinaryOp::And,
        TokenKind::Keyword(Keyword::Or) => BinaryOp::Or,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NullSafeEq => BinaryOp::NullSafeEq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Concat => BinaryOp::Concat,
        TokenKind::BitAnd => BinaryOp::BitAnd,
        TokenKind::BitOr => BinaryOp::BitOr,
        TokenKind::BitXor => BinaryOp::BitXor,
        _ => {
            return Err(BuildError::Malformed {
                parent: node.rule,
                missing: "binary operator",
            })
        }
    };
    Ok(op)
}

fn function_call(node: &RuleNode) -> Result<FunctionCall, BuildError> {
    let mut parts = identifiers(child(node, Rule::QualifiedName)?)?;
    let name = match parts.len() {
        1 | 2 => {
            let name = parts.pop().unwrap_or_default();
            FunctionIdentifier {
                database: parts.pop(),
                name,
            }
        }
        _ => {
            return Err(BuildError::at(
                format!("Unsupported function name '{}'", parts.join(".")),
                node,
            ))
        }
    };
    let args = node
        .rules_of(Rule::Expression)
        .map(expression)
        .collect::<Result<_, _>>()?;
    Ok(FunctionCall {
        name,
        args,
        distinct: node.has_keyword(Keyword::Distinct),
    })
}

fn case_expression(node: &RuleNode) -> Result<Expr, BuildError> {
    let mut operands = node.rules_of(Rule::Expression);
    let operand = match node.rule {
        Rule::SimpleCase => operands.next().map(expression).transpose()?.map(Box::new),
        _ => None,
    };
    let else_clause = if node.has_keyword(Keyword::Else) {
        operands.last().map(expression).transpose()?.map(Box::new)
    } else {
        None
    };
    let when_clauses = node
        .rules_of(Rule::WhenClause)
        .map(|when| {
            Ok(WhenClause {
                condition: expression(nth_rule(when, 0)?)?,
                result: expression(nth_rule(when, 1)?)?,
            })
        })
        .collect::<Result<_, BuildError>>()?;
    Ok(Expr::Case {
        operand,
        when_clauses,
        else_clause,
    })
}

// -------------------------------------------------------------------------
// Literals
// -------------------------------------------------------------------------

fn numeric_literal(node: &RuleNode) -> Result<Literal, BuildError> {
    let negative = node.token_of(TokenKind::Minus).is_some();
    let token = node
        .tokens()
        .find(|token| token.kind.is_number())
        .ok_or(BuildError::Malformed {
            parent: node.rule,
            missing: "number",
        })?;
    let sign = if negative { "-" } else { "" };
    let text = &token.text;
    let out_of_range = |low: &str, high: &str, type_name: &str, digits: &str| {
        BuildError::at(
            format!(
                "Numeric literal {sign}{digits} does not fit in range [{low}, {high}] \
                 for type {type_name}"
            ),
            node,
        )
    };

    let literal = match token.kind {
        TokenKind::Integer => {
            let value = format!("{sign}{text}");
            if let Ok(n) = value.parse::<i32>() {
                Literal::Int(n)
            } else if let Ok(n) = value.parse::<i64>() {
                Literal::BigInt(n)
            } else {
                Literal::Decimal(value)
            }
        }
        TokenKind::BigInt => {
            let digits = strip_suffix(text, 1);
            format!("{sign}{digits}")
                .parse()
                .map(Literal::BigInt)
                .map_err(|_| BuildError::BigIntOutOfRange(format!("{sign}{digits}")))?
        }
        TokenKind::SmallInt => {
            let digits = strip_suffix(text, 1);
            format!("{sign}{digits}")
                .parse()
                .map(Literal::SmallInt)
                .map_err(|_| out_of_range("-32768", "32767", "smallint", digits))?
        }
        TokenKind::TinyInt => {
            let digits = strip_suffix(text, 1);
            format!("{sign}{digits}")
                .parse()
                .map(Literal::TinyInt)
                .map_err(|_| out_of_range("-128", "127", "tinyint", digits))?
        }
        TokenKind::Double => {
            let digits = if text.ends_with(['d', 'D']) {
                strip_suffix(text, 1)
            } else {
                text.as_str()
            };
            match format!("{sign}{digits}").parse::<f64>() {
                Ok(value) if value.is_finite() => Literal::Double(value),
                _ => {
                    return Err(out_of_range(
                        "-1.7976931348623157E308",
                        "1.7976931348623157E308",
                        "double",
                        digits,
                    ))
                }
            }
        }
        TokenKind::BigDecimal => Literal::Decimal(format!("{sign}{}", strip_suffix(text, 2))),
        _ => Literal::Decimal(format!("{sign}{text}")),
    };
    Ok(literal)
}

fn strip_suffix(text: &str, chars: usize) -> &str {
    let end = text
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map_or(0, |(i, _)| i);
    &text[..end]
}

/// Concatenates the decoded values of adjacent string tokens.
fn string_literal(node: &RuleNode) -> String {
    node.tokens()
        .filter(|token| token.kind == TokenKind::String)
        .map(|token| unescape_string(&token.text))
        .collect()
}

/// Strips the quotes of a string token and decodes its escapes.
pub fn unescape_string(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next();
    chars.next_back();
    let mut out = String::with_capacity(raw.len());
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            '0' => out.push('\0'),
            'b' => out.push('\u{8}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'Z' => out.push('\u{1A}'),
            // Kept escaped so LIKE patterns can match them literally.
            '%' | '_' => {
                out.push('\\');
                out.push(escaped);
            }
            'u' => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        chars.nth(3);
                    }
                    _ => out.push('u'),
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn typed_literal(node: &RuleNode) -> Result<Literal, BuildError> {
    let type_name = identifier(child(node, Rule::Identifier)?)?.to_uppercase();
    let value = string_literal(node);
    match type_name.as_str() {
        "DATE" if is_date(&value) => Ok(Literal::Date(value)),
        "TIMESTAMP" if is_timestamp(&value) => Ok(Literal::Timestamp(value)),
        "DATE" | "TIMESTAMP" => Err(BuildError::at(
            format!("Exception parsing {type_name}"),
            node,
        )),
        "X" => decode_hex(&value)
            .map(Literal::Binary)
            .ok_or_else(|| BuildError::at(format!("Invalid hex value '{value}'"), node)),
        _ => Err(BuildError::at(
            format!("Literals of type '{type_name}' are currently not supported."),
            node,
        )),
    }
}

/// Accepts `yyyy-[m]m-[d]d`.
fn is_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return false;
    };
    let number = |s: &str, max_len: usize| {
        (1..=max_len).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if year.len() != 4 || !number(year, 4) || !number(month, 2) || !number(day, 2) {
        return false;
    }
    let month: u8 = month.parse().unwrap_or(0);
    let day: u8 = day.parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Accepts a date optionally followed by a space or `T` and a time of day.
fn is_timestamp(value: &str) -> bool {
    let Some(at) = value.find([' ', 'T']) else {
        return is_date(value);
    };
    let time = &value[at + 1..];
    is_date(&value[..at])
        && time.split(':').count() <= 3
        && time
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b':' || b == b'.')
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    // An odd number of digits gets an implicit leading zero.
    let padded = if value.len() % 2 == 1 {
        format!("0{value}")
    } else {
        value.to_owned()
    };
    if !padded.is_ascii() {
        return None;
    }
    (0..padded.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&padded[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_escapes() {
        assert_eq!(unescape_string("'plain'"), "plain");
        assert_eq!(unescape_string(r"'a\nb'"), "a\nb");
        assert_eq!(unescape_string(r"'it\'s'"), "it's");
        assert_eq!(unescape_string(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(unescape_string(r"'50\%'"), r"50\%");
        assert_eq!(unescape_string(r"'ABC'"), "ABC");
        assert_eq!(unescape_string(r"'\q'"), "q");
    }

    #[test]
    fn suffix_stripping() {
        assert_eq!(strip_suffix("10L", 1), "10");
        assert_eq!(strip_suffix("1.5BD", 2), "1.5");
    }

    #[test]
    fn date_shapes() {
        assert!(is_date("2016-03-11"));
        assert!(is_date("2016-3-1"));
        assert!(!is_date("2016-13-01"));
        assert!(!is_date("16-03-11"));
        assert!(!is_date("yesterday"));
        assert!(is_timestamp("2016-03-11 20:54:00.000"));
        assert!(is_timestamp("2016-03-11"));
        assert!(!is_timestamp("2016-03-11 noon"));
    }

    #[test]
    fn hex_decoding() {
        assert_eq!(decode_hex("1F"), Some(vec![0x1F]));
        assert_eq!(decode_hex("abc"), Some(vec![0x0A, 0xBC]));
        assert_eq!(decode_hex(""), Some(vec![]));
        assert_eq!(decode_hex("ZZ"), None);
    }
}
