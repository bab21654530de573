//! Pratt expression parser for operator precedence.

use super::prediction::{Decision, PResult};
use super::recognizer::{Alternative, Parser};
use super::tree::Rule;
use crate::lexer::{CharStream, Keyword, TokenKind};

/// Binding power of prefix `NOT`. Looser than predicates, tighter than AND.
const NOT_BP: u8 = 5;

/// Binding power of unary `-`, `+` and `~`.
const UNARY_BP: u8 = 19;

/// Right binding power of predicate operands.
const PREDICATE_BP: u8 = 8;

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: `left_bp < right_bp`
///
/// `next` is only inspected after `NOT`, which is an infix operator when it
/// negates a predicate (`a NOT IN (...)`).
///
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub const fn infix_binding_power(kind: TokenKind, next: TokenKind) -> Option<(u8, u8)> {
    match kind {
        // Logical OR (lowest precedence)
        TokenKind::Keyword(Keyword::Or) => Some((1, 2)),

        // Logical AND
        TokenKind::Keyword(Keyword::And) => Some((3, 4)),

        // Comparisons and predicates
        TokenKind::Eq
        | TokenKind::NullSafeEq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq
        | TokenKind::Keyword(
            Keyword::Is | Keyword::In | Keyword::Between | Keyword::Like | Keyword::Rlike,
        ) => Some((7, 8)),
        TokenKind::Keyword(Keyword::Not) => match next {
            TokenKind::Keyword(
                Keyword::In | Keyword::Between | Keyword::Like | Keyword::Rlike,
            ) => Some((7, 8)),
            _ => None,
        },

        // Bitwise
        TokenKind::BitOr => Some((9, 10)),
        TokenKind::BitXor => Some((11, 12)),
        TokenKind::BitAnd => Some((13, 14)),

        // Additive (string concat has same precedence as addition)
        TokenKind::Plus | TokenKind::Minus | TokenKind::Concat => Some((15, 16)),

        // Multiplicative
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((17, 18)),

        _ => None,
    }
}

/// Returns the node label for a plain binary operator.
const fn binary_rule(kind: TokenKind) -> Rule {
    match kind {
        TokenKind::Keyword(Keyword::Or | Keyword::And) => Rule::LogicalBinary,
        TokenKind::Eq
        | TokenKind::NullSafeEq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Rule::Comparison,
        _ => Rule::ArithmeticBinary,
    }
}

impl<S: CharStream> Parser<S> {
    /// expression : booleanExpression
    pub(crate) fn expression(&mut self) -> PResult<()> {
        self.rule(Rule::Expression, |p| p.expression_bp(0))
    }

    fn expression_bp(&mut self, min_bp: u8) -> PResult<()> {
        match self.kind(1)? {
            TokenKind::Keyword(Keyword::Not) => self.rule(Rule::LogicalNot, |p| {
                p.consume()?;
                p.expression_bp(NOT_BP)
            })?,
            TokenKind::Minus if self.kind(2)?.is_number() => self.numeric_literal()?,
            TokenKind::Minus | TokenKind::Plus | TokenKind::BitNot => {
                self.rule(Rule::ArithmeticUnary, |p| {
                    p.consume()?;
                    p.expression_bp(UNARY_BP)
                })?;
            }
            _ => self.primary_expression()?,
        }

        loop {
            let kind = self.kind(1)?;

            // Postfix operators bind tighter than anything else.
            match kind {
                TokenKind::Dot => {
                    self.wrap_last(Rule::Dereference);
                    self.consume()?;
                    self.identifier()?;
                    self.close();
                    continue;
                }
                TokenKind::LeftBracket => {
                    self.wrap_last(Rule::Subscript);
                    self.consume()?;
                    self.expression()?;
                    self.expect(TokenKind::RightBracket)?;
                    self.close();
                    continue;
                }
                _ => {}
            }

            let next = if kind == TokenKind::Keyword(Keyword::Not) {
                self.kind(2)?
            } else {
                TokenKind::Eof
            };
            let Some((l_bp, r_bp)) = infix_binding_power(kind, next) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            match kind {
                TokenKind::Keyword(Keyword::Is) => {
                    self.wrap_last(Rule::IsNull);
                    self.consume()?;
                    self.accept_keyword(Keyword::Not)?;
                    self.expect_keyword(Keyword::Null)?;
                    self.close();
                }
                TokenKind::Keyword(
                    Keyword::Not | Keyword::In | Keyword::Between | Keyword::Like | Keyword::Rlike,
                ) => self.predicate()?,
                _ => {
                    self.wrap_last(binary_rule(kind));
                    self.consume()?;
                    self.expression_bp(r_bp)?;
                    self.close();
                }
            }
        }
        Ok(())
    }

    /// predicate : NOT? BETWEEN lower AND upper
    ///           | NOT? IN '(' expression (',' expression)* ')'
    ///           | NOT? IN '(' query ')'
    ///           | NOT? (LIKE | RLIKE) pattern
    fn predicate(&mut self) -> PResult<()> {
        let negated = self.at_keyword(Keyword::Not)?;
        let operator = self.kind(if negated { 2 } else { 1 })?;
        match operator {
            TokenKind::Keyword(Keyword::Between) => {
                self.wrap_last(Rule::Between);
                self.accept_keyword(Keyword::Not)?;
                self.consume()?;
                self.expression_bp(PREDICATE_BP)?;
                self.expect_keyword(Keyword::And)?;
                self.expression_bp(PREDICATE_BP)?;
            }
            TokenKind::Keyword(Keyword::In) => {
                self.wrap_last(Rule::InList);
                self.accept_keyword(Keyword::Not)?;
                self.consume()?;
                let alts: [Alternative<S>; 2] = [Self::subquery, Self::expression_list];
                if self.predict(Decision::InPredicate, &alts)? == 0 {
                    self.relabel(Rule::InSubquery);
                    self.subquery()?;
                } else {
                    self.expression_list()?;
                }
            }
            _ => {
                self.wrap_last(Rule::Like);
                self.accept_keyword(Keyword::Not)?;
                if !matches!(
                    self.kind(1)?,
                    TokenKind::Keyword(Keyword::Like | Keyword::Rlike)
                ) {
                    return Err(self.mismatch(&[
                        TokenKind::Keyword(Keyword::Like),
                        TokenKind::Keyword(Keyword::Rlike),
                    ]));
                }
                self.consume()?;
                self.expression_bp(PREDICATE_BP)?;
            }
        }
        self.close();
        Ok(())
    }

    /// '(' query ')'
    fn subquery(&mut self) -> PResult<()> {
        self.expect(TokenKind::LeftParen)?;
        self.query()?;
        self.expect(TokenKind::RightParen)
    }

    /// '(' expression (',' expression)* ')'
    fn expression_list(&mut self) -> PResult<()> {
        self.expect(TokenKind::LeftParen)?;
        self.expression()?;
        while self.accept(TokenKind::Comma)? {
            self.expression()?;
        }
        self.expect(TokenKind::RightParen)
    }

    fn primary_expression(&mut self) -> PResult<()> {
        match self.kind(1)? {
            TokenKind::Keyword(Keyword::Null) => self.rule(Rule::NullLiteral, Self::consume),
            TokenKind::Keyword(Keyword::True | Keyword::False) => {
                self.rule(Rule::BooleanLiteral, Self::consume)
            }
            kind if kind.is_number() => self.numeric_literal(),
            TokenKind::String => self.rule(Rule::StringLiteral, |p| {
                p.consume()?;
                while p.at(TokenKind::String)? {
                    p.consume()?;
                }
                Ok(())
            }),
            TokenKind::Star => self.rule(Rule::Star, Self::consume),
            TokenKind::Keyword(Keyword::Case) => self.case_expression(),
            TokenKind::Keyword(Keyword::Cast) => self.rule(Rule::Cast, |p| {
                p.consume()?;
                p.expect(TokenKind::LeftParen)?;
                p.expression()?;
                p.expect_keyword(Keyword::As)?;
                p.data_type()?;
                p.expect(TokenKind::RightParen)
            }),
            TokenKind::Keyword(Keyword::Exists) => self.rule(Rule::Exists, |p| {
                p.consume()?;
                p.subquery()
            }),
            TokenKind::LeftParen => {
                let alts: [Alternative<S>; 2] = [Self::subquery, Self::expression_list];
                if self.predict(Decision::ParenthesizedExpression, &alts)? == 0 {
                    self.rule(Rule::SubqueryExpression, Self::subquery)
                } else {
                    self.rule(Rule::Parenthesized, |p| {
                        p.expect(TokenKind::LeftParen)?;
                        p.expression()?;
                        if p.at(TokenKind::Comma)? {
                            p.relabel(Rule::RowConstructor);
                            while p.accept(TokenKind::Comma)? {
                                p.expression()?;
                            }
                        }
                        p.expect(TokenKind::RightParen)
                    })
                }
            }
            kind if kind.is_identifier_like() => {
                let alts: [Alternative<S>; 4] = [
                    Self::qualified_star,
                    Self::function_call_prefix,
                    Self::typed_literal,
                    Self::identifier,
                ];
                match self.predict(Decision::PrimaryExpression, &alts)? {
                    0 => self.rule(Rule::QualifiedStar, Self::qualified_star),
                    1 => self.rule(Rule::FunctionCall, Self::function_call),
                    2 => self.rule(Rule::TypeConstructor, Self::typed_literal),
                    _ => self.rule(Rule::ColumnReference, Self::identifier),
                }
            }
            _ => Err(self.no_viable()),
        }
    }

    /// `number : MINUS? (INTEGER_VALUE | DECIMAL_VALUE | ...)`
    fn numeric_literal(&mut self) -> PResult<()> {
        self.rule(Rule::NumericLiteral, |p| {
            p.accept(TokenKind::Minus)?;
            if p.kind(1)?.is_number() {
                p.consume()
            } else {
                Err(p.no_viable())
            }
        })
    }

    /// qualifiedName '.' '*'
    fn qualified_star(&mut self) -> PResult<()> {
        self.qualified_name()?;
        self.expect(TokenKind::Dot)?;
        self.expect(TokenKind::Star)
    }

    /// qualifiedName '('
    fn function_call_prefix(&mut self) -> PResult<()> {
        self.qualified_name()?;
        self.expect(TokenKind::LeftParen)
    }

    /// qualifiedName '(' (ALL | DISTINCT)? (expression (',' expression)*)? ')'
    fn function_call(&mut self) -> PResult<()> {
        self.function_call_prefix()?;
        if !self.accept_keyword(Keyword::Distinct)? {
            self.accept_keyword(Keyword::All)?;
        }
        if !self.at(TokenKind::RightParen)? {
            self.expression()?;
            while self.accept(TokenKind::Comma)? {
                self.expression()?;
            }
        }
        self.expect(TokenKind::RightParen)
    }

    /// identifier STRING
    fn typed_literal(&mut self) -> PResult<()> {
        self.identifier()?;
        self.expect(TokenKind::String)
    }

    /// CASE expression? (WHEN expression THEN expression)+ (ELSE expression)? END
    fn case_expression(&mut self) -> PResult<()> {
        self.rule(Rule::SearchedCase, |p| {
            p.expect_keyword(Keyword::Case)?;
            if !p.at_keyword(Keyword::When)? {
                p.relabel(Rule::SimpleCase);
                p.expression()?;
            }
            loop {
                p.rule(Rule::WhenClause, |p| {
                    p.expect_keyword(Keyword::When)?;
                    p.expression()?;
                    p.expect_keyword(Keyword::Then)?;
                    p.expression()
                })?;
                if !p.at_keyword(Keyword::When)? {
                    break;
                }
            }
            if p.accept_keyword(Keyword::Else)? {
                p.expression()?;
            }
            p.expect_keyword(Keyword::End)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(kind: TokenKind) -> Option<(u8, u8)> {
        infix_binding_power(kind, TokenKind::Eof)
    }

    #[test]
    fn precedence_order() {
        let or = bp(TokenKind::Keyword(Keyword::Or)).unwrap();
        let and = bp(TokenKind::Keyword(Keyword::And)).unwrap();
        let eq = bp(TokenKind::Eq).unwrap();
        let bit_or = bp(TokenKind::BitOr).unwrap();
        let add = bp(TokenKind::Plus).unwrap();
        let mul = bp(TokenKind::Star).unwrap();
        assert!(or.0 < and.0);
        assert!(and.0 < NOT_BP && NOT_BP < eq.0);
        assert!(eq.0 < bit_or.0);
        assert!(bit_or.0 < add.0);
        assert!(add.0 < mul.0);
        assert!(mul.1 < UNARY_BP);
    }

    #[test]
    fn not_is_infix_only_before_a_predicate() {
        let not = TokenKind::Keyword(Keyword::Not);
        assert_eq!(infix_binding_power(not, TokenKind::Keyword(Keyword::In)), Some((7, 8)));
        assert_eq!(infix_binding_power(not, TokenKind::Keyword(Keyword::Like)), Some((7, 8)));
        assert_eq!(infix_binding_power(not, TokenKind::Keyword(Keyword::Null)), None);
        assert_eq!(bp(not), None);
    }

    #[test]
    fn non_operators() {
        assert_eq!(bp(TokenKind::Comma), None);
        assert_eq!(bp(TokenKind::Keyword(Keyword::From)), None);
        assert_eq!(bp(TokenKind::Identifier), None);
    }

    #[test]
    fn labels() {
        assert_eq!(binary_rule(TokenKind::Keyword(Keyword::And)), Rule::LogicalBinary);
        assert_eq!(binary_rule(TokenKind::NullSafeEq), Rule::Comparison);
        assert_eq!(binary_rule(TokenKind::Concat), Rule::ArithmeticBinary);
    }
}
