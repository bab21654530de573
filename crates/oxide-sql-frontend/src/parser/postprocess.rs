//! Rewrites applied to the parse tree while it is built.

use tracing::trace;

use super::tree::{ParseTree, Rule, RuleNode, TreeListener};
use crate::lexer::{Token, TokenKind};

/// Replaces single-token identifier rules with plain identifier tokens.
///
/// - A quoted identifier becomes an identifier whose text has the delimiters
///   stripped and each doubled delimiter collapsed, with its span shrunk by
///   one delimiter on each side.
/// - A non-reserved keyword used as a name becomes an identifier with the
///   same text and span.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostProcessor;

impl PostProcessor {
    /// Creates the post-processor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn only_token(node: &RuleNode) -> Option<&Token> {
        match node.children.as_slice() {
            [ParseTree::Terminal(token)] => Some(token),
            _ => None,
        }
    }

    fn unquote(token: &Token) -> Option<Token> {
        let delimiter = token.text.chars().next()?;
        let width = delimiter.len_utf8();
        let inner = token
            .text
            .get(width..token.text.len().saturating_sub(width))
            .unwrap_or_default();
        let mut doubled = String::with_capacity(2 * width);
        doubled.push(delimiter);
        doubled.push(delimiter);
        let text = inner.replace(&doubled, &delimiter.to_string());

        let mut replacement = Token::new(
            TokenKind::Identifier,
            text,
            token.span.shrink(width),
            token.line,
            token.column + 1,
        );
        replacement.channel = token.channel;
        Some(replacement)
    }

    fn reclassify(token: &Token) -> Token {
        let mut replacement = token.clone();
        replacement.kind = TokenKind::Identifier;
        replacement
    }
}

impl TreeListener for PostProcessor {
    fn exit_rule(&self, node: &RuleNode) -> Option<Token> {
        let replacement = match node.rule {
            Rule::QuotedIdentifier => Self::unquote(Self::only_token(node)?)?,
            Rule::NonReserved => Self::reclassify(Self::only_token(node)?),
            _ => return None,
        };
        trace!(rule = ?node.rule, text = %replacement.text, "replacing node with identifier");
        Some(replacement)
    }
}
