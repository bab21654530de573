//! Tests for parse-tree post-processing, driving the parser directly.

use oxide_sql_frontend::lexer::{CaseFoldingStream, InputStream, Lexer, Span, Token, TokenKind};
use oxide_sql_frontend::parser::{
    ParseTree, Parser, PostProcessor, Rule, RuleNode, SyntaxErrorTranslator, TokenStream,
};

fn parser(sql: &str, post_process: bool) -> Parser<CaseFoldingStream<InputStream<'_>>> {
    let mut lexer = Lexer::new(CaseFoldingStream::new(InputStream::new(sql)));
    lexer.set_error_listener(Box::new(SyntaxErrorTranslator));
    let mut parser = Parser::new(TokenStream::new(lexer));
    parser.set_error_listener(Box::new(SyntaxErrorTranslator));
    if post_process {
        parser.add_tree_listener(Box::new(PostProcessor::new()));
    }
    parser
}

/// Parses `sql` as a table identifier and returns its `identifier` nodes.
fn identifiers(sql: &str, post_process: bool) -> Vec<RuleNode> {
    let tree = parser(sql, post_process)
        .single_table_identifier()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));
    let table = tree
        .rule_of(Rule::TableIdentifier)
        .expect("table identifier node");
    table.rules_of(Rule::Identifier).cloned().collect()
}

/// Returns the single token an `identifier` node was reduced to.
fn only_token(node: &RuleNode) -> &Token {
    match node.children.as_slice() {
        [ParseTree::Terminal(token)] => token,
        other => panic!("Expected a single token, got {other:?}"),
    }
}

#[test]
fn quoted_identifier_becomes_plain_identifier() {
    let ids = identifiers("`a``b`", true);
    let token = only_token(&ids[0]);
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.text, "a`b");
    assert_eq!(token.span, Span::new(1, 5));
    assert_eq!(token.column, 1);
}

#[test]
fn quoted_identifier_position_on_later_line() {
    let ids = identifiers("db\n.\n  `t`", true);
    let token = only_token(&ids[1]);
    assert_eq!(token.text, "t");
    assert_eq!(token.line, 3);
    assert_eq!(token.column, 3);
    assert_eq!(token.span, Span::new(8, 9));
}

#[test]
fn non_reserved_keyword_becomes_identifier() {
    let ids = identifiers("Comment", true);
    let token = only_token(&ids[0]);
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.text, "Comment");
    assert_eq!(token.span, Span::new(0, 7));
}

#[test]
fn plain_identifier_is_untouched() {
    let ids = identifiers("orders", true);
    let token = only_token(&ids[0]);
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.text, "orders");
}

#[test]
fn without_post_processing_the_nodes_remain() {
    let ids = identifiers("`a`.comment", false);
    let quoted = ids[0].rule_of(Rule::QuotedIdentifier).expect("quoted node");
    assert_eq!(quoted.first_token().map(|t| t.text.as_str()), Some("`a`"));
    assert!(ids[1].rule_of(Rule::NonReserved).is_some());
}

#[test]
fn post_processing_applies_inside_expressions() {
    let tree = parser("SELECT `x y` AS first FROM t", true)
        .single_statement()
        .unwrap_or_else(|e| panic!("{e:?}"));
    let leaves = tree.leaves();
    let texts: Vec<&str> = leaves.iter().map(|t| t.text.as_str()).collect();
    assert!(texts.contains(&"x y"), "{texts:?}");
    assert!(leaves
        .iter()
        .filter(|t| t.text == "x y" || t.text == "first")
        .all(|t| t.kind == TokenKind::Identifier));
}

#[test]
fn case_folding_does_not_change_token_text() {
    let mut parser = parser("select MixedCase from T", true);
    let tree = parser.single_statement().unwrap_or_else(|e| panic!("{e:?}"));
    assert_eq!(tree.text(), "select MixedCase from T");
    assert_eq!(
        tree.first_token().map(|t| t.kind),
        Some(TokenKind::Keyword(oxide_sql_frontend::lexer::Keyword::Select))
    );
}
