//! Tests for the adaptive parse: approximate prediction with an exact
//! retry must agree with exact prediction on every input.

mod common;
use common::*;

use oxide_sql_frontend::{ParserConfig, SqlParser};

/// Inputs that need more lookahead than the approximate budget allows.
const DEEP: &[&str] = &[
    "SELECT ((SELECT 1))",
    "SELECT * FROM ((SELECT 1)) t",
    "SELECT * FROM ((a JOIN b ON a.x = b.x))",
    "INSERT INTO t (a, b) SELECT x, y FROM s",
    "SELECT db.tbl.col.field FROM t",
    "SELECT a.b.* FROM t",
    "SELECT x FROM t WHERE (a, b, c) IN ((1, 2, 3))",
];

/// Inputs the approximate mode settles on its own.
const SHALLOW: &[&str] = &[
    "SELECT a FROM t",
    "SELECT a FROM t WHERE b IN (1, 2, 3)",
    "SELECT count(*) FROM t GROUP BY a",
    "VALUES (1), (2)",
];

/// Inputs that fail in both modes.
const BROKEN: &[&str] = &[
    "SELECT ((SELECT 1) FROM t",
    "SELECT * FROM ((SELECT 1) t",
    "INSERT INTO t (a, b",
    "SELECT a.b.",
];

#[test]
fn adaptive_matches_exact_on_deep_inputs() {
    for sql in DEEP {
        assert_same_as_exact(sql);
        assert!(parser().parse_plan(sql).is_ok(), "{sql}");
    }
}

#[test]
fn adaptive_matches_exact_on_shallow_inputs() {
    for sql in SHALLOW {
        assert_same_as_exact(sql);
    }
}

#[test]
fn adaptive_matches_exact_on_errors() {
    for sql in BROKEN {
        assert_same_as_exact(sql);
        assert!(parser().parse_plan(sql).is_err(), "{sql}");
    }
}

#[test]
fn any_lookahead_budget_gives_the_same_result() {
    for sql in DEEP.iter().chain(SHALLOW).chain(BROKEN) {
        let expected = exact_parser().parse_plan(sql);
        for tokens in [0, 1, 2, 8, 64] {
            let p = SqlParser::new(ParserConfig::DEFAULT.with_sll_lookahead(tokens));
            assert_eq!(p.parse_plan(sql), expected, "{sql} with lookahead {tokens}");
        }
    }
}

#[test]
fn parsing_is_repeatable() {
    let p = parser();
    for sql in DEEP {
        assert_eq!(p.parse_plan(sql), p.parse_plan(sql), "{sql}");
    }
}

#[test]
fn parser_is_shared_across_threads() {
    let p = parser();
    std::thread::scope(|scope| {
        for sql in DEEP {
            let p = &p;
            scope.spawn(move || {
                assert!(p.parse_plan(sql).is_ok(), "{sql}");
            });
        }
    });
}

#[test]
fn deep_expressions_fall_back_too() {
    let p = parser();
    let exact = exact_parser();
    for sql in ["((((1))))", "a.b.c.d", "f(g(h(1)))", "x IN ((1, 2), (3, 4))"] {
        assert_eq!(p.parse_expression(sql), exact.parse_expression(sql), "{sql}");
        assert!(p.parse_expression(sql).is_ok(), "{sql}");
    }
}
