//! Tests for expression parsing: operators and precedence, predicates,
//! literals, function calls, CASE, CAST and postfix access.

mod common;
use common::*;

use oxide_sql_frontend::ast::{
    BinaryOp, DataType, Expr, FunctionCall, FunctionIdentifier, Literal, LogicalPlan, UnaryOp,
    WhenClause,
};
use oxide_sql_frontend::Origin;

fn col(name: &str) -> Expr {
    Expr::column(name)
}

fn lit(expr: &Expr) -> &Literal {
    match expr {
        Expr::Literal(literal) => literal,
        other => panic!("Expected literal, got {other:?}"),
    }
}

// ===================================================================
// Operators and precedence
// ===================================================================

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        expr("1 + 2 * 3"),
        Expr::int(1).binary(
            BinaryOp::Add,
            Expr::int(2).binary(BinaryOp::Mul, Expr::int(3))
        )
    );
}

#[test]
fn arithmetic_is_left_associative() {
    assert_eq!(
        expr("a - b - c"),
        col("a")
            .binary(BinaryOp::Sub, col("b"))
            .binary(BinaryOp::Sub, col("c"))
    );
}

#[test]
fn logical_precedence() {
    assert_eq!(
        expr("a = 1 AND b > 2 OR NOT c"),
        col("a")
            .eq(Expr::int(1))
            .and(col("b").gt(Expr::int(2)))
            .or(Expr::unary(UnaryOp::Not, col("c")))
    );
}

#[test]
fn not_binds_looser_than_comparison() {
    assert_eq!(
        expr("NOT a = b"),
        Expr::unary(UnaryOp::Not, col("a").eq(col("b")))
    );
}

#[test]
fn bitwise_precedence() {
    assert_eq!(
        expr("a & b | c ^ d"),
        col("a").binary(BinaryOp::BitAnd, col("b")).binary(
            BinaryOp::BitOr,
            col("c").binary(BinaryOp::BitXor, col("d"))
        )
    );
}

#[test]
fn comparison_spellings() {
    let cases = [
        ("a = b", BinaryOp::Eq),
        ("a == b", BinaryOp::Eq),
        ("a <=> b", BinaryOp::NullSafeEq),
        ("a <> b", BinaryOp::NotEq),
        ("a != b", BinaryOp::NotEq),
        ("a < b", BinaryOp::Lt),
        ("a <= b", BinaryOp::LtEq),
        ("a >= b", BinaryOp::GtEq),
        ("a || b", BinaryOp::Concat),
        ("a % b", BinaryOp::Mod),
    ];
    for (sql, op) in cases {
        assert_eq!(expr(sql), col("a").binary(op, col("b")), "{sql}");
    }
}

#[test]
fn unary_operators() {
    assert_eq!(expr("- a"), Expr::unary(UnaryOp::Neg, col("a")));
    assert_eq!(expr("+a"), Expr::unary(UnaryOp::Plus, col("a")));
    assert_eq!(expr("~a"), Expr::unary(UnaryOp::BitNot, col("a")));
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(expr("a and b"), expr("a AND b"));
    assert_eq!(
        expr("x is not null"),
        Expr::IsNull {
            expr: Box::new(col("x")),
            negated: true
        }
    );
}

#[test]
fn identifiers_keep_their_casing() {
    assert_eq!(expr("MyColumn"), col("MyColumn"));
}

// ===================================================================
// Predicates
// ===================================================================

#[test]
fn is_null() {
    assert_eq!(
        expr("x IS NULL"),
        Expr::IsNull {
            expr: Box::new(col("x")),
            negated: false
        }
    );
    assert!(matches!(
        expr("x IS NOT NULL"),
        Expr::IsNull { negated: true, .. }
    ));
}

#[test]
fn in_list() {
    assert_eq!(
        expr("x NOT IN (1, 2)"),
        Expr::In {
            expr: Box::new(col("x")),
            list: vec![Expr::int(1), Expr::int(2)],
            negated: true
        }
    );
}

#[test]
fn in_subquery() {
    let Expr::InSubquery {
        expr: operand,
        query,
        negated,
    } = expr("a IN (SELECT b FROM t)")
    else {
        panic!("Expected IN subquery");
    };
    assert_eq!(*operand, col("a"));
    assert!(!negated);
    assert_eq!(*query, LogicalPlan::table("t").project(vec![col("b")]));
}

#[test]
fn between() {
    assert_eq!(
        expr("x BETWEEN 1 AND 10"),
        Expr::Between {
            expr: Box::new(col("x")),
            low: Box::new(Expr::int(1)),
            high: Box::new(Expr::int(10)),
            negated: false
        }
    );
}

#[test]
fn between_inside_conjunction() {
    assert_eq!(
        expr("x NOT BETWEEN 1 AND 2 AND y"),
        Expr::Between {
            expr: Box::new(col("x")),
            low: Box::new(Expr::int(1)),
            high: Box::new(Expr::int(2)),
            negated: true
        }
        .and(col("y"))
    );
}

#[test]
fn like_and_rlike() {
    assert_eq!(
        expr("name LIKE 'a%'"),
        col("name").binary(BinaryOp::Like, Expr::string("a%"))
    );
    assert_eq!(
        expr("name NOT RLIKE 'x'"),
        Expr::unary(
            UnaryOp::Not,
            col("name").binary(BinaryOp::RLike, Expr::string("x"))
        )
    );
}

#[test]
fn exists() {
    assert_eq!(
        expr("EXISTS (SELECT 1)"),
        Expr::Exists(Box::new(
            LogicalPlan::OneRowRelation.project(vec![Expr::int(1)])
        ))
    );
}

// ===================================================================
// Literals
// ===================================================================

#[test]
fn constant_literals() {
    assert_eq!(expr("NULL"), Expr::null());
    assert_eq!(expr("true"), Expr::boolean(true));
    assert_eq!(expr("FALSE"), Expr::boolean(false));
}

#[test]
fn integer_literals_widen_by_magnitude() {
    assert_eq!(lit(&expr("42")), &Literal::Int(42));
    assert_eq!(lit(&expr("-5")), &Literal::Int(-5));
    assert_eq!(lit(&expr("-2147483648")), &Literal::Int(i32::MIN));
    assert_eq!(lit(&expr("2147483648")), &Literal::BigInt(2_147_483_648));
    assert_eq!(
        lit(&expr("99999999999999999999")),
        &Literal::Decimal("99999999999999999999".to_owned())
    );
}

#[test]
fn suffixed_integer_literals() {
    assert_eq!(lit(&expr("10L")), &Literal::BigInt(10));
    assert_eq!(lit(&expr("7S")), &Literal::SmallInt(7));
    assert_eq!(lit(&expr("1Y")), &Literal::TinyInt(1));
    assert_eq!(lit(&expr("-128Y")), &Literal::TinyInt(-128));
}

#[test]
fn suffixed_literal_out_of_range() {
    let err = expr_err("200Y");
    assert_eq!(
        err.message,
        "Numeric literal 200 does not fit in range [-128, 127] for type tinyint"
    );
    assert_eq!(err.start, Origin::new(1, 0));

    let err = expr_err("40000S");
    assert!(err.message.ends_with("for type smallint"), "{}", err.message);
}

#[test]
fn bigint_out_of_range_has_no_position() {
    let err = expr_err("9223372036854775808L");
    assert_eq!(
        err.message,
        "Numeric literal 9223372036854775808 does not fit in range \
         [-9223372036854775808, 9223372036854775807] for type bigint"
    );
    assert!(err.start.is_unknown());
    assert_eq!(err.command(), Some("9223372036854775808L"));
}

#[test]
fn fractional_literals() {
    assert_eq!(lit(&expr("1.5")), &Literal::Decimal("1.5".to_owned()));
    assert_eq!(lit(&expr("1.5D")), &Literal::Double(1.5));
    assert_eq!(lit(&expr("1E3")), &Literal::Double(1000.0));
    assert_eq!(lit(&expr("1.5BD")), &Literal::Decimal("1.5".to_owned()));
    assert_eq!(lit(&expr("-0.25")), &Literal::Decimal("-0.25".to_owned()));
}

#[test]
fn adjacent_strings_concatenate() {
    assert_eq!(expr("'a' 'b'"), Expr::string("ab"));
}

#[test]
fn string_escapes() {
    assert_eq!(expr(r"'it\'s'"), Expr::string("it's"));
    assert_eq!(expr(r"'a\tb\n'"), Expr::string("a\tb\n"));
    assert_eq!(expr(r"'\u0041'"), Expr::string("A"));
    assert_eq!(expr(r"'100\%'"), Expr::string(r"100\%"));
}

#[test]
fn double_quoted_text_is_a_string_by_default() {
    assert_eq!(expr("\"x\""), Expr::string("x"));
}

#[test]
fn typed_literals() {
    assert_eq!(
        lit(&expr("DATE '2020-01-01'")),
        &Literal::Date("2020-01-01".to_owned())
    );
    assert_eq!(
        lit(&expr("timestamp '2020-01-01 10:11:12'")),
        &Literal::Timestamp("2020-01-01 10:11:12".to_owned())
    );
    assert_eq!(lit(&expr("X'1F'")), &Literal::Binary(vec![0x1f]));
    assert_eq!(lit(&expr("x'abc'")), &Literal::Binary(vec![0x0a, 0xbc]));
}

#[test]
fn malformed_typed_literals() {
    assert_eq!(expr_err("DATE 'nope'").message, "Exception parsing DATE");
    assert_eq!(expr_err("X'zz'").message, "Invalid hex value 'zz'");

    let err = expr_err("FOO 'x'");
    assert_eq!(
        err.message,
        "Literals of type 'FOO' are currently not supported."
    );
    assert_eq!(err.start, Origin::new(1, 0));
}

// ===================================================================
// Functions, CASE and CAST
// ===================================================================

#[test]
fn function_calls() {
    assert_eq!(
        expr("coalesce(a, 0)"),
        Expr::call("coalesce", vec![col("a"), Expr::int(0)])
    );
    assert_eq!(expr("now()"), Expr::call("now", vec![]));
}

#[test]
fn count_star_and_distinct() {
    assert_eq!(
        expr("count(*)"),
        Expr::call("count", vec![Expr::Star { target: None }])
    );
    assert_eq!(
        expr("count(DISTINCT a)"),
        Expr::Function(FunctionCall {
            name: FunctionIdentifier::new("count"),
            args: vec![col("a")],
            distinct: true
        })
    );
}

#[test]
fn qualified_function_name() {
    let Expr::Function(call) = expr("db.fn(1)") else {
        panic!("Expected function call");
    };
    assert_eq!(call.name, FunctionIdentifier::qualified("db", "fn"));
}

#[test]
fn function_name_with_too_many_parts() {
    let err = expr_err("a.b.c(1)");
    assert_eq!(err.message, "Unsupported function name 'a.b.c'");
    assert_eq!(err.start, Origin::new(1, 0));
}

#[test]
fn searched_case() {
    assert_eq!(
        expr("CASE WHEN a THEN 1 ELSE 2 END"),
        Expr::Case {
            operand: None,
            when_clauses: vec![WhenClause {
                condition: col("a"),
                result: Expr::int(1)
            }],
            else_clause: Some(Box::new(Expr::int(2)))
        }
    );
}

#[test]
fn simple_case() {
    let Expr::Case {
        operand,
        when_clauses,
        else_clause,
    } = expr("CASE a WHEN 1 THEN 'x' WHEN 2 THEN 'y' END")
    else {
        panic!("Expected CASE");
    };
    assert_eq!(operand, Some(Box::new(col("a"))));
    assert_eq!(when_clauses.len(), 2);
    assert_eq!(when_clauses[1].result, Expr::string("y"));
    assert!(else_clause.is_none());
}

#[test]
fn cast() {
    assert_eq!(
        expr("CAST(a AS DECIMAL(10, 2))"),
        Expr::Cast {
            expr: Box::new(col("a")),
            data_type: DataType::Decimal {
                precision: 10,
                scale: 2
            }
        }
    );
}

// ===================================================================
// Columns, stars and postfix access
// ===================================================================

#[test]
fn qualified_columns() {
    assert_eq!(expr("t.a"), Expr::qualified_column("t", "a"));
    assert_eq!(
        expr("db.t.a"),
        Expr::Column {
            name: vec!["db".to_owned(), "t".to_owned(), "a".to_owned()]
        }
    );
}

#[test]
fn qualified_star() {
    assert_eq!(
        expr("t.*"),
        Expr::Star {
            target: Some(vec!["t".to_owned()])
        }
    );
}

#[test]
fn subscript_and_dereference() {
    assert_eq!(
        expr("arr[0]"),
        Expr::Subscript {
            expr: Box::new(col("arr")),
            index: Box::new(Expr::int(0))
        }
    );
    assert_eq!(
        expr("f(x).field"),
        Expr::Dereference {
            expr: Box::new(Expr::call("f", vec![col("x")])),
            field: "field".to_owned()
        }
    );
}

#[test]
fn parentheses_rows_and_subqueries() {
    assert_eq!(expr("(a)"), col("a"));
    assert_eq!(expr("(1, 2)"), Expr::Row(vec![Expr::int(1), Expr::int(2)]));
    assert_eq!(
        expr("(SELECT 1)"),
        Expr::Subquery(Box::new(
            LogicalPlan::OneRowRelation.project(vec![Expr::int(1)])
        ))
    );
}

// ===================================================================
// Aliases
// ===================================================================

#[test]
fn aliases() {
    assert_eq!(
        expr("a + 1 AS b"),
        col("a").binary(BinaryOp::Add, Expr::int(1)).alias("b")
    );
    assert_eq!(expr("a b"), col("a").alias("b"));
    assert_eq!(expr("a AS `my col`"), col("a").alias("my col"));
    assert_eq!(expr("a AS comment"), col("a").alias("comment"));
}

// ===================================================================
// Errors
// ===================================================================

#[test]
fn dangling_operator() {
    let err = expr_err("1 + ");
    assert_eq!(err.message, "no viable alternative at input '<EOF>'");
    assert_eq!(err.start, Origin::new(1, 4));
}

#[test]
fn trailing_tokens() {
    let err = expr_err("a b c");
    assert_eq!(err.message, "mismatched input 'c' expecting <EOF>");
    assert_eq!(err.start, Origin::new(1, 4));
}
