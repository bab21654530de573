//! Types shared by the adaptive prediction machinery.

use core::fmt;

use super::error::ParseError;

/// How alternatives are chosen at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionMode {
    /// Approximate prediction with a bounded lookahead. Fast, but may give up
    /// with [`Abort::RetryExact`].
    #[default]
    Sll,
    /// Exact prediction with unbounded lookahead.
    Ll,
}

/// Decision points that need more than one token of lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Qualified star, function call, typed literal or column reference.
    PrimaryExpression,
    /// Scalar subquery or parenthesized expression / row.
    ParenthesizedExpression,
    /// `IN (query)` or `IN (expr, ...)`.
    InPredicate,
    /// Aliased subquery or nested relation in a FROM clause.
    ParenthesizedRelation,
    /// Optional column list after `INSERT INTO t`.
    InsertColumns,
}

/// Approximate prediction could not settle a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ambiguity {
    /// The decision that was left open.
    pub decision: Decision,
    /// Token index of the decision point.
    pub index: usize,
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ambiguous {:?} decision at token {}",
            self.decision, self.index
        )
    }
}

/// Why an entry rule stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Abort {
    /// The input is malformed.
    Syntax(ParseError),
    /// Approximate prediction gave up; the input must be parsed again in
    /// [`PredictionMode::Ll`].
    RetryExact(Ambiguity),
}

/// What a speculative run of one alternative found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The alternative matched.
    Matched,
    /// The alternative failed at the given token index.
    Failed(usize),
    /// The lookahead budget ran out before the alternative was settled.
    Exhausted,
}

/// Non-local exits inside the recognizer.
#[derive(Debug)]
pub enum Interrupt {
    /// A reported syntax error. Aborts the attempt.
    Syntax(Box<ParseError>),
    /// An unreported mismatch while speculating, at the given token index.
    Mismatch(usize),
    /// Speculation hit the lookahead budget.
    Exhausted,
    /// Approximate prediction found more than one viable alternative.
    Ambiguous(Ambiguity),
}

impl From<ParseError> for Interrupt {
    fn from(err: ParseError) -> Self {
        Self::Syntax(Box::new(err))
    }
}

/// Result type inside the recognizer.
pub type PResult<T> = Result<T, Interrupt>;
