//! Adaptive parse driver.
//!
//! Every parse first runs with approximate (SLL) prediction. If that attempt
//! gives up on a decision, the token stream is rewound, the parser is reset and
//! the same extraction step runs again with exact (LL) prediction. Approximate
//! prediction never picks a different alternative than exact prediction would,
//! so the retry only costs time.

use std::error::Error;

use tracing::debug;

use super::error::ParseError;
use super::listener::SyntaxErrorTranslator;
use super::postprocess::PostProcessor;
use super::prediction::{Abort, Ambiguity, PredictionMode};
use super::recognizer::Parser;
use super::token_stream::TokenStream;
use crate::builder::BuildError;
use crate::config::{ParserConfig, PredictionStrategy};
use crate::lexer::{CaseFoldingStream, InputStream, Lexer};

/// The character stream every parse reads from.
pub type Stream<'a> = CaseFoldingStream<InputStream<'a>>;

/// Why an extraction step failed.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    /// Approximate prediction gave up. Handled by the driver, never returned
    /// to callers.
    #[error("{0}")]
    Ambiguity(Ambiguity),

    /// A positioned parse error.
    #[error(transparent)]
    Parse(ParseError),

    /// Any other failure. Reported at an unknown origin.
    #[error("{0}")]
    Other(Box<dyn Error + Send + Sync>),
}

impl From<Abort> for Failure {
    fn from(abort: Abort) -> Self {
        match abort {
            Abort::Syntax(err) => Self::Parse(err),
            Abort::RetryExact(ambiguity) => Self::Ambiguity(ambiguity),
        }
    }
}

impl From<ParseError> for Failure {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<BuildError> for Failure {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::Parse(err) => Self::Parse(err),
            other => Self::Other(Box::new(other)),
        }
    }
}

/// Runs extraction steps with the adaptive retry and error enrichment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseDriver {
    config: ParserConfig,
}

impl ParseDriver {
    /// Creates a driver.
    #[must_use]
    pub const fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `command` with `step` and returns its result.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error, or the step's failure. The error
    /// always carries command text: `command` unless the step attached some
    /// already.
    pub fn parse<T, F>(&self, command: &str, step: F) -> Result<T, ParseError>
    where
        F: for<'s> Fn(&mut Parser<Stream<'s>>) -> Result<T, Failure>,
    {
        self.parse_reporting_mode(command, step)
            .map(|(value, _)| value)
    }

    /// Like [`ParseDriver::parse`], also returning the prediction mode of the
    /// attempt that produced the result.
    pub(crate) fn parse_reporting_mode<T, F>(
        &self,
        command: &str,
        step: F,
    ) -> Result<(T, PredictionMode), ParseError>
    where
        F: for<'s> Fn(&mut Parser<Stream<'s>>) -> Result<T, Failure>,
    {
        let mut parser = self.parser(command);

        let result = match step(&mut parser) {
            Err(Failure::Ambiguity(ambiguity)) => {
                debug!(%ambiguity, "approximate prediction gave up; retrying in exact mode");
                parser.reset();
                parser.set_prediction_mode(PredictionMode::Ll);
                let retry = step(&mut parser);
                debug!(ok = retry.is_ok(), "exact retry finished");
                retry
            }
            other => other,
        };

        match result {
            Ok(value) => Ok((value, parser.prediction_mode())),
            Err(Failure::Parse(err)) => Err(err.with_command(command)),
            Err(failure @ (Failure::Ambiguity(_) | Failure::Other(_))) => {
                Err(ParseError::unpositioned(failure.to_string()).with_command(command))
            }
        }
    }

    /// Wires a fresh lexer, token stream and parser for one call.
    fn parser<'s>(&self, command: &'s str) -> Parser<Stream<'s>> {
        let stream = CaseFoldingStream::new(InputStream::new(command));
        let mut lexer = Lexer::new(stream)
            .with_double_quoted_identifiers(self.config.double_quoted_identifiers);
        lexer.set_error_listener(Box::new(SyntaxErrorTranslator));

        let mut parser = Parser::new(TokenStream::new(lexer));
        parser.set_error_listener(Box::new(SyntaxErrorTranslator));
        parser.add_tree_listener(Box::new(PostProcessor::new()));
        parser.set_sll_lookahead(self.config.effective_sll_lookahead());
        parser.set_max_depth(self.config.max_depth);
        parser.set_prediction_mode(match self.config.prediction {
            PredictionStrategy::Adaptive => PredictionMode::Sll,
            PredictionStrategy::ExactOnly => PredictionMode::Ll,
        });
        parser
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Origin, RuleNode};

    fn statement(p: &mut Parser<Stream<'_>>) -> Result<RuleNode, Failure> {
        Ok(p.single_statement()?)
    }

    fn mode(config: ParserConfig, sql: &str) -> PredictionMode {
        ParseDriver::new(config)
            .parse_reporting_mode(sql, statement)
            .unwrap()
            .1
    }

    #[test]
    fn simple_input_settles_without_retry() {
        assert_eq!(mode(ParserConfig::DEFAULT, "SELECT a FROM t"), PredictionMode::Sll);
        assert_eq!(
            mode(ParserConfig::DEFAULT, "SELECT a FROM t WHERE b IN (1, 2, 3)"),
            PredictionMode::Sll
        );
    }

    #[test]
    fn nested_parentheses_fall_back_to_exact() {
        assert_eq!(mode(ParserConfig::DEFAULT, "SELECT ((SELECT 1))"), PredictionMode::Ll);
        assert_eq!(
            mode(ParserConfig::DEFAULT, "SELECT * FROM ((SELECT 1)) t"),
            PredictionMode::Ll
        );
    }

    #[test]
    fn fallback_tree_equals_exact_tree() {
        let exact_only = ParserConfig::DEFAULT.with_prediction(PredictionStrategy::ExactOnly);
        for sql in ["SELECT ((SELECT 1))", "INSERT INTO t (a, b) SELECT x, y FROM s"] {
            let adaptive = ParseDriver::default().parse(sql, statement).unwrap();
            let exact = ParseDriver::new(exact_only).parse(sql, statement).unwrap();
            assert_eq!(adaptive, exact, "{sql}");
        }
    }

    #[test]
    fn exact_only_skips_the_approximate_attempt() {
        let exact = ParserConfig::DEFAULT.with_prediction(PredictionStrategy::ExactOnly);
        assert_eq!(mode(exact, "SELECT a FROM t"), PredictionMode::Ll);
    }

    #[test]
    fn syntax_errors_get_the_command() {
        let err = ParseDriver::default()
            .parse("SELECT FROM", statement)
            .unwrap_err();
        assert_eq!(err.command(), Some("SELECT FROM"));
        assert_eq!(err.start, Origin::new(1, 7));
    }

    #[test]
    fn existing_command_is_kept() {
        let err = ParseDriver::default()
            .parse("SELECT 1", |_| -> Result<(), Failure> {
                Err(ParseError::unpositioned("inner").with_command("other").into())
            })
            .unwrap_err();
        assert_eq!(err.command(), Some("other"));
    }

    #[test]
    fn other_failures_are_wrapped_at_unknown_origin() {
        let err = ParseDriver::default()
            .parse("SELECT 1", |_| -> Result<(), Failure> {
                Err(Failure::Other("builder gave up".into()))
            })
            .unwrap_err();
        assert_eq!(err.message, "builder gave up");
        assert!(err.start.is_unknown());
        assert_eq!(err.command(), Some("SELECT 1"));
    }
}
