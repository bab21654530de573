//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing that
//! builds a concrete parse tree. Decisions needing more than one token of
//! lookahead use adaptive prediction; [`ParseDriver`] runs the cheap
//! approximate mode first and retries in exact mode when it gives up.
//! [`SqlParser`] is the entry point most callers want.

mod driver;
mod error;
mod facade;
mod grammar;
mod listener;
mod postprocess;
mod pratt;
mod prediction;
mod recognizer;
mod token_stream;
mod tree;

pub use driver::{Failure, ParseDriver, Stream};
pub use error::{Origin, ParseError};
pub use facade::SqlParser;
pub use listener::{ConsoleErrorListener, ErrorListener, SyntaxErrorTranslator};
pub use postprocess::PostProcessor;
pub use pratt::infix_binding_power;
pub use prediction::{Abort, Ambiguity, Decision, PredictionMode};
pub use recognizer::{Parser, DEFAULT_MAX_DEPTH, DEFAULT_SLL_LOOKAHEAD};
pub use token_stream::TokenStream;
pub use tree::{ParseTree, Rule, RuleNode, TreeListener};
