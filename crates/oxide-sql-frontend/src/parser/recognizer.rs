//! Recognizer core: token matching, tree construction and adaptive
//! prediction. The grammar rules themselves live in `grammar` and `pratt`.

use std::collections::HashMap;

use tracing::trace;

use super::error::{Origin, ParseError};
use super::listener::{ConsoleErrorListener, ErrorListener};
use super::prediction::{
    Abort, Ambiguity, Decision, Interrupt, Outcome, PResult, PredictionMode,
};
use super::token_stream::TokenStream;
use super::tree::{ParseTree, Rule, RuleNode, TreeListener};
use crate::lexer::{CharStream, Keyword, TokenKind};

/// One alternative of a decision, run speculatively by [`Parser::predict`].
pub type Alternative<S> = fn(&mut Parser<S>) -> PResult<()>;

/// Default lookahead budget of approximate prediction, in tokens.
pub const DEFAULT_SLL_LOOKAHEAD: usize = 4;

/// Default limit on rule nesting. Deeper input is rejected as a syntax error
/// instead of exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// SQL Parser.
///
/// A recursive descent recognizer that builds a [`RuleNode`] tree. Rule-exit
/// events go to the registered [`TreeListener`]s as each node completes, and
/// the first syntax violation aborts the parse through the installed
/// [`ErrorListener`].
pub struct Parser<S> {
    tokens: TokenStream<S>,
    mode: PredictionMode,
    sll_lookahead: usize,
    max_depth: usize,
    listener: Box<dyn ErrorListener>,
    tree_listeners: Vec<Box<dyn TreeListener>>,
    /// Open rule nodes, innermost last.
    stack: Vec<RuleNode>,
    root: Option<RuleNode>,
    /// Position just past the last token added to the tree.
    last: Origin,
    /// Rules currently open, speculative runs included.
    depth: usize,
    /// Speculative runs cut short by the depth limit. Their outcomes depend
    /// on the depth they started at and are not memoized.
    depth_cutoffs: usize,
    /// Nesting depth of speculative runs. No tree is built and no errors are
    /// reported while this is non-zero.
    speculating: usize,
    /// Token index speculation may not look at or past.
    limit: Option<usize>,
    memo: HashMap<(Decision, usize, usize), Outcome>,
}

impl<S: CharStream> Parser<S> {
    /// Creates a parser reading from `tokens`, in approximate prediction
    /// mode.
    #[must_use]
    pub fn new(tokens: TokenStream<S>) -> Self {
        Self {
            tokens,
            mode: PredictionMode::Sll,
            sll_lookahead: DEFAULT_SLL_LOOKAHEAD,
            max_depth: DEFAULT_MAX_DEPTH,
            listener: Box::new(ConsoleErrorListener),
            tree_listeners: Vec::new(),
            stack: Vec::new(),
            root: None,
            last: Origin::UNKNOWN,
            depth: 0,
            depth_cutoffs: 0,
            speculating: 0,
            limit: None,
            memo: HashMap::new(),
        }
    }

    /// Replaces the syntax error listener.
    pub fn set_error_listener(&mut self, listener: Box<dyn ErrorListener>) {
        self.listener = listener;
    }

    /// Registers a listener for rule-exit events.
    pub fn add_tree_listener(&mut self, listener: Box<dyn TreeListener>) {
        self.tree_listeners.push(listener);
    }

    /// Selects how decisions are predicted.
    pub const fn set_prediction_mode(&mut self, mode: PredictionMode) {
        self.mode = mode;
    }

    /// Returns the current prediction mode.
    #[must_use]
    pub const fn prediction_mode(&self) -> PredictionMode {
        self.mode
    }

    /// Sets the lookahead budget of approximate prediction. Values below one
    /// are raised to one.
    pub fn set_sll_lookahead(&mut self, tokens: usize) {
        self.sll_lookahead = tokens.max(1);
    }

    /// Sets how deeply rules may nest before the input is rejected. Values
    /// below one are raised to one.
    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth.max(1);
    }

    /// Returns the underlying token stream.
    #[must_use]
    pub const fn token_stream(&self) -> &TokenStream<S> {
        &self.tokens
    }

    /// Rewinds the token stream and clears all parse state, keeping the
    /// listeners and the prediction settings.
    pub fn reset(&mut self) {
        self.tokens.reset();
        self.stack.clear();
        self.root = None;
        self.last = Origin::UNKNOWN;
        self.depth = 0;
        self.speculating = 0;
        self.limit = None;
        self.memo.clear();
    }

    // ---------------------------------------------------------------------
    // Token matching
    // ---------------------------------------------------------------------

    /// Returns the kind of the `k`-th token ahead.
    pub(crate) fn kind(&mut self, k: usize) -> PResult<TokenKind> {
        let index = self.tokens.index() + k.saturating_sub(1);
        if self.limit.is_some_and(|limit| index >= limit) {
            return Err(Interrupt::Exhausted);
        }
        Ok(self.tokens.lt(k)?.kind)
    }

    /// Returns true if the current token is of the given kind.
    pub(crate) fn at(&mut self, kind: TokenKind) -> PResult<bool> {
        Ok(self.kind(1)? == kind)
    }

    /// Returns true if the current token is the given keyword.
    pub(crate) fn at_keyword(&mut self, keyword: Keyword) -> PResult<bool> {
        self.at(TokenKind::Keyword(keyword))
    }

    /// Moves past the current token, adding it to the open node.
    pub(crate) fn consume(&mut self) -> PResult<()> {
        if self.speculating == 0 {
            let token = self.tokens.lt(1)?.clone();
            self.last = Origin::new(token.line, token.column + token.text.chars().count());
            if let Some(top) = self.stack.last_mut() {
                top.children.push(ParseTree::Terminal(token));
            }
        }
        self.tokens.consume();
        Ok(())
    }

    /// Consumes the current token if it has the given kind.
    pub(crate) fn accept(&mut self, kind: TokenKind) -> PResult<bool> {
        if self.at(kind)? {
            self.consume()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes the current token if it is the given keyword.
    pub(crate) fn accept_keyword(&mut self, keyword: Keyword) -> PResult<bool> {
        self.accept(TokenKind::Keyword(keyword))
    }

    /// Consumes a token of the given kind or fails.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<()> {
        if self.at(kind)? {
            self.consume()
        } else {
            Err(self.mismatch(&[kind]))
        }
    }

    /// Consumes the given keyword or fails.
    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> PResult<()> {
        self.expect(TokenKind::Keyword(keyword))
    }

    // ---------------------------------------------------------------------
    // Errors
    // ---------------------------------------------------------------------

    /// Builds a "mismatched input" error at the current token.
    pub(crate) fn mismatch(&mut self, expected: &[TokenKind]) -> Interrupt {
        let expecting = match expected {
            [one] => one.to_string(),
            many => {
                let names: Vec<String> = many.iter().map(ToString::to_string).collect();
                format!("{{{}}}", names.join(", "))
            }
        };
        self.report(|text| format!("mismatched input '{text}' expecting {expecting}"))
    }

    /// Builds a "no viable alternative" error at the current token.
    pub(crate) fn no_viable(&mut self) -> Interrupt {
        self.report(|text| format!("no viable alternative at input '{text}'"))
    }

    /// Builds a "nested too deeply" error at the current token. While
    /// speculating, the alternative simply fails here.
    fn nested_too_deeply(&mut self) -> Interrupt {
        if self.speculating > 0 {
            self.depth_cutoffs += 1;
        }
        let max_depth = self.max_depth;
        self.report(|text| {
            format!("input nested too deeply at '{text}' (maximum depth is {max_depth})")
        })
    }

    fn report(&mut self, message: impl FnOnce(&str) -> String) -> Interrupt {
        if self.speculating > 0 {
            return Interrupt::Mismatch(self.tokens.index());
        }
        let token = match self.tokens.lt(1) {
            Ok(token) => token.clone(),
            Err(err) => return err.into(),
        };
        let message = message(token.display_text());
        self.listener
            .syntax_error(Some(&token), token.line, token.column, &message)
            .into()
    }

    // ---------------------------------------------------------------------
    // Tree construction
    // ---------------------------------------------------------------------

    fn enter(&mut self, rule: Rule) -> PResult<()> {
        if self.speculating == 0 {
            let token = self.tokens.lt(1)?;
            let start = Origin::new(token.line, token.column);
            self.stack.push(RuleNode::new(rule, start));
        }
        Ok(())
    }

    fn exit(&mut self) {
        if self.speculating > 0 {
            return;
        }
        let Some(mut node) = self.stack.pop() else {
            return;
        };
        if !node.children.is_empty() {
            node.stop = self.last;
        }

        let replacement = self
            .tree_listeners
            .iter()
            .find_map(|listener| listener.exit_rule(&node));
        let child = replacement.map_or(ParseTree::Rule(node), ParseTree::Terminal);

        match (self.stack.last_mut(), child) {
            (Some(parent), child) => parent.children.push(child),
            (None, ParseTree::Rule(node)) => self.root = Some(node),
            (None, ParseTree::Terminal(_)) => {}
        }
    }

    /// Runs `body` inside a new node for `rule`.
    pub(crate) fn rule<T>(
        &mut self,
        rule: Rule,
        body: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        if self.depth >= self.max_depth {
            return Err(self.nested_too_deeply());
        }
        self.depth += 1;
        let result = self.enter(rule).and_then(|()| body(self));
        self.depth -= 1;
        let value = result?;
        self.exit();
        Ok(value)
    }

    /// Opens a node for `rule` whose first child is the last child of the
    /// current node. Used for left-recursive constructs such as binary
    /// operators; the caller closes the node with [`Parser::close`].
    pub(crate) fn wrap_last(&mut self, rule: Rule) {
        if self.speculating > 0 {
            return;
        }
        let Some(last) = self.stack.last_mut().and_then(|top| top.children.pop()) else {
            return;
        };
        let start = match &last {
            ParseTree::Rule(node) => node.start,
            ParseTree::Terminal(token) => Origin::new(token.line, token.column),
        };
        let mut node = RuleNode::new(rule, start);
        node.children.push(last);
        self.stack.push(node);
    }

    /// Closes a node opened by [`Parser::wrap_last`].
    pub(crate) fn close(&mut self) {
        self.exit();
    }

    /// Changes the rule of the innermost open node.
    pub(crate) fn relabel(&mut self, rule: Rule) {
        if self.speculating > 0 {
            return;
        }
        if let Some(top) = self.stack.last_mut() {
            top.rule = rule;
        }
    }

    /// Runs an entry rule and hands back the finished tree.
    pub(crate) fn entry(
        &mut self,
        rule: Rule,
        body: impl FnOnce(&mut Self) -> PResult<()>,
    ) -> Result<RuleNode, Abort> {
        self.stack.clear();
        self.root = None;
        self.depth = 0;
        match self.rule(rule, body) {
            Ok(()) => self
                .root
                .take()
                .ok_or_else(|| Abort::Syntax(ParseError::unpositioned("empty parse tree"))),
            Err(Interrupt::Syntax(err)) => Err(Abort::Syntax(*err)),
            Err(Interrupt::Ambiguous(ambiguity)) => Err(Abort::RetryExact(ambiguity)),
            Err(Interrupt::Mismatch(_) | Interrupt::Exhausted) => {
                unreachable!("speculative interrupt outside of a decision")
            }
        }
    }

    // ---------------------------------------------------------------------
    // Adaptive prediction
    // ---------------------------------------------------------------------

    /// Runs `alt` without building the tree and rewinds afterwards.
    fn speculate(
        &mut self,
        decision: Decision,
        alt: usize,
        body: Alternative<S>,
        limit: Option<usize>,
    ) -> PResult<Outcome> {
        let start = self.tokens.index();
        if let Some(&outcome) = self.memo.get(&(decision, alt, start)) {
            return Ok(outcome);
        }

        let saved_limit = self.limit;
        self.limit = match (saved_limit, limit) {
            (Some(outer), Some(inner)) => Some(outer.min(inner)),
            (outer, inner) => outer.or(inner),
        };
        let cutoffs = self.depth_cutoffs;
        self.speculating += 1;
        let result = body(self);
        self.speculating -= 1;
        self.limit = saved_limit;
        self.tokens.seek(start);

        let outcome = match result {
            Ok(()) => Outcome::Matched,
            Err(Interrupt::Mismatch(at)) => Outcome::Failed(at),
            Err(Interrupt::Exhausted) => return Ok(Outcome::Exhausted),
            Err(err @ (Interrupt::Syntax(_) | Interrupt::Ambiguous(_))) => return Err(err),
        };
        if self.depth_cutoffs == cutoffs {
            self.memo.insert((decision, alt, start), outcome);
        }
        Ok(outcome)
    }

    /// Chooses one of `alts` at the current position.
    ///
    /// In exact mode the first alternative that matches wins; when none
    /// does, the one that got furthest is returned so that parsing it
    /// reports the real error. Approximate mode gives the same answer when it
    /// can decide within its budget and raises [`Interrupt::Ambiguous`] when
    /// it cannot.
    pub(crate) fn predict(
        &mut self,
        decision: Decision,
        alts: &[Alternative<S>],
    ) -> PResult<usize> {
        let start = self.tokens.index();
        let limit = match self.mode {
            PredictionMode::Sll => Some(start + self.sll_lookahead),
            PredictionMode::Ll => None,
        };

        let mut furthest = (0, start);
        let mut undecided = None;
        for (alt, body) in alts.iter().enumerate() {
            match self.speculate(decision, alt, *body, limit)? {
                Outcome::Failed(at) => {
                    if at > furthest.1 {
                        furthest = (alt, at);
                    }
                }
                // A second viable alternative.
                _ if undecided.is_some() => return Err(self.ambiguous(decision, start)),
                Outcome::Matched => {
                    trace!(?decision, alt, "predicted");
                    return Ok(alt);
                }
                Outcome::Exhausted => undecided = Some(alt),
            }
        }

        let alt = undecided.unwrap_or(furthest.0);
        trace!(?decision, alt, "predicted");
        Ok(alt)
    }

    const fn ambiguous(&self, decision: Decision, index: usize) -> Interrupt {
        if self.speculating > 0 {
            // Leaves the enclosing speculation undecided.
            Interrupt::Exhausted
        } else {
            Interrupt::Ambiguous(Ambiguity { decision, index })
        }
    }
}
