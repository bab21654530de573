//! Parser configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::parser::{DEFAULT_MAX_DEPTH, DEFAULT_SLL_LOOKAHEAD};

/// How the parse driver predicts grammar decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStrategy {
    /// Approximate prediction first; exact prediction only when the
    /// approximate attempt reports an ambiguity.
    #[default]
    Adaptive,
    /// Exact prediction from the start.
    ExactOnly,
}

/// Immutable settings shared by every parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Prediction strategy.
    pub prediction: PredictionStrategy,
    /// Tokens approximate prediction may look past a decision point.
    pub sll_lookahead: usize,
    /// Lex `"..."` as a quoted identifier instead of a string literal.
    pub double_quoted_identifiers: bool,
    /// How deeply grammar rules may nest before the input is rejected.
    pub max_depth: usize,
}

impl ParserConfig {
    /// The default configuration.
    pub const DEFAULT: Self = Self {
        prediction: PredictionStrategy::Adaptive,
        sll_lookahead: DEFAULT_SLL_LOOKAHEAD,
        double_quoted_identifiers: false,
        max_depth: DEFAULT_MAX_DEPTH,
    };

    /// Returns a copy with a different prediction strategy.
    #[must_use]
    pub const fn with_prediction(mut self, prediction: PredictionStrategy) -> Self {
        self.prediction = prediction;
        self
    }

    /// Returns a copy with a different approximate lookahead budget.
    #[must_use]
    pub const fn with_sll_lookahead(mut self, tokens: usize) -> Self {
        self.sll_lookahead = tokens;
        self
    }

    /// Returns a copy that lexes `"..."` as identifiers.
    #[must_use]
    pub const fn with_double_quoted_identifiers(mut self, enabled: bool) -> Self {
        self.double_quoted_identifiers = enabled;
        self
    }

    /// Returns a copy with a different nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// The lookahead budget actually used; never below one token.
    #[must_use]
    pub const fn effective_sll_lookahead(&self) -> usize {
        if self.sll_lookahead == 0 {
            1
        } else {
            self.sll_lookahead
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed input or unknown values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Errors while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid configuration.
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}
