//! Parser error types.

use core::fmt;

use serde::Serialize;

/// A position in the command text.
///
/// Either field may be unknown; an origin with both fields unset is a valid
/// value meaning "no position available", not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Origin {
    /// Line number (1-based).
    pub line: Option<usize>,
    /// Character offset within the line (0-based).
    pub start_position: Option<usize>,
}

impl Origin {
    /// The unknown origin.
    pub const UNKNOWN: Self = Self {
        line: None,
        start_position: None,
    };

    /// Creates a known origin.
    #[must_use]
    pub const fn new(line: usize, start_position: usize) -> Self {
        Self {
            line: Some(line),
            start_position: Some(start_position),
        }
    }

    /// Returns true if neither field is set.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.line.is_none() && self.start_position.is_none()
    }
}

/// A structured parse error.
///
/// The original command text is attached at most once, by the outermost layer
/// that has it; [`ParseError::with_command`] never replaces text that is
/// already present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// Where the offending input starts.
    pub start: Origin,
    /// Where the offending input stops.
    pub stop: Origin,
    command: Option<String>,
}

impl ParseError {
    /// Creates a new parse error without command text.
    #[must_use]
    pub fn new(message: impl Into<String>, start: Origin, stop: Origin) -> Self {
        Self {
            message: message.into(),
            start,
            stop,
            command: None,
        }
    }

    /// Creates an error whose start and stop are the same point.
    #[must_use]
    pub fn at(message: impl Into<String>, origin: Origin) -> Self {
        Self::new(message, origin, origin)
    }

    /// Creates an error with no position information.
    #[must_use]
    pub fn unpositioned(message: impl Into<String>) -> Self {
        Self::at(message, Origin::UNKNOWN)
    }

    /// Returns the attached command text, if any.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Attaches the original command text unless some is already attached.
    #[must_use]
    pub fn with_command(mut self, command: &str) -> Self {
        if self.command.is_none() {
            self.command = Some(command.to_owned());
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        match (self.start.line, self.start.start_position) {
            (Some(line), Some(pos)) => {
                write!(f, "(line {line}, pos {pos})")?;
                if let Some(command) = &self.command {
                    f.write_str("\n\n== SQL ==\n")?;
                    let lines: Vec<&str> = command.split('\n').collect();
                    let split = line.min(lines.len());
                    for above in &lines[..split] {
                        writeln!(f, "{above}")?;
                    }
                    writeln!(f, "{}^^^", "-".repeat(pos))?;
                    for below in &lines[split..] {
                        writeln!(f, "{below}")?;
                    }
                }
            }
            _ => {
                if let Some(command) = &self.command {
                    write!(f, "\n\n== SQL ==\n{command}")?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_attached_once() {
        let err = ParseError::at("boom", Origin::new(1, 3));
        assert_eq!(err.command(), None);

        let err = err.with_command("SELECT 1");
        assert_eq!(err.command(), Some("SELECT 1"));

        let err = err.with_command("SELECT 2");
        assert_eq!(err.command(), Some("SELECT 1"));
    }

    #[test]
    fn unknown_origin() {
        assert!(Origin::UNKNOWN.is_unknown());
        assert!(Origin::default().is_unknown());
        assert!(!Origin::new(1, 0).is_unknown());
        let err = ParseError::unpositioned("x");
        assert!(err.start.is_unknown() && err.stop.is_unknown());
    }

    #[test]
    fn display_points_at_the_offending_column() {
        let err = ParseError::at("mismatched input 'FROM'", Origin::new(1, 7))
            .with_command("SELECT FROM t");
        assert_eq!(
            err.to_string(),
            "mismatched input 'FROM'(line 1, pos 7)\n\n== SQL ==\nSELECT FROM t\n-------^^^\n"
        );
    }

    #[test]
    fn display_keeps_lines_below_the_caret() {
        let err = ParseError::at("oops", Origin::new(1, 0)).with_command("a\nb");
        assert_eq!(err.to_string(), "oops(line 1, pos 0)\n\n== SQL ==\na\n^^^\nb\n");
    }

    #[test]
    fn display_without_position() {
        let err = ParseError::unpositioned("Unsupported SQL statement").with_command("GRANT x");
        assert_eq!(
            err.to_string(),
            "Unsupported SQL statement\n\n== SQL ==\nGRANT x"
        );
        assert_eq!(ParseError::unpositioned("bare").to_string(), "bare");
    }
}
