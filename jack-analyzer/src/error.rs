//! Error types and diagnostics for the Jack analyzer.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Jack analyzer.
///
/// Lexical and syntax errors carry the byte offset of the offending token
/// within the source text; [`Diagnostic`] maps it back to a line and column.
#[derive(Debug, Error)]
pub enum JackError {
    #[error("Lexical error at byte {offset}: {message}")]
    Lexical { offset: usize, message: String },

    #[error("Syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No .jack files in {path}")]
    NoJackFiles { path: PathBuf },
}

impl JackError {
    /// Create a lexical error anchored at a byte offset.
    pub fn lexical(offset: usize, message: impl Into<String>) -> Self {
        JackError::Lexical {
            offset,
            message: message.into(),
        }
    }

    /// Create a syntax error anchored at a byte offset.
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        JackError::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Create an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JackError::Io {
            path: path.into(),
            source,
        }
    }

    /// The byte offset this error is anchored at, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            JackError::Lexical { offset, .. } | JackError::Syntax { offset, .. } => Some(*offset),
            JackError::Io { .. } | JackError::NoJackFiles { .. } => None,
        }
    }

    fn message(&self) -> Option<&str> {
        match self {
            JackError::Lexical { message, .. } | JackError::Syntax { message, .. } => Some(message),
            JackError::Io { .. } | JackError::NoJackFiles { .. } => None,
        }
    }
}

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, JackError>;

/// Rich error formatter that points at the offending column.
///
/// Given the original source, renders the previous and current lines with
/// their line numbers and a caret aligned under the error position. The
/// caret line reproduces the source's own whitespace so that tabs line up.
pub struct Diagnostic<'a> {
    error: &'a JackError,
    source: Option<&'a str>,
}

impl<'a> Diagnostic<'a> {
    pub fn new(error: &'a JackError) -> Self {
        Self {
            error,
            source: None,
        }
    }

    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(offset), Some(message), Some(source)) =
            (self.error.offset(), self.error.message(), self.source)
        else {
            return write!(f, "{}", self.error);
        };

        let pos = offset.min(source.len());
        let line_start = source[..pos].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[pos..].find('\n').map_or(source.len(), |i| pos + i);
        let line = 1 + source[..line_start].matches('\n').count();
        let col = pos - line_start + 1;

        writeln!(f, "Error in line {}, col {}: {}", line, col, message)?;
        writeln!(f)?;

        let width = line.to_string().len();
        if line > 1 {
            let prev_end = line_start - 1;
            let prev_start = source[..prev_end].rfind('\n').map_or(0, |i| i + 1);
            writeln!(f, "{:<width$} {}", line - 1, &source[prev_start..prev_end])?;
        }
        writeln!(f, "{:<width$} {}", line, &source[line_start..line_end])?;

        // Reproduce the line's own whitespace under the caret so tabs align.
        write!(f, "{:width$} ", "")?;
        for c in source[line_start..pos].chars() {
            if c.is_whitespace() {
                write!(f, "{}", c)?;
            } else {
                write!(f, " ")?;
            }
        }
        write!(f, "^")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_points_at_column() {
        // Stray character at line 3, col 7.
        let source = "class A {\n  field int x;\n  let @ = 1;\n}\n";
        let offset = source.find('@').unwrap();
        let err = JackError::lexical(offset, "Invalid character");
        let rendered = Diagnostic::new(&err).with_source(source).to_string();

        assert!(rendered.starts_with("Error in line 3, col 7: Invalid character"));
        assert!(rendered.contains("2 "));
        assert!(rendered.contains("  field int x;"));
        let caret_line = rendered.lines().last().unwrap();
        assert_eq!(caret_line.chars().position(|c| c == '^'), Some(8));
    }

    #[test]
    fn test_first_line_diagnostic() {
        let source = "klass A { }\n";
        let err = JackError::syntax(0, "Unexpected token \"klass\"");
        let rendered = Diagnostic::new(&err).with_source(source).to_string();
        assert!(rendered.starts_with("Error in line 1, col 1:"));
        assert!(rendered.contains("1 klass A { }"));
    }

    #[test]
    fn test_offset_at_end_of_input() {
        let source = "class A {";
        let err = JackError::syntax(source.len(), "Expected \"}\"");
        let rendered = Diagnostic::new(&err).with_source(source).to_string();
        assert!(rendered.starts_with("Error in line 1, col 10:"));
    }

    #[test]
    fn test_io_error_has_no_span() {
        let err = JackError::io(
            "missing.jack",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.offset().is_none());
        let rendered = Diagnostic::new(&err).to_string();
        assert!(rendered.contains("missing.jack"));
    }

    #[test]
    fn test_tab_preserved_in_caret_line() {
        let source = "\tlet @ = 1;\n";
        let offset = source.find('@').unwrap();
        let err = JackError::lexical(offset, "Invalid character");
        let rendered = Diagnostic::new(&err).with_source(source).to_string();
        let caret_line = rendered.lines().last().unwrap();
        assert!(caret_line.contains('\t'));
        assert!(caret_line.ends_with('^'));
    }
}
