use std::error::Error;
use std::fmt::{self, Display, Formatter};

use crate::position::Position;

/// What the lexer/parser found instead of what it expected, for errors
/// whose message names the encountered thing rather than always a specific
/// character (e.g. "Expected `]`, but encountered EOF").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Encountered {
    /// A specific character was found where something else was expected.
    Char(char),
    /// A new line (`\n` or `\r\n`) was encountered.
    NewLine,
    /// End of file was encountered.
    Eof,
}

impl Display for Encountered {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Encountered::Char(c) => write!(f, "\"{}\"", c),
            Encountered::NewLine => f.write_str("LF"),
            Encountered::Eof => f.write_str("EOF"),
        }
    }
}

/// The specific parsing failure, independent of where it occurred. This is
/// the closed set of kinds: unterminated quoted value (LF or EOF),
/// unterminated triple-quoted value (EOF), unterminated section header (LF
/// or EOF), unknown escape sequence, expected-separator-but-found-X,
/// unexpected content after a section header, and unnamed section when
/// disallowed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParseErrorKind {
    /// A raw newline, or EOF, was encountered before a quoted value's
    /// closing quote.
    UnterminatedQuotedValue(Encountered),
    /// EOF was encountered before a triple-quoted value's closing triple
    /// quote.
    UnterminatedTripleQuotedValue,
    /// A section header was missing its closing `]`.
    UnterminatedSectionHeader(Encountered),
    /// An escape sequence's suffix character has no mapping in the
    /// flavour's `escape_sequences`.
    UnknownEscapeSequence,
    /// A character forbidden in a bare key, a missing separator, or an
    /// unquoted value where the flavour requires a quoted one.
    ExpectedSeparator { separator: char, found: Encountered },
    /// Content other than whitespace / an inline comment followed a
    /// section header's closing `]` on the same line.
    UnexpectedContentAfterSectionHeader,
    /// An option appeared before any section header while the flavour
    /// forbids the unnamed section.
    UnnamedSectionNotAllowed,
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ParseErrorKind::UnterminatedQuotedValue(Encountered::NewLine) => {
                write!(f, "New line encountered before closing quoted string")
            }
            ParseErrorKind::UnterminatedQuotedValue(_) => {
                write!(f, "EOF encountered before closing quoted string")
            }
            ParseErrorKind::UnterminatedTripleQuotedValue => {
                write!(f, "EOF encountered before closing triple quoted string")
            }
            ParseErrorKind::UnterminatedSectionHeader(found) => {
                write!(f, "Expected \"]\", but encountered {}", found)
            }
            ParseErrorKind::UnknownEscapeSequence => {
                write!(f, "Unknown escape sequence")
            }
            ParseErrorKind::ExpectedSeparator { separator, found } => {
                write!(f, "Expected \"{}\", but encountered {}", separator, found)
            }
            ParseErrorKind::UnexpectedContentAfterSectionHeader => {
                write!(f, "Expected end of line after section header")
            }
            ParseErrorKind::UnnamedSectionNotAllowed => {
                write!(f, "Unnamed section is not allowed")
            }
        }
    }
}

/// Context attached to every parsing error: the source line the error
/// occurred on, for display purposes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PositionContext {
    pub position: Position,
    pub excerpt: String,
}

/// An error returned by the parser. Carries the failure kind, the raw byte
/// offset, and a position context (line, column, source excerpt).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub context: PositionContext,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: Position, excerpt: String) -> Self {
        Self {
            kind,
            context: PositionContext { position, excerpt },
        }
    }

    pub fn byte_offset(&self) -> u64 {
        self.context.position.byte_offset
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let column = self.context.position.column.max(1);
        let caret_indent = 2 + (column as usize - 1);
        writeln!(f, "{}", self.kind)?;
        writeln!(f)?;
        writeln!(f, "  ...")?;
        writeln!(f, "> {}", self.context.excerpt)?;
        writeln!(f, "{}^", " ".repeat(caret_indent))?;
        write!(f, "{}", self.context.position)
    }
}

impl Error for ParseError {}

/// An error raised while serializing a [`Configuration`](crate::model::Configuration).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RenderError {
    /// The flavour forbids the unnamed section and it is non-empty.
    UnnamedSectionNotAllowed,
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RenderError::UnnamedSectionNotAllowed => {
                write!(f, "Unnamed section is not allowed")
            }
        }
    }
}

impl Error for RenderError {}

/// An error raised by an indexed accessor (`Index`-style lookup) naming a
/// missing section or option.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LookupError {
    SectionNotFound { name: String },
    OptionNotFound { key: String, section: String },
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LookupError::SectionNotFound { name } => {
                write!(f, "Section \"{}\" is not found", name)
            }
            LookupError::OptionNotFound { key, section } => {
                write!(f, "Option \"{}\" not found in section \"{}\"", key, section)
            }
        }
    }
}

impl Error for LookupError {}
