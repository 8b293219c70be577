use std::collections::VecDeque;

use crate::error::{Encountered, ParseError, ParseErrorKind};
use crate::flavour::Flavour;
use crate::position::{Position, PositionTracker};

/// A logical unit produced by the lexer. Quoted and triple-quoted values
/// are the only tokens that may span more than one physical line.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum Token {
    SectionHeader(String),
    Key(String),
    Comment(String),
    UnquotedValue(String),
    QuotedValue(String),
    TripleQuotedValue(String),
    EndOfLine,
    EndOfFile,
}

/// Distinguishes the two places a trailing inline comment / end-of-line
/// check can occur, since a section header and a key/value line report
/// different errors for leftover content.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum LineEnd {
    SectionHeader,
    Value,
}

/// Consumes `source` one character at a time under `flavour`'s rules,
/// producing the token stream the parser drives. Lookahead is a small
/// pushback buffer on top of the underlying `Chars` iterator; only
/// characters returned by `bump` advance the position tracker.
pub(crate) struct Lexer<'s, 'f> {
    source: &'s str,
    chars: std::str::Chars<'s>,
    lookahead: VecDeque<char>,
    pos: PositionTracker,
    flavour: &'f Flavour,
}

impl<'s, 'f> Lexer<'s, 'f> {
    pub(crate) fn new(source: &'s str, flavour: &'f Flavour) -> Self {
        Self {
            source,
            chars: source.chars(),
            lookahead: VecDeque::new(),
            pos: PositionTracker::new(),
            flavour,
        }
    }

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n {
            match self.chars.next() {
                Some(c) => self.lookahead.push_back(c),
                None => break,
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.fill(0);
        self.lookahead.front().copied()
    }

    fn peek_at(&mut self, n: usize) -> Option<char> {
        self.fill(n);
        self.lookahead.get(n).copied()
    }

    /// Consumes and returns the next character along with its own position.
    fn bump(&mut self) -> Option<(char, Position)> {
        let c = match self.lookahead.pop_front() {
            Some(c) => c,
            None => self.chars.next()?,
        };
        let position = self.pos.advance(c);
        Some((c, position))
    }

    /// The position the next (not yet consumed) character would have.
    pub(crate) fn position(&self) -> Position {
        self.pos.current_position()
    }

    fn excerpt_for(&self, line: u32) -> String {
        self.source.lines().nth((line.max(1) - 1) as usize).unwrap_or("").to_string()
    }

    pub(crate) fn error_at(&self, kind: ParseErrorKind, position: Position) -> ParseError {
        ParseError::new(kind, position, self.excerpt_for(position.line))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if self.flavour.is_whitespace(c) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn consume_newline(&mut self) {
        match self.peek() {
            Some('\r') => {
                self.bump();
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            Some('\n') => {
                self.bump();
            }
            _ => {}
        }
    }

    /// Consumes the raw `\n` or `\r\n` that triggered an "unterminated"
    /// error and returns its position. `advance` defers a newline's own
    /// line increment to the character that follows it, so the position
    /// returned here still belongs to the line the newline terminates,
    /// while the byte offset correctly reflects one byte for a lone `\n`
    /// and two for a `\r\n` pair.
    fn consume_error_newline(&mut self) -> Position {
        let (c, position) = self.bump().expect("peeked a newline");
        if c == '\r' && self.peek() == Some('\n') {
            let (_, position) = self.bump().expect("peeked \\n");
            position
        } else {
            position
        }
    }

    /// Reads a comment: the marker has already been confirmed present by
    /// the caller. Strips the marker and, if present, a single space
    /// following it, then captures text to end of line without consuming
    /// the terminator.
    fn read_comment_text(&mut self) -> String {
        self.bump();
        if self.peek() == Some(' ') {
            self.bump();
        }
        let mut text = String::new();
        loop {
            match self.peek() {
                None => break,
                Some(c) if c == '\n' || c == '\r' => break,
                Some(c) => {
                    self.bump();
                    text.push(c);
                }
            }
        }
        text
    }

    /// Produces the next token at the start of a logical line: a leading
    /// comment line, a section header, a key, a blank line, or EOF.
    /// Key/value lines are returned as `Token::Key`; the caller drives the
    /// rest of that line via `read_separator`/`read_value`/`read_line_end`.
    pub(crate) fn next_line_start(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(Token::EndOfFile),
            Some(c) if c == '\n' || c == '\r' => {
                self.consume_newline();
                Ok(Token::EndOfLine)
            }
            Some(c) if self.flavour.is_comment_marker(c) => {
                let text = self.read_comment_text();
                self.consume_newline();
                Ok(Token::Comment(text))
            }
            Some('[') => self.read_section_header(),
            Some(_) => self.read_key(),
        }
    }

    fn read_section_header(&mut self) -> Result<Token, ParseError> {
        self.bump(); // '['
        let mut name = String::new();
        loop {
            match self.peek() {
                None => {
                    let position = self.position();
                    return Err(self.error_at(
                        ParseErrorKind::UnterminatedSectionHeader(Encountered::Eof),
                        position,
                    ));
                }
                Some(c) if c == '\n' || c == '\r' => {
                    let position = self.consume_error_newline();
                    return Err(self.error_at(
                        ParseErrorKind::UnterminatedSectionHeader(Encountered::NewLine),
                        position,
                    ));
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(c) => {
                    self.bump();
                    name.push(c);
                }
            }
        }
        Ok(Token::SectionHeader(name.trim().to_string()))
    }

    fn read_key(&mut self) -> Result<Token, ParseError> {
        let mut key = String::new();
        loop {
            match self.peek() {
                None => {
                    let position = self.position();
                    return Err(self.error_at(
                        ParseErrorKind::ExpectedSeparator {
                            separator: self.flavour.separator(),
                            found: Encountered::Eof,
                        },
                        position,
                    ));
                }
                Some(c) if c == '\n' || c == '\r' => {
                    let position = self.consume_error_newline();
                    return Err(self.error_at(
                        ParseErrorKind::ExpectedSeparator {
                            separator: self.flavour.separator(),
                            found: Encountered::NewLine,
                        },
                        position,
                    ));
                }
                Some(c) if self.flavour.matching_separator(c) => break,
                Some(c) if self.flavour.is_quote(c) || self.flavour.is_comment_marker(c) => {
                    let (_, position) = self.bump().expect("peeked Some");
                    return Err(self.error_at(
                        ParseErrorKind::ExpectedSeparator {
                            separator: self.flavour.separator(),
                            found: Encountered::Char(c),
                        },
                        position,
                    ));
                }
                Some(c) => {
                    self.bump();
                    key.push(c);
                }
            }
        }
        Ok(Token::Key(key.trim_end().to_string()))
    }

    /// Consumes the separator character. Only valid immediately after a
    /// `Token::Key`, whose scan loop only exits on a matching separator.
    pub(crate) fn read_separator(&mut self) {
        self.bump();
    }

    /// Reads the value following a separator: skips leading whitespace,
    /// then branches on quoted, triple-quoted, or unquoted form.
    pub(crate) fn read_value(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if self.flavour.is_quote(c) => {
                if self.peek_at(1) == Some(c) && self.peek_at(2) == Some(c) {
                    self.read_triple_quoted_value()
                } else {
                    self.read_quoted_value()
                }
            }
            Some(c) if !self.flavour.allow_unquoted_values => {
                let position = self.position();
                Err(self.error_at(
                    ParseErrorKind::ExpectedSeparator {
                        separator: self.flavour.quote_character,
                        found: Encountered::Char(c),
                    },
                    position,
                ))
            }
            _ => Ok(self.read_unquoted_value()),
        }
    }

    fn read_quoted_value(&mut self) -> Result<Token, ParseError> {
        let quote = self.flavour.quote_character;
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    let position = self.position();
                    return Err(self.error_at(
                        ParseErrorKind::UnterminatedQuotedValue(Encountered::Eof),
                        position,
                    ));
                }
                Some(c) if c == '\n' || c == '\r' => {
                    let position = self.consume_error_newline();
                    return Err(self.error_at(
                        ParseErrorKind::UnterminatedQuotedValue(Encountered::NewLine),
                        position,
                    ));
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some(c) if c == self.flavour.escape_character => {
                    self.bump();
                    match self.peek() {
                        None => {
                            let position = self.position();
                            return Err(self.error_at(
                                ParseErrorKind::UnterminatedQuotedValue(Encountered::Eof),
                                position,
                            ));
                        }
                        Some(escaped) => {
                            self.bump();
                            match self.flavour.escape_replacement(escaped) {
                                Some(replacement) => value.push_str(replacement),
                                None => {
                                    let position = self.position();
                                    return Err(self.error_at(ParseErrorKind::UnknownEscapeSequence, position));
                                }
                            }
                        }
                    }
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
        Ok(Token::QuotedValue(value))
    }

    fn read_triple_quoted_value(&mut self) -> Result<Token, ParseError> {
        let quote = self.flavour.quote_character;
        self.bump();
        self.bump();
        self.bump(); // three opening quotes
        let mut value = String::new();
        loop {
            let (c1, c2, c3) = (self.peek(), self.peek_at(1), self.peek_at(2));
            match (c1, c2, c3) {
                (Some(a), Some(b), Some(d)) if a == quote && b == quote && d == quote => {
                    self.bump();
                    self.bump();
                    self.bump();
                    break;
                }
                (None, _, _) => {
                    let position = self.position();
                    return Err(self.error_at(ParseErrorKind::UnterminatedTripleQuotedValue, position));
                }
                (Some(c), _, _) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
        Ok(Token::TripleQuotedValue(value))
    }

    fn read_unquoted_value(&mut self) -> Token {
        let mut raw = String::new();
        loop {
            match self.peek() {
                None => break,
                Some(c) if c == '\n' || c == '\r' => break,
                Some(c) if self.flavour.allow_inline_comments && self.flavour.is_comment_marker(c) => break,
                Some(c) => {
                    self.bump();
                    raw.push(c);
                }
            }
        }
        Token::UnquotedValue(raw.trim().to_string())
    }

    /// Consumes trailing whitespace, an optional inline comment, and the
    /// line terminator (or EOF). `comments_allowed` gates inline comments
    /// on key/value lines only (section headers always recognize them,
    /// since an inline comment there is never ambiguous with the value
    /// grammar). Any other leading character is an error keyed by `context`.
    pub(crate) fn read_line_end(
        &mut self,
        context: LineEnd,
        comments_allowed: bool,
    ) -> Result<Option<String>, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(None),
            Some(c) if c == '\n' || c == '\r' => {
                self.consume_newline();
                Ok(None)
            }
            Some(c) if comments_allowed && self.flavour.is_comment_marker(c) => {
                let comment = self.read_comment_text();
                self.consume_newline();
                Ok(Some(comment))
            }
            Some(c) => {
                if context == LineEnd::SectionHeader {
                    let position = self.position();
                    return Err(self.error_at(ParseErrorKind::UnexpectedContentAfterSectionHeader, position));
                }
                // No error kind covers trailing content after a closed
                // quoted/triple-quoted value, so the rest of the line is
                // discarded up to the terminator, matching the unquoted
                // branch's "everything to EOL is the value" rule.
                let _ = c;
                loop {
                    match self.peek() {
                        None => return Ok(None),
                        Some(c) if c == '\n' || c == '\r' => {
                            self.consume_newline();
                            return Ok(None);
                        }
                        Some(c) if comments_allowed && self.flavour.is_comment_marker(c) => {
                            let comment = self.read_comment_text();
                            self.consume_newline();
                            return Ok(Some(comment));
                        }
                        _ => {
                            self.bump();
                        }
                    }
                }
            }
        }
    }
}
