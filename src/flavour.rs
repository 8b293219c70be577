/// Tokenization and rendering parameters shared by the [`lexer`](crate::lexer),
/// [`parser`](crate::parser::Parser) and [`renderer`](crate::render::Renderer).
///
/// A `Flavour` is a pure value: constructing one has no side effects, and the
/// same value must be used for both parsing and rendering a document for the
/// two to agree on what a given byte sequence means.
///
/// Unlike the bitflag-based option sets used elsewhere for closed two- or
/// three-way choices, the marker/separator/escape sets here are ordered
/// `Vec`s, since a flavour may define markers or separators outside the
/// default `;`/`#`/`=` set.
#[derive(Clone, Debug, PartialEq)]
pub struct Flavour {
    /// If `false`, parser and renderer both require quoted values.
    ///
    /// Default: `true`.
    pub allow_unquoted_values: bool,
    /// If `false`, options before any section header raise an error, and
    /// rendering a non-empty unnamed section raises an error.
    ///
    /// Default: `true`.
    pub allow_unnamed_section: bool,
    /// If `false`, comment markers on a key/value line are treated as part
    /// of the (quoted) value, or as an error (unquoted).
    ///
    /// Default: `true`.
    pub allow_inline_comments: bool,
    /// The single character that opens and closes a quoted or
    /// triple-quoted value.
    ///
    /// Default: `"`.
    pub quote_character: char,
    /// Ordered set of key/value separators; the first match wins.
    ///
    /// Default: `['=']`.
    pub key_value_separators: Vec<char>,
    /// Any of these characters opens a comment running to end of line.
    ///
    /// Default: `['#', ';']`.
    pub comment_markers: Vec<char>,
    /// The character that introduces an escape sequence inside a quoted
    /// value.
    ///
    /// Default: `\`.
    pub escape_character: char,
    /// Ordered mapping from escape suffix character to its replacement
    /// text, used by the lexer to decode escape sequences and by the
    /// renderer (in reverse) to encode them.
    ///
    /// Default: `n`->LF, `t`->TAB, `\`->`\`, `"`->`"`, `<LF>`->`""`.
    pub escape_sequences: Vec<(char, String)>,
    /// Line terminator the renderer emits between logical lines.
    ///
    /// Default: `"\n"`.
    pub new_line: String,
    /// Characters treated as interline whitespace.
    ///
    /// Default: space and tab.
    pub whitespace_characters: Vec<char>,
}

impl Default for Flavour {
    fn default() -> Self {
        Self {
            allow_unquoted_values: true,
            allow_unnamed_section: true,
            allow_inline_comments: true,
            quote_character: '"',
            key_value_separators: vec!['='],
            comment_markers: vec!['#', ';'],
            escape_character: '\\',
            escape_sequences: vec![
                ('n', "\n".to_string()),
                ('t', "\t".to_string()),
                ('\\', "\\".to_string()),
                ('"', "\"".to_string()),
                ('\n', String::new()),
            ],
            new_line: "\n".to_string(),
            whitespace_characters: vec![' ', '\t'],
        }
    }
}

impl Flavour {
    /// Whether unquoted values are disallowed (renderer/parser must require
    /// quoted values).
    pub fn allow_unquoted_values(mut self, allow: bool) -> Self {
        self.allow_unquoted_values = allow;
        self
    }

    /// Whether the unnamed section is permitted to carry options / be
    /// rendered non-empty.
    pub fn allow_unnamed_section(mut self, allow: bool) -> Self {
        self.allow_unnamed_section = allow;
        self
    }

    /// Whether inline comments are recognized on key/value lines.
    pub fn allow_inline_comments(mut self, allow: bool) -> Self {
        self.allow_inline_comments = allow;
        self
    }

    /// Sets the quote character.
    pub fn quote_character(mut self, quote: char) -> Self {
        self.quote_character = quote;
        self
    }

    /// Sets the ordered key/value separator set.
    pub fn key_value_separators(mut self, separators: Vec<char>) -> Self {
        self.key_value_separators = separators;
        self
    }

    /// Sets the comment marker set.
    pub fn comment_markers(mut self, markers: Vec<char>) -> Self {
        self.comment_markers = markers;
        self
    }

    pub(crate) fn is_whitespace(&self, c: char) -> bool {
        self.whitespace_characters.contains(&c)
    }

    pub(crate) fn is_comment_marker(&self, c: char) -> bool {
        self.comment_markers.contains(&c)
    }

    pub(crate) fn comment_marker(&self) -> char {
        self.comment_markers.first().copied().unwrap_or(';')
    }

    pub(crate) fn matching_separator(&self, c: char) -> bool {
        self.key_value_separators.contains(&c)
    }

    pub(crate) fn separator(&self) -> char {
        self.key_value_separators.first().copied().unwrap_or('=')
    }

    pub(crate) fn is_quote(&self, c: char) -> bool {
        c == self.quote_character
    }

    /// Looks up the replacement text for an escape suffix, e.g. `n` -> `"\n"`.
    pub(crate) fn escape_replacement(&self, suffix: char) -> Option<&str> {
        self.escape_sequences
            .iter()
            .find(|(s, _)| *s == suffix)
            .map(|(_, repl)| repl.as_str())
    }

    /// Reverse lookup: the escape suffix that renders as the single
    /// character `ch`, if any. Used by the renderer to escape a raw
    /// character inside a quoted value.
    pub(crate) fn escape_suffix_for(&self, ch: char) -> Option<char> {
        self.escape_sequences.iter().find_map(|(suffix, repl)| {
            let mut chars = repl.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c == ch => Some(*suffix),
                _ => None,
            }
        })
    }
}
