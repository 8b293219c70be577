use crate::error::{ParseError, ParseErrorKind};
use crate::flavour::Flavour;
use crate::lexer::{Lexer, LineEnd, Token};
use crate::model::{Configuration, Property, ValueStyle};

/// Parses `source` under `flavour` into a [`Configuration`].
///
/// Drives the [`Lexer`] line by line, accumulating leading comments in a
/// buffer that is handed to whichever owner appears next (a section
/// header, a key, or end of file), and builds the model as it goes.
/// On error the in-progress `Configuration` is discarded; nothing is
/// returned but the error.
pub fn parse(source: &str, flavour: &Flavour) -> Result<Configuration, ParseError> {
    let mut lexer = Lexer::new(source, flavour);
    let mut config = Configuration::new();
    let mut comment_buffer: Vec<String> = Vec::new();
    let mut current_section = String::new();
    let mut seen_section_header = false;

    loop {
        let line_start = lexer.position();
        match lexer.next_line_start()? {
            Token::EndOfFile => {
                if !comment_buffer.is_empty() {
                    config.trailing_comment = Some(std::mem::take(&mut comment_buffer));
                }
                return Ok(config);
            }
            Token::EndOfLine => {
                if !comment_buffer.is_empty() {
                    comment_buffer.push(String::new());
                }
            }
            Token::Comment(text) => {
                comment_buffer.push(text);
            }
            Token::SectionHeader(name) => {
                let inline_comment = lexer.read_line_end(LineEnd::SectionHeader, true)?;
                let leading_comment = if comment_buffer.is_empty() {
                    None
                } else {
                    Some(std::mem::take(&mut comment_buffer))
                };
                let section = config.ensure_section(&name);
                if leading_comment.is_some() {
                    section.leading_comment = leading_comment;
                }
                if inline_comment.is_some() {
                    section.inline_comment = inline_comment;
                }
                current_section = name;
                seen_section_header = true;
            }
            Token::Key(key) => {
                if !seen_section_header && !flavour.allow_unnamed_section {
                    return Err(lexer.error_at(ParseErrorKind::UnnamedSectionNotAllowed, line_start));
                }

                lexer.read_separator();
                let (value, style) = match lexer.read_value()? {
                    Token::UnquotedValue(v) => (v, ValueStyle::Unquoted),
                    Token::QuotedValue(v) => (v, ValueStyle::Quoted),
                    Token::TripleQuotedValue(v) => (v, ValueStyle::TripleQuoted),
                    _ => unreachable!("read_value only returns value tokens"),
                };
                let inline_comment = lexer.read_line_end(LineEnd::Value, flavour.allow_inline_comments)?;

                let mut option = Property::new(key, value);
                option.style = Some(style);
                option.inline_comment = inline_comment;
                if !comment_buffer.is_empty() {
                    option.leading_comment = Some(std::mem::take(&mut comment_buffer));
                }

                config.ensure_section(&current_section).set_option(option);
            }
        }
    }
}
