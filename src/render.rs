use std::fmt::Write as _;

use crate::error::RenderError;
use crate::flavour::Flavour;
use crate::model::{Configuration, Property, Section, ValueStyle};

/// Controls how a value's presentation style is chosen when rendering.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RenderPolicy {
    /// Always emit quoted (falling back to triple-quoted only if a raw
    /// newline can't be represented via the flavour's escape mapping).
    AlwaysQuoted,
    /// Emit unquoted whenever the value is safe to write bare; otherwise
    /// fall back the same way `AlwaysQuoted` does.
    PreferUnquoted,
    /// Use the style recorded on the option; `AlwaysQuoted` if none was
    /// recorded.
    PreferSource,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        RenderPolicy::AlwaysQuoted
    }
}

/// Serializes a [`Configuration`] to text under a [`Flavour`] and
/// [`RenderPolicy`]. Stateless beyond its two inputs; writes incrementally
/// to the given `Write` sink and retains no buffer beyond the option being
/// rendered.
pub struct Renderer<'f> {
    flavour: &'f Flavour,
    policy: RenderPolicy,
}

impl<'f> Renderer<'f> {
    pub fn new(flavour: &'f Flavour, policy: RenderPolicy) -> Self {
        Self { flavour, policy }
    }

    pub fn render(&self, config: &Configuration) -> Result<String, RenderError> {
        if !self.flavour.allow_unnamed_section && !config.unnamed_section().is_empty() {
            return Err(RenderError::UnnamedSectionNotAllowed);
        }

        let mut out = String::new();
        let mut wrote_any = false;

        if let Some(comment) = &config.unnamed_section().leading_comment {
            self.write_comment_lines(&mut out, comment);
            wrote_any = true;
        }
        for (_, option) in config.unnamed_section().iter() {
            self.write_option(&mut out, option);
            wrote_any = true;
        }

        for (name, section) in config.sections() {
            if wrote_any {
                out.push_str(&self.flavour.new_line);
            }
            self.write_section(&mut out, name, section);
            wrote_any = true;
        }

        if let Some(comment) = &config.trailing_comment {
            self.write_comment_lines(&mut out, comment);
        }

        Ok(out)
    }

    fn write_section(&self, out: &mut String, name: &str, section: &Section) {
        if let Some(comment) = &section.leading_comment {
            self.write_comment_lines(out, comment);
        }
        out.push('[');
        out.push_str(name);
        out.push(']');
        if let Some(inline) = &section.inline_comment {
            write!(out, " {} {}", self.flavour.comment_marker(), inline).ok();
        }
        out.push_str(&self.flavour.new_line);
        for (_, option) in section.iter() {
            self.write_option(out, option);
        }
    }

    fn write_comment_lines(&self, out: &mut String, lines: &[String]) {
        let marker = self.flavour.comment_marker();
        for line in lines {
            out.push(marker);
            if !line.is_empty() {
                out.push(' ');
                out.push_str(line);
            }
            out.push_str(&self.flavour.new_line);
        }
    }

    fn write_option(&self, out: &mut String, option: &Property) {
        if let Some(comment) = &option.leading_comment {
            self.write_comment_lines(out, comment);
        }
        out.push_str(&option.key);
        out.push(self.flavour.separator());
        out.push(' ');
        out.push_str(&self.render_value(&option.value, option.style));
        if let Some(inline) = &option.inline_comment {
            write!(out, " {} {}", self.flavour.comment_marker(), inline).ok();
        }
        out.push_str(&self.flavour.new_line);
    }

    fn render_value(&self, value: &str, recorded_style: Option<ValueStyle>) -> String {
        let style = match self.policy {
            RenderPolicy::AlwaysQuoted => ValueStyle::Quoted,
            RenderPolicy::PreferUnquoted => {
                if self.is_safe_unquoted(value) {
                    ValueStyle::Unquoted
                } else {
                    ValueStyle::Quoted
                }
            }
            RenderPolicy::PreferSource => recorded_style.unwrap_or(ValueStyle::Quoted),
        };

        match style {
            ValueStyle::Unquoted => {
                if self.is_safe_unquoted(value) {
                    value.to_string()
                } else {
                    self.render_quoted_or_triple(value)
                }
            }
            ValueStyle::Quoted => self.render_quoted_or_triple(value),
            ValueStyle::TripleQuoted => {
                if self.fits_triple_quoted(value) {
                    self.render_triple_quoted(value)
                } else {
                    self.render_quoted(value)
                }
            }
        }
    }

    /// Falls back from quoted to triple-quoted only when the value has a
    /// raw newline with no escape mapping to represent it as `\n`.
    fn render_quoted_or_triple(&self, value: &str) -> String {
        let newline_representable = self.flavour.escape_suffix_for('\n').is_some();
        if value.contains('\n') && !newline_representable {
            if self.fits_triple_quoted(value) {
                return self.render_triple_quoted(value);
            }
        }
        self.render_quoted(value)
    }

    fn fits_triple_quoted(&self, value: &str) -> bool {
        !self.has_three_consecutive_quotes(value)
    }

    fn has_three_consecutive_quotes(&self, value: &str) -> bool {
        let quote = self.flavour.quote_character;
        let mut run = 0;
        for c in value.chars() {
            if c == quote {
                run += 1;
                if run >= 3 {
                    return true;
                }
            } else {
                run = 0;
            }
        }
        false
    }

    /// Whether `value` may be written unquoted at all: the flavour must
    /// allow unquoted values, and the text itself must contain nothing
    /// that would change its meaning when read back bare.
    fn is_safe_unquoted(&self, value: &str) -> bool {
        if !self.flavour.allow_unquoted_values {
            return false;
        }
        if value.is_empty() {
            return true;
        }
        if value.chars().next().map_or(false, |c| self.flavour.is_whitespace(c))
            || value.chars().last().map_or(false, |c| self.flavour.is_whitespace(c))
        {
            return false;
        }
        !value.chars().any(|c| {
            self.flavour.is_comment_marker(c)
                || self.flavour.matching_separator(c)
                || self.flavour.is_quote(c)
                || c == '\n'
                || c == '\r'
        })
    }

    fn render_quoted(&self, value: &str) -> String {
        let quote = self.flavour.quote_character;
        let mut out = String::with_capacity(value.len() + 2);
        out.push(quote);
        for c in value.chars() {
            if c == quote {
                out.push(self.flavour.escape_character);
                out.push(self.escape_suffix_for_quote(quote));
            } else if let Some(suffix) = self.flavour.escape_suffix_for(c) {
                out.push(self.flavour.escape_character);
                out.push(suffix);
            } else {
                out.push(c);
            }
        }
        out.push(quote);
        out
    }

    /// The quote character must always be escapable; falls back to the
    /// quote character itself (identity) if the flavour's table somehow
    /// omits a mapping for it, to keep the output loadable.
    fn escape_suffix_for_quote(&self, quote: char) -> char {
        self.flavour.escape_suffix_for(quote).unwrap_or(quote)
    }

    fn render_triple_quoted(&self, value: &str) -> String {
        let quote = self.flavour.quote_character;
        let mut out = String::with_capacity(value.len() + 6);
        out.push(quote);
        out.push(quote);
        out.push(quote);
        out.push_str(value);
        out.push(quote);
        out.push(quote);
        out.push(quote);
        out
    }
}
