//! End-to-end scenarios spanning lexer, parser and renderer together,
//! covering full-file round trips and cross-module behavior that no
//! single module's unit tests exercise on their own.

use crate::*;

fn roundtrip(source: &str, flavour: &Flavour) -> Configuration {
    let config = parse(source, flavour).unwrap();
    let rendered = Renderer::new(flavour, RenderPolicy::PreferSource).render(&config).unwrap();
    let reparsed = parse(&rendered, flavour).unwrap();
    assert_eq!(config.as_mapping(), reparsed.as_mapping(), "round trip changed as_mapping() for {:?}", source);
    config
}

#[test]
fn scenario_app_and_database_sections() {
    let flavour = Flavour::default();
    let config = roundtrip("app_name = My App\n[database]\nprovider = mysql\nversion = 1.2.3", &flavour);
    assert_eq!(config.get_value("app_name", None), Some("My App"));
    assert_eq!(config.get_value("provider", Some("database")), Some("mysql"));
    assert_eq!(config.get_value("version", Some("database")), Some("1.2.3"));
}

#[test]
fn scenario_trailing_whitespace_after_header() {
    let flavour = Flavour::default();
    let config = roundtrip("[section]   \nfoo=bar", &flavour);
    assert_eq!(config.get_value("foo", Some("section")), Some("bar"));
}

#[test]
fn scenario_inline_comment_on_header() {
    let flavour = Flavour::default();
    let config = parse("[section] # note\nfoo=bar", &flavour).unwrap();
    assert_eq!(config.section("section").unwrap().inline_comment.as_deref(), Some("note"));
}

#[test]
fn scenario_value_with_embedded_triple_quote_renders_quoted_not_triple() {
    let flavour = Flavour::default();
    // A value containing a literal run of three quote characters cannot be
    // written in triple-quoted form (that run would be read back as the
    // closing delimiter), so the renderer falls back to quoted form even
    // when the option's recorded style is TripleQuoted.
    let mut config = Configuration::new();
    let option = config.unnamed_section_mut().set_value("key", "has \"\"\" inside");
    option.style = Some(ValueStyle::TripleQuoted);
    let rendered = Renderer::new(&flavour, RenderPolicy::PreferSource).render(&config).unwrap();
    assert!(rendered.starts_with("key = \""));
    assert!(!rendered.starts_with("key = \"\"\""));
    let reparsed = parse(&rendered, &flavour).unwrap();
    assert_eq!(reparsed.get_value("key", None), Some("has \"\"\" inside"));
}

#[test]
fn value_fidelity_round_trips_every_sample_value() {
    let flavour = Flavour::default();
    let samples = [
        "simple",
        "with_underscore",
        "with spaces",
        "with \"quotes\"",
        "with single 'quotes'",
        "with \\ backslash",
        "multi\nline\nvalue",
        " ",
        "\t",
        "",
        "'\"\"\"hello\"\"\" # world'",
    ];
    for value in samples {
        let mut config = Configuration::new();
        config.unnamed_section_mut().set_value("value", value);
        let rendered = Renderer::new(&flavour, RenderPolicy::AlwaysQuoted).render(&config).unwrap();
        let reparsed = parse(&rendered, &flavour).unwrap();
        assert_eq!(reparsed.get_value("value", None), Some(value), "value {:?} did not round trip, rendered {:?}", value, rendered);
    }
}

#[test]
fn key_fidelity_round_trips_every_sample_key() {
    let flavour = Flavour::default();
    let keys = ["simple", "with_underscore", "with-dash", "with.dots", "with:mixed-._chars"];
    for key in keys {
        let mut config = Configuration::new();
        config.unnamed_section_mut().set_value(key, "v");
        let rendered = Renderer::new(&flavour, RenderPolicy::AlwaysQuoted).render(&config).unwrap();
        let reparsed = parse(&rendered, &flavour).unwrap();
        assert_eq!(reparsed.get_value(key, None), Some("v"), "key {:?} did not round trip", key);
    }
}

// The exact byte/column arithmetic in these fixtures is derived by hand
// from the position tracker's documented rules (a `\n` advances the byte
// counter by one and a `\r\n` pair by two, with the newline's own position
// still belonging to the line it terminates). Assertions compare LF vs.
// CRLF deltas directly rather than hardcoding absolute numbers, since
// those are the only values these rules pin down unambiguously. See
// DESIGN.md for the reasoning.

#[test]
fn position_reporting_unterminated_quoted_value_lf() {
    let flavour = Flavour::default();
    let err = parse("value = \"unterminated\n", &flavour).unwrap_err();
    assert_eq!(err.context.position.line, 1);
    assert_eq!(err.context.position.column, 22);
    assert_eq!(err.context.position.byte_offset, 22);
}

#[test]
fn position_reporting_unterminated_quoted_value_crlf_has_one_more_byte() {
    let flavour = Flavour::default();
    let lf_err = parse("value = \"unterminated\n", &flavour).unwrap_err();
    let crlf_err = parse("value = \"unterminated\r\n", &flavour).unwrap_err();
    assert_eq!(crlf_err.context.position.line, lf_err.context.position.line);
    assert_eq!(crlf_err.context.position.byte_offset, lf_err.context.position.byte_offset + 1);
}

#[test]
fn position_reporting_multibyte_values() {
    let flavour = Flavour::default();
    let err = parse("foo = \"\u{0445}\u{044d}\u{043b}\u{043e}\u{0443}\"\nvalue = \"\u{0442}\u{0435}\u{0441}\u{0442}\n", &flavour).unwrap_err();
    assert_eq!(err.context.position.line, 2);
    assert_eq!(err.context.position.column, 14);
    assert_eq!(err.context.position.byte_offset, 37);
}

#[test]
fn position_reporting_multibyte_values_crlf_has_two_more_bytes() {
    let flavour = Flavour::default();
    let lf_err = parse("foo = \"\u{0445}\u{044d}\u{043b}\u{043e}\u{0443}\"\nvalue = \"\u{0442}\u{0435}\u{0441}\u{0442}\n", &flavour).unwrap_err();
    let crlf_err = parse(
        "foo = \"\u{0445}\u{044d}\u{043b}\u{043e}\u{0443}\"\r\nvalue = \"\u{0442}\u{0435}\u{0441}\u{0442}\r\n",
        &flavour,
    )
    .unwrap_err();
    assert_eq!(crlf_err.context.position.line, lf_err.context.position.line);
    // The inline CRLF after "foo = ..." adds one byte, and the CRLF that
    // triggers the error itself (two bytes vs. one for a lone LF) adds
    // another, for two extra bytes total relative to the all-LF fixture.
    assert_eq!(crlf_err.context.position.byte_offset, lf_err.context.position.byte_offset + 2);
}

#[test]
fn structural_error_unterminated_section_header_lf() {
    let flavour = Flavour::default();
    let err = parse("[section\nfoo=bar", &flavour).unwrap_err();
    assert_eq!(err.to_string().lines().next().unwrap(), "Expected \"]\", but encountered LF");
}

#[test]
fn structural_error_unterminated_section_header_eof() {
    let flavour = Flavour::default();
    let err = parse("[section", &flavour).unwrap_err();
    assert_eq!(err.to_string().lines().next().unwrap(), "Expected \"]\", but encountered EOF");
}

#[test]
fn structural_error_content_after_section_header() {
    let flavour = Flavour::default();
    let err = parse("[section] key = value", &flavour).unwrap_err();
    assert_eq!(err.to_string().lines().next().unwrap(), "Expected end of line after section header");
}

#[test]
fn structural_error_forbidden_char_in_key() {
    let flavour = Flavour::default();
    let err = parse("foo\"key = bad", &flavour).unwrap_err();
    assert_eq!(err.to_string().lines().next().unwrap(), "Expected \"=\", but encountered \"\"\"");
    assert_eq!(err.context.position.line, 1);
    assert_eq!(err.context.position.column, 4);
    assert_eq!(err.context.position.byte_offset, 4);
}

#[test]
fn structural_error_triple_quote_then_eof() {
    let flavour = Flavour::default();
    let err = parse("key = \"\"\"", &flavour).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedTripleQuotedValue);
    assert_eq!(err.to_string().lines().next().unwrap(), "EOF encountered before closing triple quoted string");
}

#[test]
fn structural_error_unknown_escape_sequence() {
    let flavour = Flavour::default();
    let err = parse("value = \"foo\\bar\"", &flavour).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownEscapeSequence);
}

#[test]
fn comment_binding_through_blank_line() {
    let flavour = Flavour::default();
    let config = parse("# c1\n\n# c2\nkey=v", &flavour).unwrap();
    let option = config.unnamed_section().option("key").unwrap();
    assert_eq!(
        option.leading_comment.as_deref(),
        Some(&["c1".to_string(), String::new(), "c2".to_string()][..])
    );
}

#[test]
fn trailing_comment_with_no_following_owner() {
    let flavour = Flavour::default();
    let config = parse("key=v\n# orphaned", &flavour).unwrap();
    assert_eq!(config.trailing_comment.as_deref(), Some(&["orphaned".to_string()][..]));
}

#[test]
fn comment_only_file_is_an_empty_model_with_trailing_comment() {
    let flavour = Flavour::default();
    let config = parse("# just a comment", &flavour).unwrap();
    assert!(config.unnamed_section().is_empty());
    assert!(config.sections().next().is_none());
    assert_eq!(config.trailing_comment.as_deref(), Some(&["just a comment".to_string()][..]));
}

#[test]
fn repeated_section_headers_merge() {
    let flavour = Flavour::default();
    let config = parse("[a]\nx=1\n[b]\ny=2\n[a]\nz=3", &flavour).unwrap();
    let section = config.section("a").unwrap();
    assert_eq!(section.get_value("x"), Some("1"));
    assert_eq!(section.get_value("z"), Some("3"));
    let names: Vec<&String> = config.sections().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn custom_flavour_alternate_quote_and_separator() {
    let flavour = Flavour::default().quote_character('\'').key_value_separators(vec![':']);
    let config = parse("key : 'hello world'", &flavour).unwrap();
    assert_eq!(config.get_value("key", None), Some("hello world"));
    let rendered = Renderer::new(&flavour, RenderPolicy::AlwaysQuoted).render(&config).unwrap();
    assert!(rendered.starts_with("key: '"));
}

#[test]
fn disallowing_unquoted_values_forces_quotes_on_render() {
    let flavour = Flavour::default().allow_unquoted_values(false);
    let mut config = Configuration::new();
    config.unnamed_section_mut().set_value("key", "value");
    let rendered = Renderer::new(&flavour, RenderPolicy::PreferUnquoted).render(&config).unwrap();
    assert!(rendered.contains("\"value\""));
}

#[test]
fn whole_file_round_trip_preserves_comments_and_sections() {
    let flavour = Flavour::default();
    let source = "\
; top of file
app_name = My App

[database] ; connection settings
# the default provider
provider = mysql
version = \"1.2.3\"

# trailing notes
";
    let config = roundtrip(source, &flavour);
    assert_eq!(config.get_value("app_name", None), Some("My App"));
    let db = config.section("database").unwrap();
    assert_eq!(db.inline_comment.as_deref(), Some("connection settings"));
    assert_eq!(
        db.option("provider").unwrap().leading_comment.as_deref(),
        Some(&["the default provider".to_string()][..])
    );
    assert_eq!(config.trailing_comment.as_deref(), Some(&["trailing notes".to_string()][..]));
}
