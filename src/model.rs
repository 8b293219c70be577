use indexmap::IndexMap;

use crate::error::LookupError;

/// Name under which the implicit unnamed section is addressed.
pub const UNNAMED_SECTION_NAME: &str = "";

/// Per-option hint recording how a value was written, consumed by the
/// renderer under the [`PreferSource`](crate::render::RenderPolicy::PreferSource)
/// policy. Absence (`None` on [`Property::style`]) means "renderer picks".
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ValueStyle {
    Unquoted,
    Quoted,
    TripleQuoted,
}

/// A single `key = value` entry.
///
/// The value is an arbitrary string, including the empty string,
/// whitespace, and embedded newlines (the library never interprets it).
#[derive(Clone, Debug)]
pub struct Property {
    pub key: String,
    pub value: String,
    /// Comment lines immediately preceding this option, bound to it.
    pub leading_comment: Option<Vec<String>>,
    /// Comment following the option on the same line.
    pub inline_comment: Option<String>,
    /// How the value was written, if parsed; `None` if set programmatically.
    pub style: Option<ValueStyle>,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            leading_comment: None,
            inline_comment: None,
            style: None,
        }
    }
}

/// A named (or, for the single implicit instance, unnamed) group of
/// options.
#[derive(Clone, Debug)]
pub struct Section {
    pub name: String,
    options: IndexMap<String, Property>,
    /// Comment lines immediately preceding the section header. Unused for
    /// the unnamed section.
    pub leading_comment: Option<Vec<String>>,
    /// Comment following the section header on the same line. Unused for
    /// the unnamed section.
    pub inline_comment: Option<String>,
}

impl Section {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: IndexMap::new(),
            leading_comment: None,
            inline_comment: None,
        }
    }

    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn get_option(&self, key: &str) -> Option<&Property> {
        self.options.get(key)
    }

    pub fn get_option_mut(&mut self, key: &str) -> Option<&mut Property> {
        self.options.get_mut(key)
    }

    /// The indexed accessor: raises a [`LookupError`] naming the missing
    /// option rather than returning `None`.
    pub fn option(&self, key: &str) -> Result<&Property, LookupError> {
        self.get_option(key).ok_or_else(|| LookupError::OptionNotFound {
            key: key.to_string(),
            section: self.name.clone(),
        })
    }

    /// Inserts or overwrites `option`, preserving its position if it
    /// already existed.
    pub fn set_option(&mut self, option: Property) {
        self.options.insert(option.key.clone(), option);
    }

    /// Sets the value for `key`, creating the option if absent, in place
    /// if present.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> &mut Property {
        if self.options.contains_key(key) {
            let entry = self.options.get_mut(key).expect("just checked");
            entry.value = value.into();
        } else {
            self.options.insert(key.to_string(), Property::new(key, value));
        }
        self.options.get_mut(key).expect("just inserted or updated")
    }

    pub fn delete_option(&mut self, key: &str) -> Option<Property> {
        self.options.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Property)> {
        self.options.iter()
    }

    /// A shallow `key -> value` view of the options, in insertion order.
    pub fn as_mapping(&self) -> IndexMap<String, String> {
        self.options
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }

    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(|o| o.value.as_str())
    }
}

/// The root of a parsed (or programmatically built) `.ini` document.
#[derive(Clone, Debug)]
pub struct Configuration {
    unnamed_section: Section,
    sections: IndexMap<String, Section>,
    /// Comment lines at end-of-file with no subsequent section/option to
    /// attach to. `None` unless the file ended in unclaimed comments.
    pub trailing_comment: Option<Vec<String>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            unnamed_section: Section::new(UNNAMED_SECTION_NAME),
            sections: IndexMap::new(),
            trailing_comment: None,
        }
    }

    pub fn unnamed_section(&self) -> &Section {
        &self.unnamed_section
    }

    pub fn unnamed_section_mut(&mut self) -> &mut Section {
        &mut self.unnamed_section
    }

    /// Whether the configuration has no unnamed-section options and no
    /// named sections at all.
    pub fn is_empty(&self) -> bool {
        self.unnamed_section.is_empty() && self.sections.is_empty()
    }

    pub fn get_section(&self, name: &str) -> Option<&Section> {
        if name.is_empty() {
            Some(&self.unnamed_section)
        } else {
            self.sections.get(name)
        }
    }

    pub fn get_section_mut(&mut self, name: &str) -> Option<&mut Section> {
        if name.is_empty() {
            Some(&mut self.unnamed_section)
        } else {
            self.sections.get_mut(name)
        }
    }

    /// The indexed accessor: raises a [`LookupError`] naming the missing
    /// section rather than returning `None`. Unlike [`get_section`], an
    /// empty name never resolves via this path (sections are never missing
    /// only by virtue of being unnamed, but named-section lookup is the
    /// meaningful failure mode callers want surfaced).
    pub fn section(&self, name: &str) -> Result<&Section, LookupError> {
        self.get_section(name).ok_or_else(|| LookupError::SectionNotFound {
            name: name.to_string(),
        })
    }

    /// Creates the section if missing and returns it. An empty name
    /// returns the (always-present) unnamed section.
    pub fn ensure_section(&mut self, name: &str) -> &mut Section {
        if name.is_empty() {
            &mut self.unnamed_section
        } else {
            self.sections
                .entry(name.to_string())
                .or_insert_with(|| Section::new(name))
        }
    }

    /// Removes a named section. The unnamed section can never be removed;
    /// passing an empty name is a no-op returning `None`.
    pub fn delete_section(&mut self, name: &str) -> Option<Section> {
        if name.is_empty() {
            None
        } else {
            self.sections.shift_remove(name)
        }
    }

    pub fn contains_section(&self, name: &str) -> bool {
        if name.is_empty() {
            true
        } else {
            self.sections.contains_key(name)
        }
    }

    /// Named sections in insertion order (the unnamed section is not
    /// included; access it via [`unnamed_section`](Self::unnamed_section)).
    pub fn sections(&self) -> impl Iterator<Item = (&String, &Section)> {
        self.sections.iter()
    }

    pub fn set_value(
        &mut self,
        key: &str,
        value: impl Into<String>,
        section_name: Option<&str>,
    ) -> &mut Property {
        let section = self.ensure_section(section_name.unwrap_or(UNNAMED_SECTION_NAME));
        section.set_value(key, value)
    }

    pub fn get_value(&self, key: &str, section_name: Option<&str>) -> Option<&str> {
        let section = self.get_section(section_name.unwrap_or(UNNAMED_SECTION_NAME))?;
        section.get_value(key)
    }

    /// `section_name -> {key: value}`. The unnamed section appears under
    /// the empty-string key only if it contains at least one option.
    pub fn as_mapping(&self) -> IndexMap<String, IndexMap<String, String>> {
        let mut result = IndexMap::new();

        if !self.unnamed_section.is_empty() {
            result.insert(UNNAMED_SECTION_NAME.to_string(), self.unnamed_section.as_mapping());
        }

        for (name, section) in &self.sections {
            result.insert(name.clone(), section.as_mapping());
        }

        result
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_creates_and_updates_in_place() {
        let mut config = Configuration::new();
        config.set_value("a", "1", None);
        config.set_value("b", "2", None);
        config.set_value("a", "3", None);

        let keys: Vec<&String> = config.unnamed_section().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(config.get_value("a", None), Some("3"));
    }

    #[test]
    fn unnamed_section_cannot_be_deleted() {
        let mut config = Configuration::new();
        config.set_value("a", "1", None);
        assert_eq!(config.delete_section(""), None);
        assert!(config.contains_section(""));
    }

    #[test]
    fn configuration_is_empty_until_a_value_or_section_is_added() {
        let mut config = Configuration::new();
        assert!(config.is_empty());

        config.set_value("a", "1", None);
        assert!(!config.is_empty());

        let mut other = Configuration::new();
        other.ensure_section("db");
        assert!(!other.is_empty());
    }

    #[test]
    fn as_mapping_omits_empty_unnamed_section() {
        let mut config = Configuration::new();
        config.ensure_section("db").set_value("host", "localhost");
        let mapping = config.as_mapping();
        assert!(!mapping.contains_key(""));
        assert_eq!(mapping["db"]["host"], "localhost");
    }

    #[test]
    fn missing_lookup_names_the_entity() {
        let config = Configuration::new();
        let err = config.section("db").unwrap_err();
        assert_eq!(err.to_string(), "Section \"db\" is not found");

        let err = config.unnamed_section().option("missing").unwrap_err();
        assert_eq!(err.to_string(), "Option \"missing\" not found in section \"\"");
    }
}
