//! INI document model.
//!
//! An [`IniDocument`] is the parsed, immutable content of one configuration
//! file: named sections, each holding `option -> raw text` pairs, plus the
//! special `[DEFAULT]` section whose options act as fallbacks for every other
//! section.
//!
//! # What does an INI file look like? (for beginners)
//!
//! ```ini
//! # comment (only in the first column)
//! [default]
//! workers = 4
//! debug: True
//! ; indented lines continue the previous value
//! tags = ["a",
//!     "b"]
//! ```
//!
//! Values are kept as raw text here.  Turning `4` into an integer is the job
//! of [`crate::literal`].

pub mod parser;

pub use parser::parse_ini;

use thiserror::Error;

/// Name of the section whose options are inherited by all other sections.
pub const DEFAULTS_SECTION: &str = "DEFAULT";

/// Errors produced while parsing INI text.
#[derive(Debug, Error, PartialEq)]
pub enum IniError {
    /// An option line appeared before any `[section]` header.
    #[error("line {line}: option {content:?} appears before any section header")]
    MissingSectionHeader { line: usize, content: String },

    /// One or more lines are neither header, option, continuation nor comment.
    #[error("{}", describe_malformed(.lines))]
    Malformed { lines: Vec<(usize, String)> },
}

fn describe_malformed(lines: &[(usize, String)]) -> String {
    let listed: Vec<String> = lines
        .iter()
        .map(|(line, content)| format!("line {line}: {content:?}"))
        .collect();
    format!("malformed INI content ({})", listed.join(", "))
}

/// Errors produced when looking up an option.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The requested section does not exist.
    #[error("section not found: {0:?}")]
    SectionNotFound(String),

    /// The section exists but neither it nor `[DEFAULT]` defines the option.
    #[error("option {option:?} not found in section {section:?}")]
    OptionNotFound { section: String, option: String },
}

/// One `[name]` block with its options in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    name: String,
    options: Vec<(String, String)>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw value of `option` (already lower-cased by the caller).
    fn get(&self, option: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == option)
            .map(|(_, v)| v.as_str())
    }

    fn get_mut(&mut self, option: &str) -> Option<&mut String> {
        self.options
            .iter_mut()
            .find(|(k, _)| k == option)
            .map(|(_, v)| v)
    }

    /// Sets `option`; a repeated option keeps its position and takes the new
    /// value.
    fn set(&mut self, option: String, value: String) {
        match self.get_mut(&option) {
            Some(existing) => *existing = value,
            None => self.options.push((option, value)),
        }
    }

    /// Iterates over `(option, raw value)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Parsed INI content.
#[derive(Debug, Clone, PartialEq)]
pub struct IniDocument {
    defaults: Section,
    sections: Vec<Section>,
}

impl Default for IniDocument {
    fn default() -> Self {
        Self {
            defaults: Section::new(DEFAULTS_SECTION),
            sections: Vec::new(),
        }
    }
}

/// Option names are case-insensitive.
pub fn normalize_option(option: &str) -> String {
    option.to_lowercase()
}

impl IniDocument {
    /// Names of all sections in file order, excluding `[DEFAULT]`.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(Section::name)
    }

    /// Returns `true` if a section called `name` exists.  `[DEFAULT]` is not
    /// reported as a section.
    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Returns the section called `name`, excluding `[DEFAULT]`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// The `[DEFAULT]` section (empty if the file has none).
    pub fn defaults(&self) -> &Section {
        &self.defaults
    }

    /// Looks up the raw value of `option` in `section`, falling back to
    /// `[DEFAULT]`.  `section` may itself be `"DEFAULT"`.
    ///
    /// # Errors
    ///
    /// - [`LookupError::SectionNotFound`] if `section` does not exist.
    /// - [`LookupError::OptionNotFound`] if neither `section` nor `[DEFAULT]`
    ///   defines `option`.
    pub fn get(&self, section: &str, option: &str) -> Result<&str, LookupError> {
        let key = normalize_option(option);
        let found = match self.section(section) {
            Some(s) => s.get(&key).or_else(|| self.defaults.get(&key)),
            None if section == DEFAULTS_SECTION => self.defaults.get(&key),
            None => return Err(LookupError::SectionNotFound(section.to_string())),
        };
        found.ok_or_else(|| LookupError::OptionNotFound {
            section: section.to_string(),
            option: option.to_string(),
        })
    }

    /// Option names visible in `section`: its own options in file order,
    /// followed by inherited `[DEFAULT]` options it does not override.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::SectionNotFound`] if `section` does not exist.
    pub fn options(&self, section: &str) -> Result<Vec<&str>, LookupError> {
        let s = self
            .section(section)
            .ok_or_else(|| LookupError::SectionNotFound(section.to_string()))?;
        let mut names: Vec<&str> = s.iter().map(|(k, _)| k).collect();
        for (k, _) in self.defaults.iter() {
            if s.get(k).is_none() {
                names.push(k);
            }
        }
        Ok(names)
    }

    /// Returns `true` if `option` resolves in `section` (directly or through
    /// `[DEFAULT]`).  Never fails: an unknown section simply yields `false`.
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        let key = normalize_option(option);
        if section.is_empty() || section == DEFAULTS_SECTION {
            return self.defaults.get(&key).is_some();
        }
        match self.section(section) {
            Some(s) => s.get(&key).is_some() || self.defaults.get(&key).is_some(),
            None => false,
        }
    }

    /// Returns the section called `name`, creating it if needed.  Repeated
    /// headers merge into the first section of that name.
    fn section_mut(&mut self, name: &str) -> &mut Section {
        if name == DEFAULTS_SECTION {
            return &mut self.defaults;
        }
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(i) => i,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
