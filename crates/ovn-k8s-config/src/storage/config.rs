//! The configuration store: `ovn_k8s.conf` loaded once, queried read-only.
//!
//! The file lives in the process working directory and uses INI syntax:
//!
//! ```ini
//! [default]
//! workers = 4
//! debug = True
//! tags = ["a","b"]
//! name = ovn-node
//! ```
//!
//! # Typed lookups
//!
//! [`ConfigStore::get_option`] returns a [`Value`].  The raw text of the
//! option is first read as a literal (`4` → `Value::Int(4)`, `True` →
//! `Value::Bool(true)`, `["a","b"]` → a list).  If that fails for *any*
//! reason the raw text comes back unchanged as `Value::Str`; callers can
//! only tell the two cases apart by the variant.
//!
//! Note that booleans must be capitalised: `true` is not a literal and is
//! returned as the string `"true"`.
//!
//! # Lifecycle
//!
//! Build one store at startup with [`ConfigStore::load`] and pass it by
//! reference (or in an `Arc`) to whatever needs it.  Loading is fail-fast:
//! a missing, unreadable or malformed file is an error and no store exists.
//! Nothing is cached beyond the parsed file; every lookup re-derives its value.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::value::Value;
use crate::ini::{parse_ini, IniDocument, IniError};
use crate::literal::parse_literal;

pub use crate::ini::LookupError;

/// File name of the configuration file, resolved against the working
/// directory.
pub const CONFIG_FILE_NAME: &str = "ovn_k8s.conf";

/// Section used when the caller does not name one.
pub const DEFAULT_SECTION: &str = "default";

/// Error type for loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The file is missing or could not be read.
    #[error("error when reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid INI.
    #[error("error when parsing config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: IniError,
    },
}

/// Immutable, parsed configuration.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    document: IniDocument,
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl ConfigStore {
    /// Loads [`CONFIG_FILE_NAME`] from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::Io`] if the file is missing or unreadable
    /// and [`ConfigLoadError::Parse`] if it is not valid INI.
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::from_path(CONFIG_FILE_NAME)
    }

    /// Loads [`CONFIG_FILE_NAME`] from `dir`.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigStore::load`].
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        Self::from_path(dir.as_ref().join(CONFIG_FILE_NAME))
    }

    /// Loads the INI file at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigStore::load`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref().to_path_buf();
        debug!(path = %path.display(), "reading configuration file");

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let document = parse_ini(&content).map_err(|source| ConfigLoadError::Parse {
            path: path.clone(),
            source,
        })?;

        info!(
            path = %path.display(),
            sections = document.section_names().count(),
            "configuration loaded"
        );
        Ok(Self {
            path: Some(path),
            document,
        })
    }

    /// Wraps an already parsed document.
    pub fn from_document(document: IniDocument) -> Self {
        Self {
            path: None,
            document,
        }
    }

    /// The file this store was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The underlying parsed document.
    pub fn document(&self) -> &IniDocument {
        &self.document
    }
}

impl FromStr for ConfigStore {
    type Err = IniError;

    /// Parses INI text directly, without touching the file system.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_ini(text).map(Self::from_document)
    }
}

// ── Lookups ───────────────────────────────────────────────────────────────────

impl ConfigStore {
    /// Fetches `option` from the [`DEFAULT_SECTION`] section.
    ///
    /// Equivalent to `get_option_in(option, DEFAULT_SECTION)`.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::get_option_in`].
    pub fn get_option(&self, option: &str) -> Result<Value, LookupError> {
        self.get_option_in(option, DEFAULT_SECTION)
    }

    /// Fetches `option` from `section`, typed as a literal when possible.
    ///
    /// # Errors
    ///
    /// - [`LookupError::SectionNotFound`] if `section` does not exist.
    /// - [`LookupError::OptionNotFound`] if the option is not defined there
    ///   (nor in `[DEFAULT]`).
    ///
    /// A value that is not a valid literal is never an error; it is returned
    /// as [`Value::Str`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ovn_k8s_config::{ConfigStore, Value};
    ///
    /// let store: ConfigStore = "[net]\nmtu = 1400\nflag = true\n".parse().unwrap();
    /// assert_eq!(store.get_option_in("mtu", "net").unwrap(), Value::Int(1400));
    /// assert_eq!(store.get_option_in("flag", "net").unwrap(), Value::Str("true".into()));
    /// ```
    pub fn get_option_in(&self, option: &str, section: &str) -> Result<Value, LookupError> {
        let raw = self.document.get(section, option)?;
        Ok(parse_literal(raw).unwrap_or_else(|| Value::Str(raw.to_string())))
    }

    /// Fetches the raw text of `option` in `section` without literal parsing.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigStore::get_option_in`].
    pub fn get_raw(&self, option: &str, section: &str) -> Result<&str, LookupError> {
        self.document.get(section, option)
    }

    /// Section names in file order, excluding `[DEFAULT]`.
    pub fn sections(&self) -> Vec<&str> {
        self.document.section_names().collect()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.document.has_section(section)
    }

    /// Option names visible in `section`, including inherited defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::SectionNotFound`] if `section` does not exist.
    pub fn options(&self, section: &str) -> Result<Vec<&str>, LookupError> {
        self.document.options(section)
    }

    pub fn has_option(&self, option: &str, section: &str) -> bool {
        self.document.has_option(section, option)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
