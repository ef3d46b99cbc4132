//! # ovn-k8s-config
//!
//! Startup configuration for the ovn-kubernetes node and master services.
//!
//! The services read one INI file, `ovn_k8s.conf`, from their working
//! directory when they start.  Every option in that file is plain text, but
//! callers usually want typed values: a worker count, a feature flag, a list
//! of CIDRs.  [`ConfigStore::get_option`] therefore tries to read each value as
//! a *literal* first and only falls back to the raw text when that fails.
//!
//! # Architecture overview (for beginners)
//!
//! - **`ini`** – Turns INI text (`[section]` headers and `key = value` lines)
//!   into an in-memory [`IniDocument`].  Knows nothing about types.
//!
//! - **`literal`** – A tiny, side-effect-free parser for constant expressions
//!   such as `42`, `True`, `'eth0'` or `{'mtu': 1400}`.  It never executes
//!   anything; it either recognises the whole string or gives up.
//!
//! - **`domain`** – The [`Value`] type produced by the literal parser.
//!
//! - **`storage`** – [`ConfigStore`], the one thing most callers touch.  It
//!   loads the file exactly once and answers lookups read-only.
//!
//! ```rust
//! use ovn_k8s_config::{ConfigStore, Value};
//!
//! let store: ConfigStore = "[default]\nworkers = 4\nname = ovn-node\n".parse().unwrap();
//! assert_eq!(store.get_option("workers").unwrap(), Value::Int(4));
//! assert_eq!(store.get_option("name").unwrap(), Value::Str("ovn-node".into()));
//! ```

pub mod domain;
pub mod ini;
pub mod literal;
pub mod storage;

pub use domain::value::Value;
pub use ini::{parse_ini, IniDocument, IniError};
pub use literal::{parse_literal, try_parse_literal, LiteralError};
pub use storage::config::{
    ConfigLoadError, ConfigStore, LookupError, CONFIG_FILE_NAME, DEFAULT_SECTION,
};
