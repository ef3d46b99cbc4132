//! Storage: reading the configuration file from disk.
//!
//! The `config` sub-module owns [`config::ConfigStore`], the only component
//! that touches the file system.  Parsing itself lives in [`crate::ini`] and
//! [`crate::literal`], so both can be tested without any files.

pub mod config;
