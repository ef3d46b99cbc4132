//! Domain types shared by the parsers and the store.
//!
//! Nothing in here touches the file system; the types can be built and
//! compared freely in tests.

/// Typed option values.
///
/// See [`value::Value`] for the main type.
pub mod value;
