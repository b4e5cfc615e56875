//! Data structures for unit catalogs.
//!
//! Pure data types deserialized from RON documents.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `battle_tools`.

mod catalog;

pub use catalog::UnitCatalog;
