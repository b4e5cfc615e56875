//! # Battle Development Tools
//!
//! Command-line tools for development:
//! - Catalog and config loading
//! - Catalog validators
//! - Army previews and demo battles

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod demo;
pub mod loader;
pub mod validate;
