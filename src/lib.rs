//! lexifetch library
//!
//! Query adapters for dictionary, translation, and slang lookups behind a
//! shared cached web-fetch layer, formatted as launcher display items.
//! Exposed as a library so integration tests can drive the components
//! directly.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod error;
pub mod output;
pub mod player;
