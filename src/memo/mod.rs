//! Memoization Module
//!
//! Key derivation, get-or-compute with single-flight, and memoized function
//! wrappers built on the cache store.

mod cacheable;
pub mod key;
mod memoizer;

pub use cacheable::{Cacheable, KeyStrategy, StructuralKey};
pub use key::{build_key, build_key_from, canonical_json};
pub use memoizer::Memoizer;
