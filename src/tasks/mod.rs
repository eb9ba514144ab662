//! Background Tasks Module
//!
//! # Tasks
//! - Cache janitor: purges expired cache entries at a fixed interval

mod janitor;

pub use janitor::CacheJanitor;
