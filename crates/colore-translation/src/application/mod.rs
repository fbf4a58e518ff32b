//! Translation use cases.

pub mod fallback;
