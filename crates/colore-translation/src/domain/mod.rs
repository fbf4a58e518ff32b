//! Translation domain types.

pub mod language;
pub mod request;
