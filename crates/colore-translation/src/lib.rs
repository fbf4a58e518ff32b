//! CoLore: translation.
//!
//! Validates translation requests, keeps the language catalogue, and tries a
//! chain of public translation services until one answers.

pub mod application;
pub mod domain;
pub mod error;
pub mod providers;
