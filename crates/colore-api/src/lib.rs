//! CoLore API: translation and health endpoints.

pub mod error;
pub mod routes;
pub mod state;
