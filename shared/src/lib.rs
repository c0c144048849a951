//! Shared types and rules for the Stock Admin dashboard
//!
//! This crate contains the domain model, wire formats and pure business
//! rules shared between the backend, the browser shell (via WASM), and
//! the tests. Nothing here performs I/O.

pub mod models;
pub mod types;
pub mod ui;
pub mod validation;

pub use models::*;
pub use types::*;
pub use ui::*;
pub use validation::*;
