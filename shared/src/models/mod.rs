//! Domain models for the Stock Admin dashboard
//!
//! Field names are English; the `serde` renames match the JSON served by the
//! inventory backend.

mod article;
mod order;
mod sale;
mod supplier;

pub use article::*;
pub use order::*;
pub use sale::*;
pub use supplier::*;
