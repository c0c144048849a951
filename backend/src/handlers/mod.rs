//! HTTP handlers for the admin API

pub mod association;
pub mod health;
pub mod inventory;
pub mod order;
pub mod sales;
pub mod supplier;

pub use association::*;
pub use health::*;
pub use inventory::*;
pub use order::*;
pub use sales::*;
pub use supplier::*;
