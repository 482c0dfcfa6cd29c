//! Data models for the gift registry.
//!
//! These models match the frontend JSON shapes exactly (camelCase fields).

mod catalog;
mod gift;

pub use catalog::*;
pub use gift::*;
