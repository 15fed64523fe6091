//! pagecast domain crate
//!
//! Core logic of the Facebook Page bots, following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `sanitize`: Link stripping applied to every caption
//! - `odds`: Betting pick selection
//! - `usecases`: Fallback resolvers, text composer and the run-once pipeline

pub mod model;
pub mod odds;
pub mod ports;
pub mod sanitize;
pub mod usecases;

pub use model::*;
pub use ports::*;
