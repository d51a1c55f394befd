//! Operation description registry.
//!
//! A fixed, declarative table mapping each API operation to its HTTP path,
//! parameter rules and response shape. The table is built once and never
//! modified afterwards.

mod config;
mod core;
mod types;

pub use config::{create_markus_registry, LIST_TYPE_COMING_SOON, LIST_TYPE_NOW_IN_THEATRES};
pub use core::OperationRegistry;
pub use types::{Operation, OperationDescriptor};
