//! Markus Client - Declarative client for the Markus cinema listings API.
//!
//! The Markus XML API (used by Forum Cinemas and others) exposes theatre
//! areas, languages, news, events and show times. This crate turns loosely
//! typed call-time arguments into the API's query strings and its nested,
//! inconsistently shaped XML into uniform JSON-like documents.
//!
//! # Example
//!
//! ```
//! use markus_client::config;
//! use markus_client::registry::create_markus_registry;
//!
//! assert!(config::validate_base_url("http://forumcinemas.lv/xml").is_ok());
//!
//! let registry = create_markus_registry();
//! assert_eq!(registry.describe("shows").unwrap().path, "Schedule/");
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and validation
//! - [`error`]: Error types and Result alias
//! - [`xml`]: XML utilities
//! - [`coerce`]: Wire value conversions
//! - [`registry`]: Declarative description of every operation
//! - [`binder`]: Call-time arguments to ordered query parameters
//! - [`http`]: HTTP transport and request execution
//! - [`normalize`]: Shape-driven XML to JSON normalization
//! - [`client`]: Client facade
//! - [`cli`]: Command-line interface

pub mod binder;
pub mod cli;
pub mod client;
pub mod coerce;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod registry;
pub mod xml;

// Re-export commonly used items
pub use binder::Args;
pub use client::MarkusClient;
pub use config::{validate_base_url, ClientConfig};
pub use error::{MarkusError, Result};
pub use http::{HttpResponse, ReqwestTransport, Transport};
pub use registry::{create_markus_registry, Operation};
