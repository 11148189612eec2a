//! Data model of the Bot Connector REST API
//!
//! Instead of one generated struct per API schema type, record types are data:
//! each type is an ordered list of field descriptors held in a [`Registry`].
//! A single [`Record`] type then provides for every schema type:
//!
//! - checked getters and chainable setters
//! - JSON encoding and decoding that omits absent fields and skips unknown keys
//! - structural equality and hashing where an absent field only equals absent
//! - an indented, deterministic text rendering for logs and assertions
//!
//! The crate is organized into several modules:
//!
//! - `model`: record types, the registry, values and the JSON codec
//! - `error`: Error types and handling
//!
//! The bot connector schema itself is available as [`CONNECTOR`].
//!
//! ```
//! use bot_connector_model::CONNECTOR;
//!
//! let mut thing = CONNECTOR.record("Thing").unwrap();
//! thing.set("type", "Place").unwrap().set("name", "Home").unwrap();
//! assert_eq!(thing.to_json().to_string(), r#"{"type":"Place","name":"Home"}"#);
//! ```
pub mod error;
pub mod model;

pub use model::*;
