//! Log enrichment.
//!
//! - Entry Builder: turns a payload and optional request into message + metadata
//! - Log Enricher: severity-tagged entry points writing to an injected sink

mod builder;
mod enricher;

pub use builder::*;
pub use enricher::*;
