//! Domain types for GCP Logger.
//!
//! This module contains the values that flow through the enricher:
//! payloads, severities, user identities and request metadata.

mod metadata;
mod payload;
mod severity;
mod user;

pub use metadata::*;
pub use payload::*;
pub use severity::*;
pub use user::*;
