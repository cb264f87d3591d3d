//! Uspacy incoming-webhook API module
//!
//! All CRM traffic goes through the tenant- and token-scoped webhook base
//! URL. Three operations are exposed: field metadata fetch, entity search,
//! and partial update.

pub mod client;
pub mod constants;
pub mod models;

pub use client::{CrmApi, UspacyClient};
pub use models::{FieldKind, FieldMap, entity_id, field_map_from_descriptors};
