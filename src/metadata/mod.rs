//! Metadata access for validators.
//!
//! - [`MetadataIndex`]: lookups over the store that never fail
//! - [`NameNormalizer`]: case-insensitive name sets and schema-derived
//!   helpers computed from service definitions, services and policies

mod index;
pub(crate) mod names;

pub use index::MetadataIndex;
pub use names::{NameNormalizer, NO_ENUM_INDEX};
