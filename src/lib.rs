//! policyvet - schema-driven validation of access-policy definitions
//!
//! Before a policy, service or service definition is admitted into the
//! authoritative store it is checked against rules derived from the service
//! type's own metadata: its resource types, access types, enumerations and
//! configuration parameters. Every violation is collected; nothing stops at
//! the first one.
//!
//! # Subsystems
//!
//! - `model`: entities being validated
//! - `store`: the store contract validators read through
//! - `metadata`: absence-only lookups and case-insensitive name sets
//! - `validation`: the engine and the concrete validators
//! - `observability`: injected structured logging
//! - `cli`: the `policyvet` command

pub mod cli;
pub mod metadata;
pub mod model;
pub mod observability;
pub mod store;
pub mod validation;
