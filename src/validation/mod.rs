//! Validation of policy, service and service-definition changes.
//!
//! Every entry point runs one pass through [`evaluate`]: the entity-specific
//! rule-check appends all violations to a [`FailureCollector`], and a
//! non-empty outcome becomes a single [`ValidationError`] whose message joins
//! every failure in collection order.
//!
//! Validators hold only an immutable [`MetadataIndex`](crate::metadata::MetadataIndex)
//! and may be shared across threads.

mod action;
mod engine;
mod errors;
mod failure;
mod policy;
mod rules;
mod service;
mod service_def;

pub use action::{Action, EntityKind};
pub use engine::{evaluate, RuleCheck};
pub use errors::{ValidationError, ValidationResult};
pub use failure::{
    FailureClass, FailureCollector, FailureCondition, ValidationFailureDetails,
    ValidationFailureDetailsBuilder, FAILURE_DELIMITER,
};
pub use policy::PolicyValidator;
pub use service::ServiceValidator;
pub use service_def::ServiceDefValidator;
