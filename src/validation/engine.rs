//! Validation orchestration.
//!
//! A pass runs in four steps:
//! 1. Start with an empty [`FailureCollector`]
//! 2. Run the entity-specific rule-check
//! 3. If it reports valid, succeed without side effects
//! 4. Otherwise join every failure into one message and fail with it
//!
//! Rule-checks never short-circuit: each appends every violation it finds so
//! one call surfaces the complete defect list.

use uuid::Uuid;

use super::action::{Action, EntityKind};
use super::errors::{ValidationError, ValidationResult};
use super::failure::{FailureCollector, ValidationFailureDetails};
use crate::model::EntityId;
use crate::observability::{Event, LogSink, SharedLog};

/// Entity-specific rules plugged into the engine.
pub trait RuleCheck {
    /// Kind of entity this check judges
    const KIND: EntityKind;

    /// Sink for checkpoint logging
    fn log(&self) -> &SharedLog;

    /// Appends every violation for the stored entity `id` under `action`.
    ///
    /// Returns true when the entity is valid. The provided body records an
    /// internal error, so a check that was never wired up rejects everything.
    fn check_rules(&self, _id: EntityId, _action: Action, failures: &mut FailureCollector) -> bool {
        failures.push(
            ValidationFailureDetails::builder()
                .is_an_internal_error()
                .because_of("unimplemented method called")
                .build(),
        );
        false
    }

    /// Validates the stored entity `id` for `action`.
    fn validate(&self, id: EntityId, action: Action) -> ValidationResult<()> {
        evaluate(
            Self::KIND,
            &id.to_string(),
            action,
            self.log().as_ref(),
            |failures| self.check_rules(id, action, failures),
        )
    }
}

/// Runs one validation pass and aggregates its outcome.
///
/// `subject` identifies the entity in log lines only.
pub fn evaluate<F>(
    kind: EntityKind,
    subject: &str,
    action: Action,
    log: &dyn LogSink,
    check: F,
) -> ValidationResult<()>
where
    F: FnOnce(&mut FailureCollector) -> bool,
{
    let validation_id = Uuid::new_v4().to_string();
    let base = [
        ("validation_id", validation_id.as_str()),
        ("kind", kind.as_str()),
        ("subject", subject),
        ("action", action.as_str()),
    ];
    log.log(Event::ValidationStart, &base);

    let mut failures = FailureCollector::new();
    if check(&mut failures) {
        log.log(Event::ValidationPassed, &base);
        return Ok(());
    }

    for failure in failures.iter() {
        let text = failure.to_string();
        log.log(
            Event::FailureRecorded,
            &[("validation_id", validation_id.as_str()), ("failure", &text)],
        );
    }

    let message = match failures.serialize() {
        Some(message) => message,
        None => {
            log.log(Event::EmptyFailureList, &base);
            String::new()
        }
    };

    {
        let count = failures.len().to_string();
        let mut fields = base.to_vec();
        fields.push(("failure_count", count.as_str()));
        fields.push(("message", message.as_str()));
        log.log(Event::ValidationFailed, &fields);
    }

    Err(ValidationError::new(kind, action, message, failures.into_vec()))
}
