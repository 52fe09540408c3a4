//! Failure constructors shared by the concrete validators.

use std::collections::HashSet;

use super::failure::{ValidationFailureDetails, ValidationFailureDetailsBuilder};

pub(crate) fn missing(field: &str, sub: Option<&str>, reason: impl Into<String>) -> ValidationFailureDetails {
    with_sub(ValidationFailureDetails::builder().field(field), sub)
        .is_missing()
        .because_of(reason)
        .build()
}

pub(crate) fn invalid(field: &str, sub: Option<&str>, reason: impl Into<String>) -> ValidationFailureDetails {
    with_sub(ValidationFailureDetails::builder().field(field), sub)
        .is_invalid_value()
        .because_of(reason)
        .build()
}

pub(crate) fn not_found(field: &str, reason: impl Into<String>) -> ValidationFailureDetails {
    ValidationFailureDetails::builder()
        .field(field)
        .is_not_found()
        .because_of(reason)
        .build()
}

pub(crate) fn internal(field: &str, sub: Option<&str>, reason: impl Into<String>) -> ValidationFailureDetails {
    with_sub(ValidationFailureDetails::builder().field(field), sub)
        .is_an_internal_error()
        .is_invalid_value()
        .because_of(reason)
        .build()
}

fn with_sub(builder: ValidationFailureDetailsBuilder, sub: Option<&str>) -> ValidationFailureDetailsBuilder {
    match sub {
        Some(s) => builder.sub_field(s),
        None => builder,
    }
}

/// `a - b`, sorted so failures come out in a stable order.
pub(crate) fn sorted_difference<'a>(a: &'a HashSet<String>, b: &'a HashSet<String>) -> Vec<&'a str> {
    let mut out: Vec<&str> = a.difference(b).map(String::as_str).collect();
    out.sort_unstable();
    out
}

/// Lower-cased names that occur more than once, sorted.
pub(crate) fn duplicates_ignoring_case<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut dups = HashSet::new();
    for name in names {
        let lower = name.to_lowercase();
        if !seen.insert(lower.clone()) {
            dups.insert(lower);
        }
    }
    let mut out: Vec<String> = dups.into_iter().collect();
    out.sort_unstable();
    out
}
