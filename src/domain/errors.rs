use std::fmt;
use thiserror::Error;

/// A single broken configuration invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Configuration rejected at load time.
///
/// Carries every violated invariant, in the order they were checked, so a
/// deploying engineer can fix the whole configuration in one pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid configuration ({} violation(s)): {}", .violations.len(), join(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// True if any violation is reported against `field`
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accumulates violations while a configuration is being checked
#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.push(Violation::new(field, reason));
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Violation>) {
        self.0.extend(other);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ok when nothing was recorded, otherwise the full `ValidationError`
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.0))
        }
    }

    /// Like [`finish`](Self::finish), yielding the checked value.
    ///
    /// A `None` with nothing recorded is still rejected, reported against
    /// `field`, so the error is never empty.
    pub fn finish_with<T>(self, field: &str, value: Option<T>) -> Result<T, ValidationError> {
        if !self.0.is_empty() {
            return Err(ValidationError::new(self.0));
        }
        value.ok_or_else(|| {
            ValidationError::new(vec![Violation::new(
                field,
                "rejected without a recorded reason",
            )])
        })
    }
}
