//! Fix generation, validation, and application.

mod applicator;
mod generator;
mod types;
mod validator;

pub use applicator::FixApplicator;
pub use generator::{generate_fix, generate_fixes};
pub use types::{ApplyResult, Fix, FixKind, LineChange, RestoreResult, SyntaxCheck, TestOutcome};
pub use validator::{run_tests, validate_fix, validate_syntax};
