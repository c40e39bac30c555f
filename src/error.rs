//! Error types for the scheduling core.

use thiserror::Error;

/// Errors raised while parsing the wire formats the scheduling core works
/// with. Derivations over well-formed input never fail; a missing or
/// disabled day simply yields no slots.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid time string: {0}")]
    BadTimeFormat(String),

    #[error("Invalid date string: {0}")]
    BadDateFormat(String),

    #[error("Unsupported appointment duration: {0}")]
    BadDuration(String),
}
