//! Assertion primitives shared by actions and validations.

use std::fmt::Debug;

use crate::error::StepError;
use crate::logger;

/// Compare an actual value against an expected one, logging the outcome.
///
/// On match the step keeps going; on mismatch the failure is logged at error
/// level and returned as [`StepError::Assertion`], which is fatal to the
/// scenario.
pub fn verify<T: PartialEq + Debug>(actual: T, expected: T, message: &str) -> Result<(), StepError> {
    logger::info(message);
    if actual == expected {
        logger::info(&format!("Working as expected: {message}"));
        Ok(())
    } else {
        Err(fail(&format!(
            "Failed while {message} (expected {expected:?}, got {actual:?})"
        )))
    }
}

/// Log a hard failure and build the assertion error for the caller to return.
pub fn fail(message: &str) -> StepError {
    logger::error(message);
    StepError::Assertion(message.to_string())
}
