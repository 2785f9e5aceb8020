use thiserror::Error;

/// Failures a step can surface to the scenario runner.
///
/// Driver errors are not represented here: they are logged at warn level with
/// the raw message and then promoted to [`StepError::Assertion`] with a
/// contextual message, so the scenario runner only ever sees these two kinds.
#[derive(Debug, Error)]
pub enum StepError {
    /// An expected/actual mismatch. Fatal to the running scenario.
    #[error("{0}")]
    Assertion(String),

    /// A caller passed a selection keyword other than `name`, `value` or
    /// `text`. This is a programming error in the step definition, raised
    /// immediately without going through the log/assert pipeline.
    #[error("unknown selection type \"{0}\"")]
    UnknownSelectionType(String),
}

pub type StepResult<T> = Result<T, StepError>;
