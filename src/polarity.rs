//! The three-valued expectation flag carried by every validation step.
//!
//! Step sentences phrase checks as "is displayed" or "is not displayed", and
//! the matcher hands the flag through as an optional boolean. Only an explicit
//! `false` flips the expectation; an absent flag and an explicit `true` both
//! mean "expect the condition to hold". That literal contract is preserved
//! here rather than second-guessed.

/// Whether a check expects its condition to hold or to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Expect the condition to hold (the default).
    #[default]
    Affirm,
    /// Expect the condition to fail ("is not ...").
    Negate,
}

impl Polarity {
    /// The boolean verdict this polarity expects.
    pub fn expected(self) -> bool {
        matches!(self, Polarity::Affirm)
    }

    /// Pick the affirmed or negated message for failure reporting.
    pub fn message<'a>(self, affirm: &'a str, negate: &'a str) -> &'a str {
        match self {
            Polarity::Affirm => affirm,
            Polarity::Negate => negate,
        }
    }
}

impl From<Option<bool>> for Polarity {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(false) => Polarity::Negate,
            _ => Polarity::Affirm,
        }
    }
}

impl From<bool> for Polarity {
    fn from(flag: bool) -> Self {
        Polarity::from(Some(flag))
    }
}
