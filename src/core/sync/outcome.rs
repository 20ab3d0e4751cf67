/*!
 * Wait Outcomes
 *
 * Three-way result of every gate wait, plus a `Result` view for `?` users.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for callers that treat anything but `ConditionMet` as an error
pub type WaitResult<T> = Result<T, WaitError>;

/// Why a wait returned
///
/// Precedence when several apply at once: `Disabled`, then `Timeout`, then
/// `ConditionMet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitOutcome {
    /// The predicate held while the gate was enabled
    ConditionMet,
    /// The timeout elapsed before the predicate held
    Timeout,
    /// The gate was (or became) disabled
    Disabled,
}

impl WaitOutcome {
    #[inline(always)]
    pub fn is_condition_met(&self) -> bool {
        matches!(self, WaitOutcome::ConditionMet)
    }

    #[inline(always)]
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitOutcome::Timeout)
    }

    #[inline(always)]
    pub fn is_disabled(&self) -> bool {
        matches!(self, WaitOutcome::Disabled)
    }

    /// `Ok(())` on `ConditionMet`, the matching error otherwise
    pub fn into_result(self) -> WaitResult<()> {
        match self {
            WaitOutcome::ConditionMet => Ok(()),
            WaitOutcome::Timeout => Err(WaitError::Timeout),
            WaitOutcome::Disabled => Err(WaitError::Disabled),
        }
    }
}

impl From<WaitOutcome> for WaitResult<()> {
    fn from(outcome: WaitOutcome) -> Self {
        outcome.into_result()
    }
}

/// Wait failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", rename_all = "snake_case")]
pub enum WaitError {
    #[error("Wait operation timed out")]
    #[diagnostic(
        code(gate::timeout),
        help("The value never satisfied the predicate. Check the producer side or raise the timeout.")
    )]
    Timeout,

    #[error("Gate is disabled")]
    #[diagnostic(
        code(gate::disabled),
        help("The gate was shut down. Call enable() before waiting again.")
    )]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        assert_eq!(WaitOutcome::ConditionMet.into_result(), Ok(()));
        assert_eq!(WaitOutcome::Timeout.into_result(), Err(WaitError::Timeout));
        assert_eq!(WaitOutcome::Disabled.into_result(), Err(WaitError::Disabled));
    }

    #[test]
    fn test_predicates() {
        assert!(WaitOutcome::Disabled.is_disabled());
        assert!(!WaitOutcome::Disabled.is_condition_met());
        assert!(WaitOutcome::Timeout.is_timeout());
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&WaitOutcome::ConditionMet).unwrap();
        assert_eq!(json, "\"condition_met\"");

        let json = serde_json::to_string(&WaitError::Disabled).unwrap();
        assert_eq!(json, r#"{"error_type":"disabled"}"#);
    }
}
