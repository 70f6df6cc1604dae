// ── Data widgets ──
//
// Each controller drives its host through the same explicit state machine
// and renders every state through one exhaustive `markup` dispatch.

pub mod profile;
pub mod weather;

use crate::error::CoreError;

/// Observable state of a data widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState<T> {
    /// The host carries no usable configuration; no request was made.
    Unconfigured,
    /// A fetch cycle is in flight.
    Loading,
    /// The cycle completed and produced data.
    Success(T),
    /// The cycle failed; carries the human-readable reason.
    Failure(String),
}

impl<T> WidgetState<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Short state name for logs and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Loading => "loading",
            Self::Success(_) => "success",
            Self::Failure(_) => "failure",
        }
    }

    /// Settle a fetch cycle. Configuration gaps are the empty state; every
    /// other error is a failure.
    pub(crate) fn settle(result: Result<T, CoreError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) if err.is_configuration_missing() => Self::Unconfigured,
            Err(err) => Self::Failure(err.to_string()),
        }
    }
}
