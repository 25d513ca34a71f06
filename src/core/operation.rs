//! Workflow lifecycle operations exposed by the API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the seven lifecycle operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Get,
    Start,
    Terminate,
    RaiseEvent,
    Pause,
    Resume,
    Purge,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Self::Get,
        Self::Start,
        Self::Terminate,
        Self::RaiseEvent,
        Self::Pause,
        Self::Resume,
        Self::Purge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Start => "start",
            Self::Terminate => "terminate",
            Self::RaiseEvent => "raise_event",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Purge => "purge",
        }
    }

    /// Whether an unknown instance surfaces as `InstanceNotFound` rather
    /// than a generic failure of this operation
    pub fn is_not_found_capable(&self) -> bool {
        matches!(self, Self::Get | Self::Terminate | Self::Purge)
    }

    /// Only start creates instances and applies the strict id rules
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Start)
    }

    /// Present participle used in failure messages
    pub(crate) fn verb(&self) -> &'static str {
        match self {
            Self::Get => "getting",
            Self::Start => "starting",
            Self::Terminate => "terminating",
            Self::RaiseEvent => "raising event on",
            Self::Pause => "pausing",
            Self::Resume => "resuming",
            Self::Purge => "purging",
        }
    }

    /// Stable error code for a failed engine call
    pub(crate) fn failure_code(&self) -> &'static str {
        match self {
            Self::Get => "ERR_GET_WORKFLOW",
            Self::Start => "ERR_START_WORKFLOW",
            Self::Terminate => "ERR_TERMINATE_WORKFLOW",
            Self::RaiseEvent => "ERR_RAISE_EVENT_WORKFLOW",
            Self::Pause => "ERR_PAUSE_WORKFLOW",
            Self::Resume => "ERR_RESUME_WORKFLOW",
            Self::Purge => "ERR_PURGE_WORKFLOW",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_capable_operations() {
        let capable: Vec<_> = Operation::ALL
            .iter()
            .filter(|op| op.is_not_found_capable())
            .collect();
        assert_eq!(
            capable,
            vec![&Operation::Get, &Operation::Terminate, &Operation::Purge]
        );
    }

    #[test]
    fn test_only_start_creates() {
        for op in Operation::ALL {
            assert_eq!(op.is_create(), op == Operation::Start);
        }
    }
}
