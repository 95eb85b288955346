use std::fmt;

use super::registry::SubmissionToken;

/// What the moderator chose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionAction {
    Approve,
    Reject,
}

impl DecisionAction {
    /// Payload prefix, without the `_` separator
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionAction::Approve => "approve",
            DecisionAction::Reject => "reject",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "approve" => Some(DecisionAction::Approve),
            "reject" => Some(DecisionAction::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed decision button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub action: DecisionAction,
    pub token: SubmissionToken,
}

impl Decision {
    /// Callback payload for a button: `approve_<token>` / `reject_<token>`
    pub fn payload(action: DecisionAction, token: &SubmissionToken) -> String {
        format!("{}_{}", action.as_str(), token)
    }

    /// Parses a callback payload. Anything that is not exactly
    /// `<approve|reject>_<token>` yields `None`.
    pub fn parse(payload: &str) -> Option<Self> {
        let (prefix, token) = payload.split_once('_')?;
        let action = DecisionAction::from_prefix(prefix)?;
        let token = SubmissionToken::parse(token)?;
        Some(Self { action, token })
    }
}

/// The two buttons attached to a review card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionControls {
    pub approve_payload: String,
    pub reject_payload: String,
}

impl DecisionControls {
    pub fn for_token(token: &SubmissionToken) -> Self {
        Self {
            approve_payload: Decision::payload(DecisionAction::Approve, token),
            reject_payload: Decision::payload(DecisionAction::Reject, token),
        }
    }
}
