//! Shared domain enumerations aligned with persisted column values.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Action recorded in `activity_logs.action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    NewPost,
}

impl ActivityAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityAction::NewPost => "new_post",
        }
    }
}

impl FromStr for ActivityAction {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "new_post" => Ok(ActivityAction::NewPost),
            other => Err(DomainError::unknown_variant("activity action", other)),
        }
    }
}
