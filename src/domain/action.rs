use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Discrete user actions that earn XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Publishing a post
    CreatePost,
    /// Giving a prayer (prayer-type comment on a post)
    Prayer,
    /// Giving guidance (guidance-type comment on a post)
    Guidance,
    /// Plain comment
    Comment,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::CreatePost,
        ActionKind::Prayer,
        ActionKind::Guidance,
        ActionKind::Comment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatePost => "post",
            Self::Prayer => "prayer",
            Self::Guidance => "guidance",
            Self::Comment => "comment",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" | "create_post" => Ok(Self::CreatePost),
            "prayer" => Ok(Self::Prayer),
            "guidance" => Ok(Self::Guidance),
            "comment" => Ok(Self::Comment),
            other => Err(CoreError::Validation {
                what: "action kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of comment left through the contribution flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    Prayer,
    Guidance,
    Comment,
}

impl ContributionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prayer => "prayer",
            Self::Guidance => "guidance",
            Self::Comment => "comment",
        }
    }

    /// The action credited to the contributor
    pub fn action(&self) -> ActionKind {
        match self {
            Self::Prayer => ActionKind::Prayer,
            Self::Guidance => ActionKind::Guidance,
            Self::Comment => ActionKind::Comment,
        }
    }
}

impl std::fmt::Display for ContributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContributionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prayer" => Ok(Self::Prayer),
            "guidance" => Ok(Self::Guidance),
            "comment" => Ok(Self::Comment),
            other => Err(CoreError::Validation {
                what: "contribution kind",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_parse() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
        assert!(matches!(
            "pray".parse::<ActionKind>(),
            Err(CoreError::Validation { what: "action kind", .. })
        ));
    }

    #[test]
    fn test_contribution_maps_to_action() {
        assert_eq!(ContributionKind::Prayer.action(), ActionKind::Prayer);
        assert_eq!(ContributionKind::Guidance.action(), ActionKind::Guidance);
        assert_eq!(ContributionKind::Comment.action(), ActionKind::Comment);
    }
}
