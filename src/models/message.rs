use serde::{Deserialize, Serialize};

use super::{Caregiver, Package};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuickReply {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl QuickReply {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Tappable card list attached to an assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "candidates", rename_all = "snake_case")]
pub enum InteractiveSelection {
    Caregivers(Vec<Caregiver>),
    Packages(Vec<Package>),
}

/// One turn in the conversation log. Quick replies and interactive
/// selections are only actionable while no later message has `role = user`
/// — the most recent assistant turn owns the live affordances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<QuickReply>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<InteractiveSelection>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            quick_replies: None,
            selection: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            quick_replies: None,
            selection: None,
        }
    }

    pub fn with_quick_replies(mut self, replies: Vec<QuickReply>) -> Self {
        self.quick_replies = Some(replies);
        self
    }

    pub fn with_selection(mut self, selection: InteractiveSelection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn has_affordances(&self) -> bool {
        self.quick_replies.is_some() || self.selection.is_some()
    }
}
