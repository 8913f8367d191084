use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Message, Qualification, Role, ServiceType};

/// Where the booking flow currently sits. Steps only advance through
/// [`crate::services::conversation::transition`]; the single permitted skip
/// is the caregiver-preselected constructor, which starts at
/// `SelectPackage`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    SelectServiceType,
    SelectQualification,
    SelectCaregiver,
    SelectPackage,
    SelectDate,
    SelectTime,
    ConfirmOrder,
    Completed,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::SelectServiceType => "select_service_type",
            Step::SelectQualification => "select_qualification",
            Step::SelectCaregiver => "select_caregiver",
            Step::SelectPackage => "select_package",
            Step::SelectDate => "select_date",
            Step::SelectTime => "select_time",
            Step::ConfirmOrder => "confirm_order",
            Step::Completed => "completed",
        }
    }
}

/// One user action against the current step. The step decides which variants
/// are expected; anything else resets the flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UserSelection {
    ServiceType(ServiceType),
    Qualification(Qualification),
    Caregiver(String),
    Package(String),
    Date(String),
    Time(String),
    Confirm,
    Restart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub step: Step,
    pub service_type: Option<ServiceType>,
    pub qualification: Option<Qualification>,
    pub caregiver_id: Option<String>,
    pub package_id: Option<String>,
    pub service_date: Option<String>,
    /// May encode a compound `"<time-range>|<period-label>"` value for
    /// monthly packages.
    pub service_time: Option<String>,
    pub messages: Vec<Message>,
    pub persona: String,
    pub created_at: NaiveDateTime,
    pub last_activity: NaiveDateTime,
}

impl Conversation {
    /// Drop every accumulated selection. Reset is total: no partial state
    /// survives a restart or an unexpected input.
    pub fn clear_selections(&mut self) {
        self.service_type = None;
        self.qualification = None;
        self.caregiver_id = None;
        self.package_id = None;
        self.service_date = None;
        self.service_time = None;
    }

    /// Whether the affordances on `message_id` are still actionable: the
    /// message must exist, carry quick replies or an interactive selection,
    /// and no later message may have `role = user`.
    pub fn selection_is_live(&self, message_id: &str) -> bool {
        let Some(pos) = self.messages.iter().position(|m| m.id == message_id) else {
            return false;
        };
        if !self.messages[pos].has_affordances() {
            return false;
        }
        !self.messages[pos + 1..].iter().any(|m| m.role == Role::User)
    }
}
