use serde::{Deserialize, Serialize};

use super::ServiceType;

pub const CHECKOUT_ITEM_TYPE: &str = "elderly_service";

/// Fully-resolved booking handed to the external checkout collaborator on
/// confirmation. Opaque beyond construction — delivery is the collaborator's
/// problem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutPayload {
    pub item_type: String,
    pub caregiver_id: String,
    pub package_id: String,
    pub service_type: ServiceType,
    /// `"<service-type-label>-<package-name>-<caregiver-name>(<qualification>)"`
    pub item_name: String,
    pub price: u32,
    pub service_date: String,
    pub service_time: String,
}
