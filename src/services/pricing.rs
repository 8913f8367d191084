use crate::models::{Package, PriceTier, Qualification};

/// Price tier matching the caregiver's qualification. EN-graded caregivers
/// are billed at the RN rate, so both sides of the comparison are
/// normalized first.
pub fn price_tier(package: &Package, qualification: Qualification) -> Option<&PriceTier> {
    let wanted = qualification.normalized();
    package
        .prices
        .iter()
        .find(|tier| tier.tier.normalized() == wanted)
}
