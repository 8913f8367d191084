use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    ElderlyCare,
    Escort,
    MedicalStaff,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ElderlyCare => "elderly-care",
            ServiceType::Escort => "escort",
            ServiceType::MedicalStaff => "medical-staff",
        }
    }

    /// Human-readable label, used in prompts and the checkout item name.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::ElderlyCare => "Elderly Care",
            ServiceType::Escort => "Escort Service",
            ServiceType::MedicalStaff => "Medical Staff",
        }
    }
}

/// Caregiver qualification badge. `EN` is accepted on caregiver profiles but
/// is billed at the `RN` rate — see [`Qualification::normalized`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Qualification {
    #[serde(rename = "PCW")]
    Pcw,
    #[serde(rename = "HW")]
    Hw,
    #[serde(rename = "RN")]
    Rn,
    #[serde(rename = "EN")]
    En,
}

impl Qualification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualification::Pcw => "PCW",
            Qualification::Hw => "HW",
            Qualification::Rn => "RN",
            Qualification::En => "EN",
        }
    }

    /// Collapse the EN alias onto RN for price-tier and filter lookups.
    pub fn normalized(self) -> Self {
        match self {
            Qualification::En => Qualification::Rn,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Caregiver {
    pub id: String,
    pub name: String,
    pub qualification: Qualification,
    pub service_types: Vec<ServiceType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceTier {
    #[serde(rename = "type")]
    pub tier: Qualification,
    pub price: u32,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub description: String,
    pub prices: Vec<PriceTier>,
}
