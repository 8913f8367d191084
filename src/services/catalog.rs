use anyhow::Context;
use serde::Deserialize;

use crate::models::{Caregiver, Package, PriceTier, Qualification, ServiceType};

/// Read-only caregiver/package lookups. Reads are local and synchronous;
/// a remote-backed implementation should map lookup failures to `None` so
/// they surface as missing entities downstream.
pub trait Catalog: Send + Sync {
    fn caregivers_by_service_type(&self, service_type: ServiceType) -> Vec<Caregiver>;
    fn caregiver_by_id(&self, id: &str) -> Option<Caregiver>;
    fn package_by_id(&self, id: &str) -> Option<Package>;
    fn service_packages(&self) -> Vec<Package>;
}

pub struct StaticCatalog {
    caregivers: Vec<Caregiver>,
    packages: Vec<Package>,
}

#[derive(Deserialize)]
struct CatalogFile {
    caregivers: Vec<Caregiver>,
    packages: Vec<Package>,
}

impl StaticCatalog {
    pub fn new(caregivers: Vec<Caregiver>, packages: Vec<Package>) -> Self {
        Self {
            caregivers,
            packages,
        }
    }

    pub fn from_json_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file {path}"))?;
        let file: CatalogFile =
            serde_json::from_str(&raw).context("failed to parse catalog JSON")?;
        Ok(Self::new(file.caregivers, file.packages))
    }

    /// Built-in catalog used when no `CATALOG_PATH` is configured.
    pub fn with_default_data() -> Self {
        let caregivers = vec![
            caregiver("c1", "Zhang Wei", Qualification::Pcw, &[ServiceType::ElderlyCare]),
            caregiver(
                "c2",
                "Li Na",
                Qualification::Hw,
                &[ServiceType::ElderlyCare, ServiceType::Escort],
            ),
            caregiver(
                "c3",
                "Wang Fang",
                Qualification::Rn,
                &[ServiceType::ElderlyCare, ServiceType::MedicalStaff],
            ),
            caregiver(
                "c4",
                "Chen Jing",
                Qualification::En,
                &[ServiceType::ElderlyCare, ServiceType::MedicalStaff],
            ),
            caregiver("c5", "Liu Yang", Qualification::Pcw, &[ServiceType::Escort]),
            caregiver("c6", "Zhao Min", Qualification::Rn, &[ServiceType::MedicalStaff]),
            caregiver("c7", "Sun Li", Qualification::Hw, &[ServiceType::ElderlyCare]),
            caregiver("c8", "Zhou Qiang", Qualification::Pcw, &[ServiceType::ElderlyCare]),
        ];

        let packages = vec![
            package(
                "hourly",
                "Hourly Care",
                "Flexible care billed by the hour",
                &[(Qualification::Pcw, 50), (Qualification::Hw, 65), (Qualification::Rn, 88)],
                "hour",
            ),
            package(
                "daily",
                "Daily Care",
                "Daytime care in 8, 10 or 12 hour windows",
                &[(Qualification::Pcw, 380), (Qualification::Hw, 480), (Qualification::Rn, 680)],
                "day",
            ),
            package(
                "24hour",
                "24-Hour Live-in",
                "Around-the-clock live-in care",
                &[(Qualification::Pcw, 520), (Qualification::Hw, 650), (Qualification::Rn, 880)],
                "day",
            ),
            package(
                "monthly",
                "Monthly Care",
                "One calendar month of recurring care",
                &[
                    (Qualification::Pcw, 8800),
                    (Qualification::Hw, 11800),
                    (Qualification::Rn, 15800),
                ],
                "month",
            ),
        ];

        Self::new(caregivers, packages)
    }
}

impl Catalog for StaticCatalog {
    fn caregivers_by_service_type(&self, service_type: ServiceType) -> Vec<Caregiver> {
        self.caregivers
            .iter()
            .filter(|c| c.service_types.contains(&service_type))
            .cloned()
            .collect()
    }

    fn caregiver_by_id(&self, id: &str) -> Option<Caregiver> {
        self.caregivers.iter().find(|c| c.id == id).cloned()
    }

    fn package_by_id(&self, id: &str) -> Option<Package> {
        self.packages.iter().find(|p| p.id == id).cloned()
    }

    fn service_packages(&self) -> Vec<Package> {
        self.packages.clone()
    }
}

fn caregiver(
    id: &str,
    name: &str,
    qualification: Qualification,
    service_types: &[ServiceType],
) -> Caregiver {
    Caregiver {
        id: id.to_string(),
        name: name.to_string(),
        qualification,
        service_types: service_types.to_vec(),
    }
}

fn package(
    id: &str,
    name: &str,
    description: &str,
    prices: &[(Qualification, u32)],
    unit: &str,
) -> Package {
    Package {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        prices: prices
            .iter()
            .map(|(tier, price)| PriceTier {
                tier: *tier,
                price: *price,
                unit: unit.to_string(),
            })
            .collect(),
    }
}
