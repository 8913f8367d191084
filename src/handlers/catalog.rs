use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Caregiver, Package, Qualification, ServiceType};
use crate::state::AppState;

// GET /api/catalog/caregivers?service_type=...&qualification=...
#[derive(Deserialize)]
pub struct CaregiversQuery {
    pub service_type: ServiceType,
    pub qualification: Option<Qualification>,
}

pub async fn list_caregivers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CaregiversQuery>,
) -> Json<Vec<Caregiver>> {
    let mut caregivers = state.catalog.caregivers_by_service_type(query.service_type);
    if let Some(qualification) = query.qualification {
        caregivers.retain(|c| c.qualification.normalized() == qualification.normalized());
    }
    Json(caregivers)
}

// GET /api/catalog/caregivers/:id
pub async fn get_caregiver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Caregiver>, AppError> {
    state
        .catalog
        .caregiver_by_id(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("caregiver {id}")))
}

// GET /api/catalog/packages
pub async fn list_packages(State(state): State<Arc<AppState>>) -> Json<Vec<Package>> {
    Json(state.catalog.service_packages())
}

// GET /api/catalog/packages/:id
pub async fn get_package(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Package>, AppError> {
    state
        .catalog
        .package_by_id(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("package {id}")))
}
