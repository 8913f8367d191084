use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{
    CheckoutPayload, Message, Qualification, ServiceType, Step, UserSelection,
};
use crate::services::{conversation, freeform};
use crate::state::AppState;

// POST /api/chat/sessions
#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    pub caregiver_id: Option<String>,
    pub service_type: Option<ServiceType>,
    pub qualification: Option<Qualification>,
    pub persona: Option<String>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub step: Step,
    pub messages: Vec<Message>,
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let id = uuid::Uuid::new_v4().to_string();
    let persona = req
        .persona
        .unwrap_or_else(|| state.config.default_persona.clone());

    let conv = match (req.caregiver_id, req.service_type, req.qualification) {
        (Some(caregiver_id), Some(service_type), Some(qualification)) => {
            let caregiver = state
                .catalog
                .caregiver_by_id(&caregiver_id)
                .ok_or_else(|| AppError::NotFound(format!("caregiver {caregiver_id}")))?;
            conversation::with_preselected_caregiver(
                &id,
                &persona,
                &caregiver,
                service_type,
                qualification,
                state.catalog.as_ref(),
            )
        }
        (None, None, None) => conversation::new_conversation(&id, &persona),
        _ => {
            return Err(AppError::BadRequest(
                "caregiver_id, service_type and qualification must be provided together".to_string(),
            ))
        }
    };

    tracing::info!(session = %id, step = conv.step.as_str(), "created session");

    let response = SessionResponse {
        session_id: id.clone(),
        step: conv.step,
        messages: conv.messages.clone(),
    };
    state.sessions.lock().unwrap().insert(id, conv);

    Ok(Json(response))
}

// GET /api/chat/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let sessions = state.sessions.lock().unwrap();
    let conv = sessions
        .get(&id)
        .ok_or_else(|| AppError::SessionNotFound(id.clone()))?;

    Ok(Json(SessionResponse {
        session_id: id,
        step: conv.step,
        messages: conv.messages.clone(),
    }))
}

// POST /api/chat/sessions/:id/select
#[derive(Deserialize)]
pub struct SelectRequest {
    /// The assistant message whose affordance was tapped. Rejected as stale
    /// when a later user turn exists.
    pub message_id: String,
    pub selection: UserSelection,
}

#[derive(Serialize)]
pub struct SelectResponse {
    pub step: Step,
    pub reply: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutPayload>,
}

pub async fn select(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, AppError> {
    let today = Utc::now().date_naive();

    // The whole transition commits under the session lock, so overlapping
    // taps observe the appended user turn and fail the liveness check.
    let (step, outcome) = {
        let mut sessions = state.sessions.lock().unwrap();
        let conv = sessions
            .get(&id)
            .ok_or_else(|| AppError::SessionNotFound(id.clone()))?;

        if !conv.selection_is_live(&req.message_id) {
            tracing::info!(session = %id, message_id = %req.message_id, "ignoring stale selection");
            return Err(AppError::StaleSelection);
        }

        let (conv, outcome) = conversation::transition(
            conv.clone(),
            req.selection,
            state.catalog.as_ref(),
            today,
        )?;
        let step = conv.step;
        sessions.insert(id.clone(), conv);
        (step, outcome)
    };

    typing_pause(&state).await;

    if let Some(payload) = &outcome.checkout {
        if let Err(e) = state.checkout.submit(payload).await {
            // Delivery belongs to the checkout collaborator; the booking
            // conversation itself has already completed.
            tracing::error!(error = %e, session = %id, "checkout handoff failed");
        }
    }

    Ok(Json(SelectResponse {
        step,
        reply: outcome.reply,
        checkout: outcome.checkout,
    }))
}

// POST /api/chat/sessions/:id/message — freeform text outside the booking flow
#[derive(Deserialize)]
pub struct FreeformRequest {
    pub text: String,
    pub model_id: Option<String>,
}

#[derive(Serialize)]
pub struct FreeformResponse {
    pub reply: Message,
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FreeformRequest>,
) -> Result<Json<FreeformResponse>, AppError> {
    let reply = {
        let mut sessions = state.sessions.lock().unwrap();
        let conv = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::SessionNotFound(id.clone()))?;

        if let Some(model_id) = req.model_id {
            conv.persona = model_id;
        }

        conv.messages.push(Message::user(req.text.clone()));
        let reply = Message::assistant(freeform::respond(&req.text, &conv.persona));
        conv.messages.push(reply.clone());
        conv.last_activity = Utc::now().naive_utc();
        reply
    };

    typing_pause(&state).await;

    Ok(Json(FreeformResponse { reply }))
}

async fn typing_pause(state: &Arc<AppState>) {
    if state.config.typing_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.config.typing_delay_ms)).await;
    }
}
