use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::AppConfig;
use crate::models::Conversation;
use crate::services::catalog::Catalog;
use crate::services::checkout::CheckoutProvider;

/// Sessions live in memory only; a restart drops them by design.
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Box<dyn Catalog>,
    pub checkout: Box<dyn CheckoutProvider>,
    pub sessions: Mutex<HashMap<String, Conversation>>,
}
