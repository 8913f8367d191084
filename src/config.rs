use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Where confirmed bookings are posted. Empty = log and skip (dev mode).
    pub checkout_url: String,
    /// Optional JSON catalog; the built-in catalog is used when unset.
    pub catalog_path: Option<String>,
    /// Cosmetic "assistant is typing" pause before a reply is returned.
    pub typing_delay_ms: u64,
    pub default_persona: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            checkout_url: env::var("CHECKOUT_URL").unwrap_or_default(),
            catalog_path: env::var("CATALOG_PATH").ok(),
            typing_delay_ms: env::var("TYPING_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            default_persona: env::var("DEFAULT_PERSONA")
                .unwrap_or_else(|_| "care-companion".to_string()),
        }
    }
}
