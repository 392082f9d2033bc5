use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Lifetime of an issued session token, in hours.
    pub session_ttl_hours: i64,
    /// SMTP connection URL for the bulk-email relay. When unset, bulk email
    /// is disabled and send requests report an external-service error.
    pub smtp_url: Option<String>,
    /// From address for outgoing mail.
    pub mail_from: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/ticketflow".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_HOURS),
            smtp_url: env::var("SMTP_URL").ok(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "TicketFlow <tickets@ticketflow.local>".to_string()),
        }
    }
}
