//! # Bot Configuration Module
//!
//! Runtime settings read from environment variables (optionally loaded from
//! a `.env` file by `main`).

use anyhow::{Context, Result};
use std::path::PathBuf;
use teloxide::types::UserId;

// Environment variable names
pub const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const ORDERS_FILE_VAR: &str = "ORDERS_FILE";
pub const ADMIN_ID_VAR: &str = "ADMIN_ID";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

pub const DEFAULT_ORDERS_FILE: &str = "orders.json";

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings shared with every handler
#[derive(Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Telegram Bot API token
    pub bot_token: String,
    /// JSON file holding confirmed orders
    pub orders_file: PathBuf,
    /// Telegram user allowed to list orders and notified of new ones.
    /// `None` disables both.
    pub admin_id: Option<UserId>,
    pub log_format: LogFormat,
}

// The token is a credential and never shows up in logs
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("orders_file", &self.orders_file)
            .field("admin_id", &self.admin_id)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl BotConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = non_empty(BOT_TOKEN_VAR)
            .with_context(|| format!("{BOT_TOKEN_VAR} must be set"))?;

        let orders_file = non_empty(ORDERS_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ORDERS_FILE));

        let admin_id = match non_empty(ADMIN_ID_VAR) {
            Some(raw) => {
                let id = raw
                    .parse::<u64>()
                    .with_context(|| format!("{ADMIN_ID_VAR} must be a numeric Telegram user id, got '{raw}'"))?;
                Some(UserId(id))
            }
            None => None,
        };

        let log_format = match non_empty(LOG_FORMAT_VAR).as_deref() {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            bot_token,
            orders_file,
            admin_id,
            log_format,
        })
    }

    /// Whether `user_id` is the configured administrator
    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admin_id == Some(user_id)
    }
}
