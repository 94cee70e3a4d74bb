//! Minimal Telegram Bot API client.

mod client;
mod types;

pub use client::{BotApiError, HttpTelegramBotApi, TelegramBotApi};
pub use types::{ChatId, ParseMode, SendMessageRequest};
