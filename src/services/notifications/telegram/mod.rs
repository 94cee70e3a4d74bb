//! Telegram delivery: MarkdownV2 formatting, the bot API adapter and the
//! provider that ties them to configuration.

mod adapter;
mod error;
pub mod formatter;
mod provider;

pub use adapter::{TelegramBotAdapter, TelegramMessenger};
pub use error::TelegramMessengerError;
pub use formatter::escape_markdown_v2;
pub use provider::TelegramProvider;
