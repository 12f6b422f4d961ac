//! Bot platform abstraction.
//!
//! This module provides a `BotApi` trait covering the three platform calls the
//! pipeline needs (send a message, resolve a file id, fetch file bytes) and an
//! HTTP implementation against the Telegram Bot API.

mod client;
mod types;

pub use client::TelegramBotClient;
pub use types::*;
