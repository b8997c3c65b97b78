//! Messaging delivery: the messenger port and the Telegram adapter.

pub(crate) mod messenger;
pub(crate) mod telegram;

pub use messenger::{Messenger, PhotoMessage};
pub use telegram::TelegramMessenger;
