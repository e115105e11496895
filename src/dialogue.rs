//! Card list dialogue module holding the per-chat order session.

use crate::order_session::OrderSession;
use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Represents the conversation state of one chat
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum CardsDialogueState {
    #[default]
    Start,
    ViewingCards {
        session: OrderSession,
        language_code: Option<String>,
        /// Message carrying the card list and its keyboard
        message_id: Option<i32>,
    },
}

/// Type alias for our cards dialogue
pub type CardsDialogue = Dialogue<CardsDialogueState, InMemStorage<CardsDialogueState>>;

/// Split a callback payload such as `remove_123.456.78` into action and argument
pub fn parse_callback_data(data: &str) -> (&str, Option<&str>) {
    match data.split_once('_') {
        Some((action, argument)) if !argument.is_empty() => (action, Some(argument)),
        Some((action, _)) => (action, None),
        None => (data, None),
    }
}
