//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use sqlx::postgres::PgPool;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::bot_config::BotConfig;
use crate::dialogue::{parse_callback_data, CardsDialogue, CardsDialogueState};

// Import session actions
use super::session_manager::{
    clear_session, copy_value, refresh_cards, send_export, send_print_sheet, store_session,
    ActiveSession,
};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    pool: Arc<PgPool>,
    config: Arc<BotConfig>,
    dialogue: CardsDialogue,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    let user_language = q.from.language_code.clone();
    let data = q.data.as_deref().unwrap_or("");
    let (action, argument) = parse_callback_data(data);

    // Check dialogue state
    let dialogue_state = dialogue.get().await?;
    debug!(user_id = %q.from.id, dialogue_state = ?dialogue_state, "Retrieved dialogue state");

    match (dialogue_state, &q.message) {
        (
            Some(CardsDialogueState::ViewingCards {
                mut session,
                language_code,
                message_id,
            }),
            Some(msg),
        ) => {
            let chat_id = msg.chat().id;
            let lang = language_code.clone().or(user_language);

            // Buttons on an older card list act on the current session but only
            // the latest list is redrawn
            let is_current_list = message_id == Some(msg.id().0);

            match (action, argument) {
                ("remove", Some(index)) => {
                    if session.remove(index) {
                        bot.send_message(
                            chat_id,
                            t_args_lang("record-removed", &[("index", index)], lang.as_deref()),
                        )
                        .await?;
                        if is_current_list {
                            refresh_cards(&bot, chat_id, msg.id(), &session, lang.as_deref()).await;
                        }
                    }
                }
                ("copy", Some(index)) => {
                    copy_value(&bot, chat_id, index, lang.as_deref()).await?;
                }
                ("copyplain", Some(index)) => {
                    match session.find(index) {
                        Some(record) => {
                            copy_value(&bot, chat_id, &record.plain_index(), lang.as_deref()).await?
                        }
                        None => warn!(user_id = %chat_id, index, "Copy requested for removed record"),
                    }
                }
                ("sort", None) => {
                    session.toggle_sorted();
                    if is_current_list {
                        refresh_cards(&bot, chat_id, msg.id(), &session, lang.as_deref()).await;
                    }
                }
                ("print", None) => {
                    send_print_sheet(&bot, chat_id, &session, &config, lang.as_deref()).await?;
                }
                ("export", None) => {
                    send_export(&bot, chat_id, &session, lang.as_deref()).await?;
                }
                ("clear", None) => {
                    clear_session(&bot, chat_id, &dialogue, &pool, lang.as_deref()).await?;
                    bot.answer_callback_query(q.id).await?;
                    return Ok(());
                }
                _ => {
                    warn!(user_id = %chat_id, data, "Unknown callback data");
                }
            }

            // Update dialogue state with the modified session
            store_session(
                &dialogue,
                ActiveSession {
                    session,
                    language_code,
                    message_id,
                },
            )
            .await?;
        }
        (_, Some(msg)) => {
            bot.send_message(
                msg.chat().id,
                t_lang("session-expired", user_language.as_deref()),
            )
            .await?;
        }
        _ => {
            // Ignore callbacks without a message to act on
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}
