//! Message Handler module for processing incoming Telegram messages

use anyhow::{Context, Result};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info};

// Import localization
use crate::localization::t_lang;

use crate::bot_config::BotConfig;
use crate::dialogue::CardsDialogue;
use crate::order_errors::CardError;
use crate::record_extractor::RecordExtractor;

// Import session actions
use super::session_manager::{
    active_session, clear_session, process_order_text, restore_session, send_cards, send_export,
    send_print_sheet, store_session,
};

/// Largest text document accepted as a pasted order list
const MAX_DOCUMENT_BYTES: u32 = 1024 * 1024;

/// Download a Telegram file into memory as text
pub async fn download_text_file(bot: &Bot, file_id: teloxide::types::FileId) -> Result<String> {
    let file = bot.get_file(file_id).await?;
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        bot.token(),
        file.path
    );

    let response = reqwest::get(&url)
        .await
        .context("Failed to request document")?
        .error_for_status()
        .context("Document download was rejected")?;
    let bytes = response.bytes().await.context("Failed to read document body")?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Whether a document looks like plain text
pub fn is_text_document(mime_type: Option<&str>, file_name: Option<&str>) -> bool {
    let text_mime = mime_type.is_some_and(|mime| mime.starts_with("text/"));
    let text_name = file_name.is_some_and(|name| {
        let name = name.to_lowercase();
        name.ends_with(".txt") || name.ends_with(".csv")
    });
    text_mime || text_name
}

fn message_language(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.as_ref())
        .map(|s| s.as_str())
}

async fn handle_command(
    bot: &Bot,
    msg: &Message,
    command: &str,
    dialogue: &CardsDialogue,
    pool: &PgPool,
    config: &BotConfig,
    extractor: &RecordExtractor,
) -> Result<()> {
    let language_code = message_language(msg);
    let chat_id = msg.chat.id;
    // "/sort@order_cards_bot" addresses the same command in group chats
    let command = command.split('@').next().unwrap_or(command);

    debug!(user_id = %chat_id, command, "Received command from user");

    match command {
        "/start" => {
            let welcome_message = format!(
                "👋 {}\n\n{}\n\n{}",
                t_lang("welcome-title", language_code),
                t_lang("welcome-description", language_code),
                t_lang("welcome-commands", language_code)
            );
            bot.send_message(chat_id, welcome_message).await?;
            restore_session(bot, chat_id, dialogue, pool, extractor, language_code).await?;
        }
        "/restore" => {
            if !restore_session(bot, chat_id, dialogue, pool, extractor, language_code).await? {
                bot.send_message(chat_id, t_lang("restore-none", language_code))
                    .await?;
            }
        }
        "/clear" => {
            clear_session(bot, chat_id, dialogue, pool, language_code).await?;
        }
        "/sort" => {
            let mut active = active_session(dialogue, language_code).await?;
            let sorted = active.session.toggle_sorted();
            let lang = active.language_code.clone();
            let notice = if sorted { "sort-enabled" } else { "sort-disabled" };
            bot.send_message(chat_id, t_lang(notice, lang.as_deref()))
                .await?;
            if !active.session.is_empty() {
                active.message_id =
                    Some(send_cards(bot, chat_id, &active.session, lang.as_deref()).await?);
            }
            store_session(dialogue, active).await?;
        }
        "/print" => {
            let active = active_session(dialogue, language_code).await?;
            send_print_sheet(
                bot,
                chat_id,
                &active.session,
                config,
                active.language_code.as_deref(),
            )
            .await?;
        }
        "/export" => {
            let active = active_session(dialogue, language_code).await?;
            send_export(bot, chat_id, &active.session, active.language_code.as_deref()).await?;
        }
        _ => {
            bot.send_message(chat_id, t_lang("help-text", language_code))
                .await?;
        }
    }
    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    dialogue: CardsDialogue,
    pool: Arc<PgPool>,
    config: Arc<BotConfig>,
    extractor: Arc<RecordExtractor>,
) -> Result<()> {
    if let Some(text) = msg.text() {
        debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

        let trimmed = text.trim_start();
        if trimmed.starts_with('/') {
            let command = trimmed.split_whitespace().next().unwrap_or(trimmed);
            return handle_command(bot, msg, command, &dialogue, &pool, &config, &extractor).await;
        }

        process_order_text(
            bot,
            msg.chat.id,
            text,
            &dialogue,
            &pool,
            &extractor,
            message_language(msg),
        )
        .await?;
    }
    Ok(())
}

async fn handle_document_message(
    bot: &Bot,
    msg: &Message,
    dialogue: CardsDialogue,
    pool: Arc<PgPool>,
    extractor: Arc<RecordExtractor>,
) -> Result<()> {
    let language_code = message_language(msg);

    if let Some(doc) = msg.document() {
        let mime_type = doc.mime_type.as_ref().map(|mime| mime.to_string());
        if !is_text_document(mime_type.as_deref(), doc.file_name.as_deref()) {
            debug!(user_id = %msg.chat.id, mime_type = ?mime_type, "Received non-text document from user");
            bot.send_message(msg.chat.id, t_lang("error-unsupported-format", language_code))
                .await?;
            return Ok(());
        }

        if doc.file.size > MAX_DOCUMENT_BYTES {
            bot.send_message(msg.chat.id, t_lang("error-clipboard-read", language_code))
                .await?;
            return Ok(());
        }

        match download_text_file(bot, doc.file.id.clone()).await {
            Ok(text) => {
                info!(user_id = %msg.chat.id, bytes = text.len(), "Text document downloaded");
                process_order_text(
                    bot,
                    msg.chat.id,
                    &text,
                    &dialogue,
                    &pool,
                    &extractor,
                    language_code,
                )
                .await?;
            }
            Err(e) => {
                let err = CardError::Download(e.to_string());
                error!(user_id = %msg.chat.id, error = %err, "Failed to download text document");
                bot.send_message(msg.chat.id, t_lang(err.notice_key(), language_code))
                    .await?;
            }
        }
    }
    Ok(())
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");
    bot.send_message(
        msg.chat.id,
        t_lang("unsupported-message", message_language(msg)),
    )
    .await?;
    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    pool: Arc<PgPool>,
    config: Arc<BotConfig>,
    extractor: Arc<RecordExtractor>,
    dialogue: CardsDialogue,
) -> Result<()> {
    if msg.text().is_some() {
        handle_text_message(&bot, &msg, dialogue, pool, config, extractor).await?;
    } else if msg.document().is_some() {
        handle_document_message(&bot, &msg, dialogue, pool, extractor).await?;
    } else {
        handle_unsupported_message(&bot, &msg).await?;
    }

    Ok(())
}
