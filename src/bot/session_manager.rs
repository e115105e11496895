//! Session Manager module for actions shared by commands and inline buttons

use anyhow::Result;
use sqlx::postgres::PgPool;
use teloxide::prelude::*;
use teloxide::types::{InputFile, InputMedia, InputMediaDocument, MessageId, ParseMode};
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::bot_config::{BotConfig, RAW_TEXT_STORAGE_KEY};
use crate::card_render::{encode_png, render_card, render_sheet, BarcodeStyle};
use crate::db::{clear_raw_input, load_raw_input, save_raw_input};
use crate::dialogue::{CardsDialogue, CardsDialogueState};
use crate::order_errors::CardError;
use crate::order_session::OrderSession;
use crate::order_types::OrderRecord;
use crate::record_extractor::RecordExtractor;

// Import UI builder functions
use super::ui_builder::{create_cards_keyboard, format_card, format_cards_message};

/// Telegram accepts 2 to 10 documents per media group
const MEDIA_GROUP_LIMIT: usize = 10;

/// Session, language and card-list message of the current dialogue
pub struct ActiveSession {
    pub session: OrderSession,
    pub language_code: Option<String>,
    pub message_id: Option<i32>,
}

/// Read the dialogue state, starting an empty session when there is none
pub async fn active_session(dialogue: &CardsDialogue, fallback_language: Option<&str>) -> Result<ActiveSession> {
    match dialogue.get().await? {
        Some(CardsDialogueState::ViewingCards {
            session,
            language_code,
            message_id,
        }) => Ok(ActiveSession {
            session,
            language_code: language_code.or_else(|| fallback_language.map(|s| s.to_string())),
            message_id,
        }),
        Some(CardsDialogueState::Start) | None => Ok(ActiveSession {
            session: OrderSession::default(),
            language_code: fallback_language.map(|s| s.to_string()),
            message_id: None,
        }),
    }
}

pub async fn store_session(dialogue: &CardsDialogue, active: ActiveSession) -> Result<()> {
    dialogue
        .update(CardsDialogueState::ViewingCards {
            session: active.session,
            language_code: active.language_code,
            message_id: active.message_id,
        })
        .await?;
    Ok(())
}

/// Send a new card list message; returns its id
pub async fn send_cards(bot: &Bot, chat_id: ChatId, session: &OrderSession, language_code: Option<&str>) -> Result<i32> {
    let sent = bot
        .send_message(chat_id, format_cards_message(session, language_code))
        .reply_markup(create_cards_keyboard(session, language_code))
        .await?;
    Ok(sent.id.0)
}

/// Redraw an existing card list message in place
pub async fn refresh_cards(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    session: &OrderSession,
    language_code: Option<&str>,
) {
    if let Err(e) = bot
        .edit_message_text(chat_id, message_id, format_cards_message(session, language_code))
        .reply_markup(create_cards_keyboard(session, language_code))
        .await
    {
        // Telegram refuses edits that change nothing; that is not worth surfacing
        warn!(user_id = %chat_id, error = %e, "Failed to refresh card list");
    }
}

/// Notice shown instead of the card list when a parse found no index codes
pub fn empty_parse_notice(session: &OrderSession, language_code: Option<&str>) -> Option<String> {
    session
        .is_empty()
        .then(|| t_lang("no-records-found", language_code))
}

/// Parse pasted text, persist it and show the resulting cards
pub async fn process_order_text(
    bot: &Bot,
    chat_id: ChatId,
    raw_text: &str,
    dialogue: &CardsDialogue,
    pool: &PgPool,
    extractor: &RecordExtractor,
    language_code: Option<&str>,
) -> Result<()> {
    let mut active = active_session(dialogue, language_code).await?;
    active.session.reparse(extractor, raw_text);
    let lang = active.language_code.clone();

    info!(
        user_id = %chat_id,
        found = active.session.total_occurrences,
        unique = active.session.records.len(),
        "Order list parsed"
    );

    if let Err(e) = save_raw_input(pool, chat_id.0, RAW_TEXT_STORAGE_KEY, raw_text).await {
        let err = CardError::from(e);
        error!(user_id = %chat_id, error = %err, "Failed to persist raw order list");
        bot.send_message(chat_id, t_lang(err.notice_key(), lang.as_deref()))
            .await?;
    }

    // An empty parse gets the notice alone, without an empty card list after it
    active.message_id = match empty_parse_notice(&active.session, lang.as_deref()) {
        Some(notice) => {
            bot.send_message(chat_id, notice).await?;
            None
        }
        None => Some(send_cards(bot, chat_id, &active.session, lang.as_deref()).await?),
    };
    store_session(dialogue, active).await
}

/// Reload the stored raw text and parse it again
pub async fn restore_session(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &CardsDialogue,
    pool: &PgPool,
    extractor: &RecordExtractor,
    language_code: Option<&str>,
) -> Result<bool> {
    let stored = match load_raw_input(pool, chat_id.0, RAW_TEXT_STORAGE_KEY).await {
        Ok(stored) => stored,
        Err(e) => {
            let err = CardError::StorageLoad(e.to_string());
            error!(user_id = %chat_id, error = %err, "Failed to load stored order list");
            bot.send_message(chat_id, t_lang(err.notice_key(), language_code))
                .await?;
            return Ok(false);
        }
    };

    match stored {
        Some(stored) if !stored.raw_text.is_empty() => {
            debug!(user_id = %chat_id, updated_at = %stored.updated_at, "Restoring stored order list");
            let mut active = active_session(dialogue, language_code).await?;
            active.session.reparse(extractor, &stored.raw_text);
            let lang = active.language_code.clone();
            active.message_id = Some(send_cards(bot, chat_id, &active.session, lang.as_deref()).await?);
            store_session(dialogue, active).await?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Forget the session and the stored raw text
pub async fn clear_session(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &CardsDialogue,
    pool: &PgPool,
    language_code: Option<&str>,
) -> Result<()> {
    if let Err(e) = clear_raw_input(pool, chat_id.0, RAW_TEXT_STORAGE_KEY).await {
        let err = CardError::StorageClear(e.to_string());
        error!(user_id = %chat_id, error = %err, "Failed to clear stored order list");
        bot.send_message(chat_id, t_lang(err.notice_key(), language_code))
            .await?;
    }

    let mut active = active_session(dialogue, language_code).await?;
    active.session.clear();
    active.message_id = None;
    store_session(dialogue, active).await?;

    bot.send_message(chat_id, t_lang("cleared", language_code))
        .await?;
    Ok(())
}

/// Send all visible cards as one printable PNG sheet
pub async fn send_print_sheet(
    bot: &Bot,
    chat_id: ChatId,
    session: &OrderSession,
    config: &BotConfig,
    language_code: Option<&str>,
) -> Result<()> {
    if session.is_empty() {
        bot.send_message(chat_id, t_lang("cards-empty", language_code))
            .await?;
        return Ok(());
    }

    let records = session.visible_records();
    let png = match render_sheet(&records, &config.barcode).and_then(|sheet| encode_png(&sheet)) {
        Ok(png) => png,
        Err(err) => {
            error!(user_id = %chat_id, error = %err, "Failed to render print sheet");
            bot.send_message(chat_id, t_lang(err.notice_key(), language_code))
                .await?;
            return Ok(());
        }
    };

    info!(user_id = %chat_id, cards = records.len(), bytes = png.len(), "Sending print sheet");
    bot.send_document(chat_id, InputFile::memory(png).file_name("order-cards.png"))
        .caption(t_args_lang(
            "print-caption",
            &[("count", records.len().to_string().as_str())],
            language_code,
        ))
        .await?;

    // The sheet only carries bars and digits; each card follows with its label as caption
    let documents = match card_documents(&records, &config.barcode, language_code) {
        Ok(documents) => documents,
        Err(err) => {
            error!(user_id = %chat_id, error = %err, "Failed to render card documents");
            bot.send_message(chat_id, t_lang(err.notice_key(), language_code))
                .await?;
            return Ok(());
        }
    };

    for group in documents.chunks(MEDIA_GROUP_LIMIT) {
        match group {
            [single] => {
                bot.send_document(chat_id, single.media.clone())
                    .caption(single.caption.clone().unwrap_or_default())
                    .await?;
            }
            _ => {
                bot.send_media_group(chat_id, group.iter().cloned().map(InputMedia::Document))
                    .await?;
            }
        }
    }
    Ok(())
}

/// One PNG document per card, captioned with the card's list entry
pub fn card_documents(
    records: &[&OrderRecord],
    style: &BarcodeStyle,
    language_code: Option<&str>,
) -> Result<Vec<InputMediaDocument>, CardError> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| -> Result<InputMediaDocument, CardError> {
            let png = encode_png(&render_card(record, style)?)?;
            let file = InputFile::memory(png).file_name(format!("{}.png", record.plain_index()));
            Ok(InputMediaDocument::new(file).caption(format_card(i + 1, record, language_code)))
        })
        .collect()
}

/// Send the visible records as a JSON document
pub async fn send_export(
    bot: &Bot,
    chat_id: ChatId,
    session: &OrderSession,
    language_code: Option<&str>,
) -> Result<()> {
    let records = session.visible_records();
    let json = serde_json::to_vec_pretty(&records)?;

    bot.send_document(chat_id, InputFile::memory(json).file_name("order-cards.json"))
        .caption(t_args_lang(
            "export-caption",
            &[("count", records.len().to_string().as_str())],
            language_code,
        ))
        .await?;
    Ok(())
}

/// Send a value in tap-to-copy form, the chat counterpart of a clipboard write
pub async fn copy_value(bot: &Bot, chat_id: ChatId, value: &str, language_code: Option<&str>) -> Result<()> {
    let text = format!(
        "{}\n<code>{}</code>",
        t_lang("copy-value", language_code),
        escape_html(value)
    );

    if let Err(e) = bot.send_message(chat_id, text).parse_mode(ParseMode::Html).await {
        let err = CardError::Clipboard(e.to_string());
        error!(user_id = %chat_id, error = %err, "Failed to deliver copy value");
        bot.send_message(chat_id, t_lang(err.notice_key(), language_code))
            .await?;
    }
    Ok(())
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("123.456.78"), "123.456.78");
        assert_eq!(escape_html("<a&b>"), "&lt;a&amp;b&gt;");
    }

    #[test]
    fn test_empty_parse_notice() {
        let empty = OrderSession::from_raw("Opis\nIlość");
        let notice = empty_parse_notice(&empty, Some("pl")).unwrap();
        assert_eq!(notice, t_lang("no-records-found", Some("pl")));
        assert!(!notice.contains(&t_lang("cards-empty", Some("pl"))));

        let found = OrderSession::from_raw("123.456.78");
        assert_eq!(empty_parse_notice(&found, Some("pl")), None);
    }

    #[test]
    fn test_card_documents_are_labeled() {
        let session = OrderSession::from_raw("123.456.78\nKrzesło\n4\n2\n987.654.32\n123.456.78");
        let records = session.visible_records();
        let documents = card_documents(&records, &BarcodeStyle::default(), Some("pl")).unwrap();

        assert_eq!(documents.len(), 2);
        let first = documents[0].caption.as_deref().unwrap();
        assert!(first.starts_with("1. 📦 123.456.78"));
        assert!(first.contains("Krzesło"));
        assert!(first.contains("Ilość: 4"));
        assert!(first.contains("Duplikaty: 2"));

        let second = documents[1].caption.as_deref().unwrap();
        assert!(second.contains("987.654.32"));
        assert!(second.contains("(brak opisu)"));
    }
}
