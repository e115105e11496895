//! UI Builder module for creating keyboards and formatting card lists

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::order_session::OrderSession;
use crate::order_types::OrderRecord;

/// Cards listed in one message; the rest are still printed and exported
pub const MAX_LISTED_CARDS: usize = 30;
/// Telegram rejects longer message texts
const MAX_MESSAGE_CHARS: usize = 4000;
const MAX_DESCRIPTION_CHARS: usize = 80;

/// Summary line, e.g. "Found: 3 | Unique: 2"
pub fn format_stats(session: &OrderSession, language_code: Option<&str>) -> String {
    let stats = session.stats();
    t_args_lang(
        "stats-line",
        &[
            ("found", stats.found.to_string().as_str()),
            ("unique", stats.unique.to_string().as_str()),
        ],
        language_code,
    )
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        text.to_string()
    }
}

/// Format one record as a card block
pub fn format_card(position: usize, record: &OrderRecord, language_code: Option<&str>) -> String {
    let description = match record.description.as_deref() {
        Some(description) => truncate_chars(description, MAX_DESCRIPTION_CHARS),
        None => t_lang("no-description", language_code),
    };

    let mut badges = vec![match record.quantity_primary {
        Some(quantity) => t_args_lang(
            "quantity-label",
            &[("quantity", quantity.to_string().as_str())],
            language_code,
        ),
        None => t_lang("quantity-unknown", language_code),
    }];
    if let Some(packs) = record.quantity_packs {
        badges.push(t_args_lang(
            "packs-label",
            &[("packs", packs.to_string().as_str())],
            language_code,
        ));
    }
    badges.push(t_args_lang(
        "duplicates-label",
        &[("count", record.occurrence_count.to_string().as_str())],
        language_code,
    ));

    format!(
        "{}. 📦 {}\n   {}\n   {}",
        position,
        record.index,
        description,
        badges.join(" · ")
    )
}

/// Stats line followed by the visible cards
pub fn format_cards_message(session: &OrderSession, language_code: Option<&str>) -> String {
    let mut message = format!("📊 {}", format_stats(session, language_code));

    if session.is_empty() {
        message.push_str("\n\n");
        message.push_str(&t_lang("cards-empty", language_code));
        return message;
    }

    let records = session.visible_records();
    for (i, record) in records.iter().take(MAX_LISTED_CARDS).enumerate() {
        message.push_str("\n\n");
        message.push_str(&format_card(i + 1, record, language_code));
    }

    if records.len() > MAX_LISTED_CARDS {
        message.push_str("\n\n");
        message.push_str(&t_args_lang(
            "cards-truncated",
            &[("count", (records.len() - MAX_LISTED_CARDS).to_string().as_str())],
            language_code,
        ));
    }

    truncate_chars(&message, MAX_MESSAGE_CHARS)
}

/// Create the inline keyboard under the card list
pub fn create_cards_keyboard(session: &OrderSession, language_code: Option<&str>) -> InlineKeyboardMarkup {
    let mut buttons = Vec::new();

    for record in session.visible_records().into_iter().take(MAX_LISTED_CARDS) {
        buttons.push(vec![
            InlineKeyboardButton::callback(
                format!("🗑️ {}", record.index),
                format!("remove_{}", record.index),
            ),
            InlineKeyboardButton::callback(
                format!("📋 {}", t_lang("button-copy", language_code)),
                format!("copy_{}", record.index),
            ),
            InlineKeyboardButton::callback(
                format!("📋 {}", record.plain_index()),
                format!("copyplain_{}", record.index),
            ),
        ]);
    }

    let sort_label = if session.sorted {
        t_lang("button-sort-off", language_code)
    } else {
        t_lang("button-sort-on", language_code)
    };

    buttons.push(vec![
        InlineKeyboardButton::callback(format!("🔀 {}", sort_label), "sort".to_string()),
        InlineKeyboardButton::callback(
            format!("🖨️ {}", t_lang("button-print", language_code)),
            "print".to_string(),
        ),
    ]);
    buttons.push(vec![
        InlineKeyboardButton::callback(
            format!("💾 {}", t_lang("button-export", language_code)),
            "export".to_string(),
        ),
        InlineKeyboardButton::callback(
            format!("❌ {}", t_lang("button-clear", language_code)),
            "clear".to_string(),
        ),
    ]);

    InlineKeyboardMarkup::new(buttons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_card_polish() {
        let mut record = OrderRecord::new("123.456.78");
        record.description = Some("Krzesło".to_string());
        record.quantity_primary = Some(4.0);
        record.quantity_packs = Some(2.0);
        record.occurrence_count = 2;

        let card = format_card(1, &record, Some("pl"));
        assert_eq!(
            card,
            "1. 📦 123.456.78\n   Krzesło\n   Ilość: 4 · Paczki: 2 · Duplikaty: 2"
        );
    }

    #[test]
    fn test_format_card_missing_fields() {
        let record = OrderRecord::new("111.222.33");
        let card = format_card(3, &record, Some("pl"));
        assert!(card.contains("(brak opisu)"));
        assert!(card.contains("Ilość: ?"));
        assert!(!card.contains("Paczki"));
    }

    #[test]
    fn test_stats_line() {
        let session = OrderSession::from_raw("111.222.33\n111.222.33\n444.555.66");
        assert_eq!(format_stats(&session, Some("pl")), "Znalezione: 3 | Unikalne: 2");
        assert_eq!(format_stats(&session, None), "Found: 3 | Unique: 2");
    }

    #[test]
    fn test_cards_message_truncation() {
        let raw: String = (0..MAX_LISTED_CARDS + 5)
            .map(|i| format!("{:03}.000.00\nLampa\n", i))
            .collect();
        let session = OrderSession::from_raw(&raw);
        let message = format_cards_message(&session, None);

        assert!(message.contains("…and 5 more cards"));
        assert!(message.chars().count() <= MAX_MESSAGE_CHARS);
    }

    #[test]
    fn test_keyboard_layout() {
        let session = OrderSession::from_raw("111.222.33\nLampa\n444.555.66");
        let keyboard = create_cards_keyboard(&session, None);

        // one row per card plus two control rows
        assert_eq!(keyboard.inline_keyboard.len(), 4);
        assert_eq!(keyboard.inline_keyboard[0].len(), 3);
    }
}
