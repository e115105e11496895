//! # Bot Configuration Module
//!
//! Environment-driven settings for the bot, the record extractor and card rendering.

use crate::card_render::BarcodeStyle;
use crate::order_types::ExtractorConfig;
use anyhow::{bail, Context, Result};
use std::env;

/// Key under which the last pasted order list is stored per chat
pub const RAW_TEXT_STORAGE_KEY: &str = "order_raw";

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub database_url: String,
    pub extractor: ExtractorConfig,
    pub barcode: BarcodeStyle,
}

impl BotConfig {
    /// Read configuration from the process environment
    ///
    /// `TELEGRAM_BOT_TOKEN` and `DATABASE_URL` are required. Optional:
    /// `ORDER_HEADER_BLACKLIST` (comma-separated), `ORDER_INDEX_PATTERN`,
    /// `BARCODE_HEIGHT`, `BARCODE_MODULE_WIDTH`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let telegram_token = lookup("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let mut extractor = ExtractorConfig::default();
        if let Some(words) = lookup("ORDER_HEADER_BLACKLIST") {
            extractor.header_blacklist = parse_word_list(&words);
        }
        extractor.custom_index_pattern = lookup("ORDER_INDEX_PATTERN").filter(|p| !p.trim().is_empty());

        let mut barcode = BarcodeStyle::default();
        if let Some(height) = lookup("BARCODE_HEIGHT") {
            barcode.height = parse_positive("BARCODE_HEIGHT", &height)?;
        }
        if let Some(width) = lookup("BARCODE_MODULE_WIDTH") {
            barcode.module_width = parse_positive("BARCODE_MODULE_WIDTH", &width)?;
        }

        Ok(Self {
            telegram_token,
            database_url,
            extractor,
            barcode,
        })
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(number) if number > 0 => Ok(number),
        _ => bail!("{key} must be a positive integer, got '{value}'"),
    }
}

fn parse_word_list(words: &str) -> Vec<String> {
    words
        .split(',')
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}
