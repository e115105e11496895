//! # Card Rendering Module
//!
//! Draws index codes as Code 128 barcode images. A single card holds one
//! barcode with the encoded digits printed underneath; a sheet stacks every
//! visible card on a white page for printing.

use crate::barcode::{normalize_payload, Code128};
use crate::order_errors::CardError;
use crate::order_types::OrderRecord;
use image::{imageops, DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use log::{debug, info};
use std::io::Cursor;

// 5x7 glyphs, one row per byte, most significant of the low 5 bits on the left
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const DIGIT_GLYPHS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];
const TEXT_GAP: u32 = 2;
const SHEET_PADDING: u32 = 16;
const SHEET_SPACING: u32 = 24;

/// Fixed visual style of a barcode card
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeStyle {
    /// Width of the narrowest bar in pixels
    pub module_width: u32,
    /// Bar height in pixels
    pub height: u32,
    /// Blank border around the symbol in pixels
    pub margin: u32,
    /// Height of the human-readable digits in pixels
    pub font_size: u32,
    /// Whether to print the encoded digits under the bars
    pub display_value: bool,
    pub background: Rgba<u8>,
    pub line_color: Rgba<u8>,
}

impl Default for BarcodeStyle {
    fn default() -> Self {
        Self {
            module_width: 2,
            height: 80,
            margin: 0,
            font_size: 14,
            display_value: true,
            background: Rgba([255, 255, 255, 0]), // transparent
            line_color: Rgba([0x11, 0x18, 0x27, 255]), // #111827
        }
    }
}

impl BarcodeStyle {
    fn glyph_scale(&self) -> u32 {
        (self.font_size / GLYPH_HEIGHT).max(1)
    }

    fn text_height(&self) -> u32 {
        if self.display_value {
            TEXT_GAP + GLYPH_HEIGHT * self.glyph_scale()
        } else {
            0
        }
    }
}

fn fill_rect(image: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    let x_end = (x + width).min(image.width());
    let y_end = (y + height).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            image.put_pixel(px, py, color);
        }
    }
}

/// Draw digits centred on `center_x`; characters without a glyph leave a gap
fn draw_digits(image: &mut RgbaImage, text: &str, center_x: u32, top: u32, style: &BarcodeStyle) {
    let scale = style.glyph_scale();
    let advance = (GLYPH_WIDTH + 1) * scale;
    let text_width = (text.chars().count() as u32 * advance).saturating_sub(scale);
    let mut x = center_x.saturating_sub(text_width / 2);

    for c in text.chars() {
        if let Some(digit) = c.to_digit(10) {
            for (row, bits) in DIGIT_GLYPHS[digit as usize].iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        fill_rect(
                            image,
                            x + col * scale,
                            top + row as u32 * scale,
                            scale,
                            scale,
                            style.line_color,
                        );
                    }
                }
            }
        }
        x += advance;
    }
}

/// Render a barcode for an arbitrary payload
pub fn render_barcode(payload: &str, style: &BarcodeStyle) -> Result<RgbaImage, CardError> {
    let code = Code128::encode(payload)?;
    let module_width = style.module_width.max(1);
    let symbol_width = code.width_in_modules() as u32 * module_width;
    let width = symbol_width + 2 * style.margin;
    let height = style.height + style.text_height() + 2 * style.margin;

    let mut image = RgbaImage::from_pixel(width, height, style.background);

    let mut x = style.margin;
    for (run, modules) in code.modules().into_iter().enumerate() {
        let run_width = modules as u32 * module_width;
        // even runs are bars, odd runs are spaces
        if run % 2 == 0 {
            fill_rect(&mut image, x, style.margin, run_width, style.height, style.line_color);
        }
        x += run_width;
    }

    if style.display_value {
        draw_digits(
            &mut image,
            code.payload(),
            style.margin + symbol_width / 2,
            style.margin + style.height + TEXT_GAP,
            style,
        );
    }

    debug!(
        "Rendered barcode '{}' as {}x{} image",
        payload, width, height
    );
    Ok(image)
}

/// Render the barcode card of one record
pub fn render_card(record: &OrderRecord, style: &BarcodeStyle) -> Result<RgbaImage, CardError> {
    render_barcode(&normalize_payload(&record.index), style)
}

/// Stack the cards of all given records on one white printable sheet
pub fn render_sheet(records: &[&OrderRecord], style: &BarcodeStyle) -> Result<RgbaImage, CardError> {
    if records.is_empty() {
        return Err(CardError::Render("no cards to print".to_string()));
    }

    let cards = records
        .iter()
        .map(|record| render_card(record, style))
        .collect::<Result<Vec<RgbaImage>, CardError>>()?;

    let width = cards.iter().map(|card| card.width()).max().unwrap_or(0) + 2 * SHEET_PADDING;
    let height = cards.iter().map(|card| card.height()).sum::<u32>()
        + SHEET_SPACING * (cards.len() as u32 - 1)
        + 2 * SHEET_PADDING;

    let mut sheet = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let mut y = SHEET_PADDING;
    for card in &cards {
        imageops::overlay(&mut sheet, card, SHEET_PADDING as i64, y as i64);
        y += card.height() + SHEET_SPACING;
    }

    info!(
        "Rendered print sheet with {} cards ({}x{})",
        cards.len(),
        width,
        height
    );
    Ok(sheet)
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CardError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_dimensions() {
        let style = BarcodeStyle::default();
        let card = render_card(&OrderRecord::new("123.456.78"), &style).unwrap();

        // 79 modules at 2px, no margin
        assert_eq!(card.width(), 158);
        assert_eq!(card.height(), 80 + TEXT_GAP + 14);
    }

    #[test]
    fn test_first_bar_and_background() {
        let style = BarcodeStyle::default();
        let card = render_barcode("12345678", &style).unwrap();

        // start C pattern begins with a 2-module bar
        assert_eq!(card.get_pixel(0, 0), &style.line_color);
        assert_eq!(card.get_pixel(3, 0), &style.line_color);
        assert_eq!(card.get_pixel(4, 0), &style.background);
    }

    #[test]
    fn test_hidden_value_and_margin() {
        let style = BarcodeStyle {
            display_value: false,
            margin: 10,
            ..Default::default()
        };
        let card = render_barcode("12345678", &style).unwrap();
        assert_eq!(card.width(), 158 + 20);
        assert_eq!(card.height(), 80 + 20);
        assert_eq!(card.get_pixel(0, 0), &style.background);
    }

    #[test]
    fn test_sheet_rejects_empty() {
        assert!(render_sheet(&[], &BarcodeStyle::default()).is_err());
    }

    #[test]
    fn test_png_signature() {
        let card = render_barcode("12345678", &BarcodeStyle::default()).unwrap();
        let png = encode_png(&card).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
