use order_cards::barcode::{normalize_payload, Code128, CodeSet};
use order_cards::card_render::{encode_png, render_card, render_sheet, BarcodeStyle};
use order_cards::order_errors::CardError;
use order_cards::order_session::OrderSession;
use image::GenericImageView;
use std::fs;
use tempfile::NamedTempFile;

#[test]
fn test_index_payload_uses_code_set_c() {
    let payload = normalize_payload("123.456.78");
    let code = Code128::encode(&payload).unwrap();

    assert_eq!(code.payload(), "12345678");
    assert_eq!(code.code_set(), CodeSet::C);
}

#[test]
fn test_card_for_every_parsed_record() {
    let session = OrderSession::from_raw("111.222.33\nLampa\n444.555.66\nRegał");
    let style = BarcodeStyle::default();

    for record in &session.records {
        let card = render_card(record, &style).unwrap();
        assert_eq!(card.height(), 96);
        assert!(card.width() > 0);
    }
}

#[test]
fn test_sheet_stacks_cards() {
    let session = OrderSession::from_raw("111.222.33\n444.555.66\n777.888.99");
    let style = BarcodeStyle::default();
    let records = session.visible_records();

    let sheet = render_sheet(&records, &style).unwrap();
    let card_height = render_card(records[0], &style).unwrap().height();

    // padding 16 on both sides, 24 between cards
    assert_eq!(sheet.height(), 3 * card_height + 2 * 24 + 2 * 16);
    // sheet background is opaque white
    assert_eq!(sheet.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn test_sheet_png_written_to_disk() {
    let session = OrderSession::from_raw("123.456.78\nKrzesło\n4");
    let records = session.visible_records();
    let sheet = render_sheet(&records, &BarcodeStyle::default()).unwrap();
    let png = encode_png(&sheet).unwrap();

    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), &png).unwrap();

    let decoded = image::load_from_memory(&fs::read(temp_file.path()).unwrap()).unwrap();
    assert_eq!(decoded.width(), sheet.width());
    assert_eq!(decoded.height(), sheet.height());
}

#[test]
fn test_alphanumeric_custom_index() {
    let mut record = order_cards::OrderRecord::new("AB-1234");
    record.description = Some("Próbka".to_string());

    let card = render_card(&record, &BarcodeStyle::default()).unwrap();
    // start + 7 data + checksum, 11 modules each, plus 13 stop, 2px per module
    assert_eq!(card.width(), (9 * 11 + 13) * 2);
}

#[test]
fn test_non_ascii_index_is_a_barcode_error() {
    let record = order_cards::OrderRecord::new("ŁÓDŹ-1");
    let result = render_card(&record, &BarcodeStyle::default());

    match result {
        Err(CardError::Barcode(_)) => {}
        other => panic!("Expected barcode error, got {:?}", other.map(|_| ())),
    }
}
