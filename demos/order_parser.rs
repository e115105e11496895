//! # Order Parser Demo
//!
//! Parses a pasted order list and writes a printable barcode sheet next to it.
//!
//! ```text
//! cargo run --example order_parser -- [order.txt] [sheet.png]
//! ```

use order_cards::card_render::{encode_png, render_sheet, BarcodeStyle};
use order_cards::order_session::OrderSession;
use std::env;
use std::fs;

const SAMPLE_ORDER: &str = r#"
Opis	Indeks	Ilość
123.456.78
Krzesło
4
2
987.654.32
Stół rozkładany
1
123.456.78
Krzesło
4
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let raw = match args.first() {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE_ORDER.to_string(),
    };

    println!("🔍 Parsing order list...\n");

    let mut session = OrderSession::from_raw(&raw);
    session.set_sorted(true);

    let stats = session.stats();
    println!("📊 Found: {} | Unique: {}\n", stats.found, stats.unique);

    for record in session.visible_records() {
        println!("📦 {}", record.index);
        println!(
            "   {}",
            record.description.as_deref().unwrap_or("(no description)")
        );
        match record.quantity_primary {
            Some(quantity) => print!("   Quantity: {}", quantity),
            None => print!("   Quantity: ?"),
        }
        if let Some(packs) = record.quantity_packs {
            print!(" · Packs: {}", packs);
        }
        println!(" · Duplicates: {}", record.occurrence_count);
    }

    if session.is_empty() {
        println!("❌ No index codes found.");
        return Ok(());
    }

    let output = args.get(1).map(String::as_str).unwrap_or("order-cards.png");
    let sheet = render_sheet(&session.visible_records(), &BarcodeStyle::default())?;
    fs::write(output, encode_png(&sheet)?)?;
    println!("\n🖨️ Barcode sheet written to {}", output);

    Ok(())
}
