use comfy_table::{ContentArrangement, Table};

use super::Options;

pub fn run(options: &Options) -> Result<(), String> {
    let config = options.resolve(None)?;
    let store = super::load_store(&config)?;
    let deck = store.deck();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "이름", "Keywords"]);

    for card in deck.iter() {
        table.add_row(vec![
            card.id.to_string(),
            card.name_en.clone(),
            card.name_ko.clone(),
            super::truncate(&card.keywords_en.join(", "), 50),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} cards", deck.len());

    Ok(())
}
