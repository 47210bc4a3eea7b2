use comfy_table::{ContentArrangement, Table};

use super::Options;

pub fn run(options: &Options) -> Result<(), String> {
    let config = options.resolve(None)?;
    let store = super::load_store(&config)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Cards", "Description"]);

    for spread in store.spreads() {
        let description = super::truncate(spread.description_en.as_deref().unwrap_or(""), 60);
        table.add_row(vec![
            spread.id.clone(),
            spread.name_en.clone(),
            spread.card_count.to_string(),
            description,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} spreads", store.spreads().count());

    Ok(())
}
