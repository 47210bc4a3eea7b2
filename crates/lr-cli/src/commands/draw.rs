use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::Options;

pub fn run(options: &Options, spread_id: &str, seed: Option<u64>) -> Result<(), String> {
    let config = options.resolve(seed)?;
    let service = super::build_service(&config)?;
    let draw = service.draw(spread_id).map_err(|e| e.to_string())?;
    let spread = draw.spread();

    println!(
        "  {} {}",
        spread.name_en.bold(),
        format!("({} cards)", draw.len()).dimmed()
    );
    println!();

    let grid = spread.positions.iter().any(|p| p.row.is_some());
    let mut header = vec!["Position", "Card", "Meaning", "Note"];
    if grid {
        header.insert(1, "Row/Col");
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);

    for drawn in draw.cards() {
        let mut row = vec![
            drawn.position.label().to_string(),
            format!("{} {}", drawn.card.id, drawn.card.name_en),
            super::truncate(lr_reading::prompt::first_sentence(&drawn.card.meaning_en), 40),
            super::truncate(drawn.note.as_deref().unwrap_or(""), 40),
        ];
        if grid {
            let cell = match (drawn.position.row, drawn.position.column) {
                (Some(r), Some(c)) => format!("{r}/{c}"),
                _ => "—".to_string(),
            };
            row.insert(1, cell);
        }
        table.add_row(row);
    }

    println!("{table}");

    Ok(())
}
