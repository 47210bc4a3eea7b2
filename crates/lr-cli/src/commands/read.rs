use colored::Colorize;
use lr_reading::{ReadingRequest, ReadingResponse};

use super::Options;

pub fn run(
    options: &Options,
    spread_id: &str,
    question: &str,
    category: Option<String>,
    seed: Option<u64>,
    json: bool,
) -> Result<(), String> {
    let config = options.resolve(seed)?;
    let service = super::build_service(&config)?;

    let request = ReadingRequest {
        question: question.to_string(),
        category,
        spread_type: spread_id.to_string(),
    };

    let response = super::runtime()?
        .block_on(service.create_reading(request))
        .map_err(|e| format!("{e} (status {})", e.status_code()))?;

    if json {
        let out = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        print_reading(&response);
    }

    Ok(())
}

fn print_reading(response: &ReadingResponse) {
    println!("  {} {}", "Reading".bold(), response.spread_type.dimmed());
    println!();

    for card in &response.cards {
        println!(
            "  {:<24} {} {}",
            card.position_label_primary,
            card.name_primary.bold(),
            format!("({})", card.name_translated).dimmed()
        );
        if let Some(note) = &card.note {
            println!("  {:<24} {}", "", note.italic());
        }
    }
    println!();

    for reading in [&response.reading_primary, &response.reading_translated] {
        let r = &reading.reading;
        println!("  {} [{}]", r.summary.bold(), reading.language);
        println!();
        for line in r.overall_story.lines() {
            println!("  {}", line.trim());
        }
        println!();
        for item in &r.action_items {
            println!("  - {item}");
        }
        println!();
    }
}
