use lr_reading::ReadingRequest;

use super::Options;

pub fn run(
    options: &Options,
    spread_id: &str,
    question: &str,
    category: Option<String>,
    seed: Option<u64>,
) -> Result<(), String> {
    let config = options.resolve(seed)?;
    let service = super::build_service(&config)?;
    let draw = service.draw(spread_id).map_err(|e| e.to_string())?;

    let request = ReadingRequest {
        question: question.to_string(),
        category,
        spread_type: spread_id.to_string(),
    };
    let prompt = super::runtime()?.block_on(service.compose_prompt(&request, &draw));
    print!("{prompt}");

    Ok(())
}
