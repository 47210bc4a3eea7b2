//! Prompt composition for the reading provider.
//!
//! A prompt names the model, states the question, category and spread, lists
//! every drawn card as `<position>: <card> – <first sentence of meaning>` in
//! position order, and ends with the instruction template for the spread.

use std::fmt::{self, Write as _};

use lr_core::{Draw, DrawnCard};
use serde::{Deserialize, Serialize};

/// Spread id that gets the yes/no template.
pub const SINGLE_CARD_YES_NO: &str = "single_card_yes_no";

/// Category used when the request does not name one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Which instruction template a spread uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// One card, answered YES / NO / UNCLEAR.
    YesNo,
    /// A narrative across all positions.
    Narrative,
}

impl TemplateKind {
    /// Select the template for a spread id.
    pub fn for_spread(spread_id: &str) -> Self {
        match spread_id {
            SINGLE_CARD_YES_NO => Self::YesNo,
            _ => Self::Narrative,
        }
    }
}

/// How much structure the instructions ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    /// Plain instructions.
    Basic,
    /// Center, mirror and chain techniques plus a JSON-only answer.
    #[default]
    Structured,
}

impl TemplateStyle {
    /// Parse a style name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "plain" => Some(Self::Basic),
            "structured" | "rich" => Some(Self::Structured),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Structured => write!(f, "structured"),
        }
    }
}

const YES_NO_INSTRUCTIONS: &str = "\
This is a *single-card YES/NO style* Lenormand reading.
Decide whether the answer leans mostly YES, mostly NO, or UNCLEAR.

Write your answer in this structure:
Short answer: YES/NO/UNCLEAR
Explanation: 2–3 sentences explaining why, mentioning the card.
Actions: 3 bullet points of practical advice.
Avoid being fatalistic or scary; focus on realistic, empowering guidance.
";

const NARRATIVE_INSTRUCTIONS: &str = "\
Create a narrative-style Lenormand reading using all cards.
Give a concise summary, an overall story, and 3 short, practical action items.
Avoid being fatalistic or scary; focus on empowerment and realistic guidance.
";

const TECHNIQUES: &str = "\
Reading techniques:
- Center: in a spread with an odd number of cards, the middle position is the thematic center. Read every other card in relation to it.
- Mirrors: symmetric positions around the center mirror each other and reveal tension or an alternate outcome. Position i mirrors position (n+1-i).
  3 cards: center=2, mirror 1↔3.
  5 cards: center=3, mirrors 1↔5 and 2↔4.
  7 cards: center=4, mirrors 1↔7, 2↔6 and 3↔5.
- Chains: read every adjacent overlapping pair (1+2, 2+3, 3+4, ...) as one phrase and link the phrases into a flowing narrative.
";

const YES_NO_OUTPUT: &str = "\
Return only a JSON object with exactly these keys, without code fences or any commentary:
{\"summary_en\": \"Short answer: YES, NO or UNCLEAR\", \"overall_story_en\": \"the 2–3 sentence explanation\", \"action_items_en\": [\"advice 1\", \"advice 2\", \"advice 3\"]}
";

const NARRATIVE_OUTPUT: &str = "\
Return only a JSON object with exactly these keys, without code fences or any commentary:
{\"summary_en\": \"concise summary\", \"overall_story_en\": \"the overall story\", \"action_items_en\": [\"action 1\", \"action 2\", \"action 3\"]}
";

/// Builds prompts for the reading provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptComposer {
    model: String,
    style: TemplateStyle,
}

impl PromptComposer {
    /// Create a composer tagging prompts with the given model name.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            style: TemplateStyle::default(),
        }
    }

    /// Set the template style.
    pub fn with_style(mut self, style: TemplateStyle) -> Self {
        self.style = style;
        self
    }

    /// Model name written into the prompt tag.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Template style in use.
    pub fn style(&self) -> TemplateStyle {
        self.style
    }

    /// Compose the prompt for a draw. Deterministic in its inputs.
    pub fn compose(
        &self,
        question: &str,
        category: Option<&str>,
        spread_id: &str,
        draw: &Draw<'_>,
    ) -> String {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);
        let positions: Vec<String> = draw.cards().iter().map(position_line).collect();

        let mut prompt = format!(
            "[MODEL:{model}] You are an experienced Lenormand reader.\n\
             Create the reading in natural English.\n\n\
             Question: {question}\n\
             Category: {category}\n\
             Spread type: {spread_id}\n\n\
             Cards and positions:\n{positions}\n\n",
            model = self.model,
            positions = positions.join("\n"),
        );

        let kind = TemplateKind::for_spread(spread_id);
        match kind {
            TemplateKind::YesNo => prompt.push_str(YES_NO_INSTRUCTIONS),
            TemplateKind::Narrative => prompt.push_str(NARRATIVE_INSTRUCTIONS),
        }

        if self.style == TemplateStyle::Structured {
            if kind == TemplateKind::Narrative && draw.len() > 1 {
                prompt.push('\n');
                prompt.push_str(TECHNIQUES);
                prompt.push_str(&layout_for(draw));
            }
            prompt.push('\n');
            prompt.push_str(match kind {
                TemplateKind::YesNo => YES_NO_OUTPUT,
                TemplateKind::Narrative => NARRATIVE_OUTPUT,
            });
        }

        prompt
    }
}

/// Render one drawn card as a prompt line.
pub fn position_line(drawn: &DrawnCard<'_>) -> String {
    let name = match drawn.card.name_en.trim() {
        "" => "Unknown",
        name => name,
    };
    let mut line = format!("{}: {name}", drawn.position.label());
    let sentence = first_sentence(&drawn.card.meaning_en);
    if !sentence.is_empty() {
        line.push_str(" – ");
        line.push_str(sentence);
    }
    line
}

/// Text up to, not including, the first period, trimmed.
pub fn first_sentence(text: &str) -> &str {
    text.split('.').next().unwrap_or_default().trim()
}

/// 1-based index of the center position, if the count is odd.
pub fn center_position(count: usize) -> Option<usize> {
    (count % 2 == 1).then_some(count.div_ceil(2))
}

/// 1-based mirror pairs: position i mirrors position `count + 1 - i`.
pub fn mirror_pairs(count: usize) -> Vec<(usize, usize)> {
    (1..=count / 2).map(|i| (i, count + 1 - i)).collect()
}

/// 1-based adjacent overlapping pairs.
pub fn chain_pairs(count: usize) -> Vec<(usize, usize)> {
    (1..count).map(|i| (i, i + 1)).collect()
}

/// The technique pairing spelled out for this draw's positions.
fn layout_for(draw: &Draw<'_>) -> String {
    let labels: Vec<&str> = draw.cards().iter().map(|d| d.position.label()).collect();
    let count = labels.len();
    let mut out = format!("For this {count}-card spread:\n");

    // Writing to a String cannot fail.
    match center_position(count) {
        Some(center) => {
            let _ = writeln!(out, "- Center: {center} ({})", labels[center - 1]);
        }
        None => out.push_str("- Center: none, the spread has an even number of cards\n"),
    }

    let mirrors: Vec<String> = mirror_pairs(count)
        .into_iter()
        .map(|(a, b)| format!("{a}↔{b} ({} / {})", labels[a - 1], labels[b - 1]))
        .collect();
    let _ = writeln!(out, "- Mirrors: {}", mirrors.join(", "));

    let chains: Vec<String> = chain_pairs(count)
        .into_iter()
        .map(|(a, b)| format!("{a}+{b}"))
        .collect();
    let _ = writeln!(out, "- Chains: {}", chains.join(", "));
    out
}
