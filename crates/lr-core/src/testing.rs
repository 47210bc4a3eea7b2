//! Small reference tables shared by unit tests.

use crate::store::Store;

pub const CARDS: &str = r#"{
    "1": {"name_en": "Rider", "name_ko": "기수", "meaning_en": "News arrives. Fast."},
    "2": {"name_en": "Clover", "name_ko": "클로버", "meaning_en": "Small luck."},
    "3": {"name_en": "Ship", "name_ko": "배", "meaning_en": "Travel and distance."},
    "4": {"name_en": "House", "name_ko": "집"},
    "5": {"name_en": "Tree", "name_ko": "나무", "meaning_en": "Slow growth."},
    "6": {"name_en": "Clouds", "name_ko": "구름", "meaning_en": "Confusion."}
}"#;

pub const SPREADS: &str = r#"{"spreads": {
    "single_card_yes_no": {
        "card_count": 1,
        "positions": [{"slot": "answer", "label_en": "Answer", "label_ko": "답"}]
    },
    "past_present_future": {
        "card_count": 3,
        "positions": [
            {"slot": "past", "label_en": "Past", "label_ko": "과거"},
            {"slot": "present", "label_en": "Present", "label_ko": "현재"},
            {"slot": "future", "label_en": "Future", "label_ko": "미래"}
        ]
    },
    "full_deck": {
        "card_count": 6,
        "positions": [
            {"slot": "a", "row": 1, "column": 1}, {"slot": "b", "row": 1, "column": 2},
            {"slot": "c", "row": 1, "column": 3}, {"slot": "d", "row": 2, "column": 1},
            {"slot": "e", "row": 2, "column": 2}, {"slot": "f", "row": 2, "column": 3}
        ]
    },
    "too_big": {
        "card_count": 7,
        "positions": [
            {"slot": "1"}, {"slot": "2"}, {"slot": "3"}, {"slot": "4"},
            {"slot": "5"}, {"slot": "6"}, {"slot": "7"}
        ]
    }
}}"#;

pub fn store() -> Store {
    Store::from_json(CARDS, SPREADS).unwrap()
}
