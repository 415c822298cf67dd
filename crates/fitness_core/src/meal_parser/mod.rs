//! crates/fitness_core/src/meal_parser/mod.rs
//!
//! Turns a free-text meal description ("today i ate 2 cups of rice and an apple")
//! into food mentions with a gram estimate each.
//!
//! The sentence is tagged word by word, then folded left to right through a
//! `ParserState`. Numerals and quantity determiners set the pending quantity,
//! nouns and adjectives accumulate into the current mention, and punctuation,
//! conjunctions or a "grams" unit close it.

pub mod numbers;
pub mod servings;
pub mod tagger;

use std::sync::OnceLock;

use regex::Regex;

pub use servings::ServingUnit;
pub use tagger::{LexiconTagger, PartOfSpeech, PartOfSpeechTagger, TaggedToken};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MealParseError {
    #[error("Could not read '{token}' as a quantity")]
    InvalidNumeral { token: String },
}

/// One food mention extracted from a sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedFoodItem {
    /// May be empty when the sentence named a quantity but no food.
    pub food_name: String,
    pub quantity: f64,
    pub unit: Option<ServingUnit>,
    pub estimated_grams: f64,
}

impl TokenizedFoodItem {
    /// Unit word as it is reported to clients; empty when no unit was recognised.
    pub fn measurement_type(&self) -> &'static str {
        self.unit.map(|unit| unit.as_str()).unwrap_or("")
    }
}

/// Tokenizes a meal description with the built-in lexicon tagger.
pub fn tokenize(text: &str) -> Result<Vec<TokenizedFoodItem>, MealParseError> {
    tokenize_with(&LexiconTagger, text)
}

pub fn tokenize_with<T>(tagger: &T, text: &str) -> Result<Vec<TokenizedFoodItem>, MealParseError>
where
    T: PartOfSpeechTagger + ?Sized,
{
    let cleaned = strip_boilerplate(text);
    let state = tagger
        .tag(&cleaned)
        .iter()
        .try_fold(ParserState::default(), |state, token| state.step(token))?;
    state.finish()
}

/// Removes "today i ate" / "i ate" / "i had" anywhere in the text and lowercases the rest.
fn strip_boilerplate(text: &str) -> String {
    fn boilerplate_pattern() -> Option<&'static Regex> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        PATTERN
            .get_or_init(|| Regex::new(r"(?i)\b(?:today i ate|i ate|i had)\b").ok())
            .as_ref()
    }

    let lowered = text.to_lowercase();
    match boilerplate_pattern() {
        Some(pattern) => pattern.replace_all(&lowered, "").trim().to_string(),
        None => lowered.trim().to_string(),
    }
}

//=========================================================================================
// Parser State
//=========================================================================================

/// Everything the left-to-right scan carries between tokens.
#[derive(Debug, Default)]
pub struct ParserState {
    pending_quantity: Option<f64>,
    /// Source words of the pending quantity, reported when it overflows.
    quantity_text: String,
    previous_was_numeral: bool,
    buffer: Vec<String>,
    items: Vec<TokenizedFoodItem>,
}

impl ParserState {
    /// Consumes one tagged token.
    pub fn step(mut self, token: &TaggedToken) -> Result<Self, MealParseError> {
        let text = token.text.as_str();
        let is_grams = ServingUnit::from_word(text) == Some(ServingUnit::Grams);

        if token.pos == PartOfSpeech::Numeral {
            let value = numbers::parse_numeral(text)?;
            let quantity = match (self.previous_was_numeral, self.pending_quantity) {
                (true, Some(previous)) => {
                    self.quantity_text.push(' ');
                    self.quantity_text.push_str(text);
                    numbers::combine(previous, text, value)
                }
                _ => {
                    // A new quantity ends a "<n> grams <food>" mention still collecting its name.
                    if self.holds_grams() {
                        self.close_item()?;
                    }
                    self.quantity_text = text.to_string();
                    value
                }
            };
            if !quantity.is_finite() {
                return Err(self.invalid_quantity());
            }
            self.pending_quantity = Some(quantity);
        } else if is_grams && self.pending_quantity.is_some() {
            self.buffer.push(text.to_string());
            // "300 grams chicken" names the food after the unit; keep collecting
            // until the next numeral, punctuation or conjunction.
            if self.has_food_words() {
                self.close_item()?;
            }
        } else {
            match token.pos {
                PartOfSpeech::Determiner => {
                    if let Some(quantity) = determiner_quantity(text) {
                        self.pending_quantity = Some(quantity);
                        self.quantity_text = text.to_string();
                    }
                }
                PartOfSpeech::Noun | PartOfSpeech::Adjective => {
                    self.buffer.push(text.to_string());
                }
                PartOfSpeech::Punctuation | PartOfSpeech::Conjunction => {
                    if !self.buffer.is_empty() {
                        self.close_item()?;
                    }
                    self.pending_quantity = None;
                }
                PartOfSpeech::Numeral | PartOfSpeech::Other => {}
            }
        }

        self.previous_was_numeral = token.pos == PartOfSpeech::Numeral;
        Ok(self)
    }

    /// Flushes a trailing mention and returns every item in scan order.
    pub fn finish(mut self) -> Result<Vec<TokenizedFoodItem>, MealParseError> {
        if !self.buffer.is_empty() {
            self.close_item()?;
        }
        Ok(self.items)
    }

    fn has_food_words(&self) -> bool {
        self.buffer
            .iter()
            .any(|word| ServingUnit::from_word(word).is_none())
    }

    fn holds_grams(&self) -> bool {
        self.buffer
            .iter()
            .any(|word| ServingUnit::from_word(word) == Some(ServingUnit::Grams))
    }

    fn invalid_quantity(&self) -> MealParseError {
        MealParseError::InvalidNumeral {
            token: self.quantity_text.clone(),
        }
    }

    fn close_item(&mut self) -> Result<(), MealParseError> {
        let quantity = self.pending_quantity.take().unwrap_or(1.0);
        let words = std::mem::take(&mut self.buffer);
        let item = resolve_item(&words, quantity);
        if !item.estimated_grams.is_finite() {
            return Err(self.invalid_quantity());
        }
        self.items.push(item);
        Ok(())
    }
}

/// "a"/"an" mean one; "some" is read as two.
fn determiner_quantity(word: &str) -> Option<f64> {
    match word.to_lowercase().as_str() {
        "a" | "an" => Some(1.0),
        "some" => Some(2.0),
        _ => None,
    }
}

/// Splits the unit word out of a mention and estimates its weight. The last unit word wins.
fn resolve_item(words: &[String], quantity: f64) -> TokenizedFoodItem {
    let mut unit = None;
    let mut name_words = Vec::with_capacity(words.len());
    for word in words {
        match ServingUnit::from_word(word) {
            Some(found) => unit = Some(found),
            None => name_words.push(word.as_str()),
        }
    }

    TokenizedFoodItem {
        food_name: name_words.join(" ").trim().to_string(),
        quantity,
        unit,
        estimated_grams: servings::estimate_grams(quantity, unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, grams: f64, unit: &str) -> (String, f64, String) {
        (name.to_string(), grams, unit.to_string())
    }

    fn parsed(text: &str) -> Vec<(String, f64, String)> {
        tokenize(text)
            .unwrap()
            .into_iter()
            .map(|i| {
                let unit = i.measurement_type().to_string();
                (i.food_name, i.estimated_grams, unit)
            })
            .collect()
    }

    #[test]
    fn test_cups_and_counted_item() {
        assert_eq!(
            parsed("2 cups of rice and 1 apple"),
            vec![item("rice", 480.0, "cup"), item("apple", 100.0, "")]
        );
    }

    #[test]
    fn test_grams_before_food_name() {
        assert_eq!(parsed("300 grams chicken"), vec![item("chicken", 300.0, "grams")]);
        assert_eq!(
            parsed("300 grams of chicken, 2 slices of bread"),
            vec![item("chicken", 300.0, "grams"), item("bread", 60.0, "slice")]
        );
    }

    #[test]
    fn test_grams_after_food_name_closes_immediately() {
        assert_eq!(
            parsed("chicken 250 grams rice"),
            vec![item("chicken", 250.0, "grams"), item("rice", 100.0, "")]
        );
    }

    #[test]
    fn test_boilerplate_is_stripped() {
        assert_eq!(tokenize("today i ate an apple"), tokenize("an apple"));
        assert_eq!(tokenize("I had an apple"), tokenize("an apple"));
        assert_eq!(parsed("Today I ate an apple"), vec![item("apple", 100.0, "")]);
    }

    #[test]
    fn test_unknown_unit_counts_hundred_gram_servings() {
        assert_eq!(parsed("3 bananas"), vec![item("bananas", 300.0, "")]);
    }

    #[test]
    fn test_spelled_out_numbers() {
        assert_eq!(
            parsed("two slices of toast and twenty-five grams almonds"),
            vec![item("toast", 60.0, "slice"), item("almonds", 25.0, "grams")]
        );
        assert_eq!(
            parsed("two hundred grams pasta"),
            vec![item("pasta", 200.0, "grams")]
        );
    }

    #[test]
    fn test_some_is_read_as_two() {
        // Deliberately arbitrary: "some" has always meant two servings.
        assert_eq!(parsed("some cookies"), vec![item("cookies", 200.0, "")]);
    }

    #[test]
    fn test_missing_quantity_defaults_to_one() {
        assert_eq!(parsed("oz of cheese"), vec![item("cheese", 28.35, "oz")]);
        assert_eq!(parsed("rice"), vec![item("rice", 100.0, "")]);
    }

    #[test]
    fn test_adjectives_stay_in_food_name() {
        assert_eq!(
            parsed("a plate of fried rice; 2 grilled chicken tenders"),
            vec![
                item("fried rice", 100.0, "plate"),
                item("grilled chicken", 80.0, "tender"),
            ]
        );
    }

    #[test]
    fn test_punctuation_resets_quantity() {
        assert_eq!(parsed("3, apple"), vec![item("apple", 100.0, "")]);
    }

    #[test]
    fn test_items_keep_scan_order() {
        let names: Vec<String> = parsed("an egg, a banana, 2 cans of soda")
            .into_iter()
            .map(|(name, _, _)| name)
            .collect();
        assert_eq!(names, vec!["egg", "banana", "soda"]);
    }

    #[test]
    fn test_empty_input_yields_no_items() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("today i ate").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_numeral_fails_the_parse() {
        assert_eq!(
            tokenize("2x cups of rice"),
            Err(MealParseError::InvalidNumeral {
                token: "2x".to_string()
            })
        );
    }

    #[test]
    fn test_quantity_without_food_yields_empty_name() {
        let items = tokenize("2 cups.").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].food_name, "");
        assert_eq!(items[0].estimated_grams, 480.0);
    }

    #[test]
    fn test_next_quantity_ends_grams_mention() {
        assert_eq!(
            parsed("300 grams chicken 200 grams rice"),
            vec![item("chicken", 300.0, "grams"), item("rice", 200.0, "grams")]
        );
    }

    #[test]
    fn test_grams_without_food_keep_following_count() {
        assert_eq!(
            parsed("100 grams 2 apples"),
            vec![item("", 100.0, "grams"), item("apples", 200.0, "")]
        );
    }

    #[test]
    fn test_modal_verbs_are_not_units() {
        assert_eq!(parsed("i can eat 2 apples"), vec![item("apples", 200.0, "")]);
        assert_eq!(
            parsed("i could have 3 eggs and will drink a can of soda"),
            vec![item("eggs", 300.0, ""), item("soda", 350.0, "can")]
        );
    }

    #[test]
    fn test_overflowing_quantity_fails_the_parse() {
        assert_eq!(
            tokenize("1e307 cups of rice"),
            Err(MealParseError::InvalidNumeral {
                token: "1e307".to_string()
            })
        );
        let thousands = format!("2{} apples", " thousand".repeat(120));
        assert!(matches!(
            tokenize(&thousands),
            Err(MealParseError::InvalidNumeral { .. })
        ));
    }

    struct FixedTagger(Vec<TaggedToken>);

    impl PartOfSpeechTagger for FixedTagger {
        fn tag(&self, _sentence: &str) -> Vec<TaggedToken> {
            self.0.clone()
        }
    }

    #[test]
    fn test_custom_tagger_drives_the_state_machine() {
        use PartOfSpeech::*;
        let tagger = FixedTagger(vec![
            TaggedToken::new("3", Numeral),
            TaggedToken::new("scoops", Noun),
            TaggedToken::new("gelato", Noun),
            TaggedToken::new("or", Conjunction),
            TaggedToken::new("a", Determiner),
            TaggedToken::new("bar", Noun),
        ]);

        let items = tokenize_with(&tagger, "ignored").unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].food_name, "scoops gelato");
        assert_eq!(items[0].estimated_grams, 300.0);
        assert_eq!(items[1].food_name, "");
        assert_eq!(items[1].unit, Some(ServingUnit::Bar));
        assert_eq!(items[1].estimated_grams, 50.0);
    }
}
