//! Serving-size vocabulary and its gram estimates.

/// A unit word recognised in a meal description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingUnit {
    Tender,
    Cup,
    Slice,
    Can,
    Bottle,
    Piece,
    Tablespoon,
    Teaspoon,
    Oz,
    Pack,
    Bar,
    Serving,
    Plate,
    Grams,
}

const ALL_UNITS: [ServingUnit; 14] = [
    ServingUnit::Tender,
    ServingUnit::Cup,
    ServingUnit::Slice,
    ServingUnit::Can,
    ServingUnit::Bottle,
    ServingUnit::Piece,
    ServingUnit::Tablespoon,
    ServingUnit::Teaspoon,
    ServingUnit::Oz,
    ServingUnit::Pack,
    ServingUnit::Bar,
    ServingUnit::Serving,
    ServingUnit::Plate,
    ServingUnit::Grams,
];

impl ServingUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServingUnit::Tender => "tender",
            ServingUnit::Cup => "cup",
            ServingUnit::Slice => "slice",
            ServingUnit::Can => "can",
            ServingUnit::Bottle => "bottle",
            ServingUnit::Piece => "piece",
            ServingUnit::Tablespoon => "tablespoon",
            ServingUnit::Teaspoon => "teaspoon",
            ServingUnit::Oz => "oz",
            ServingUnit::Pack => "pack",
            ServingUnit::Bar => "bar",
            ServingUnit::Serving => "serving",
            ServingUnit::Plate => "plate",
            ServingUnit::Grams => "grams",
        }
    }

    /// Assumed weight of one unit. `Grams` is the identity.
    pub fn grams_per_unit(&self) -> f64 {
        match self {
            ServingUnit::Tender => 40.0,
            ServingUnit::Cup => 240.0,
            ServingUnit::Slice => 30.0,
            ServingUnit::Can => 350.0,
            ServingUnit::Bottle => 500.0,
            ServingUnit::Piece => 50.0,
            ServingUnit::Tablespoon => 15.0,
            ServingUnit::Teaspoon => 5.0,
            ServingUnit::Oz => 28.35,
            ServingUnit::Pack => 150.0,
            ServingUnit::Bar => 50.0,
            ServingUnit::Serving => 100.0,
            ServingUnit::Plate => 100.0,
            ServingUnit::Grams => 1.0,
        }
    }

    /// Recognises a unit word case-insensitively, accepting plain plurals ("cups").
    pub fn from_word(word: &str) -> Option<Self> {
        let lower = word.to_lowercase();
        Self::exact(&lower).or_else(|| lower.strip_suffix('s').and_then(Self::exact))
    }

    fn exact(word: &str) -> Option<Self> {
        if word == "gram" {
            return Some(ServingUnit::Grams);
        }
        ALL_UNITS.into_iter().find(|unit| unit.as_str() == word)
    }
}

/// Gram estimate for `quantity` of `unit`; an unknown unit counts 100g servings.
pub fn estimate_grams(quantity: f64, unit: Option<ServingUnit>) -> f64 {
    match unit {
        Some(unit) => quantity * unit.grams_per_unit(),
        None => quantity * 100.0,
    }
}
