//! Numeral parsing for digit strings and spelled-out English numbers.

use super::MealParseError;

const ONES: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

const TENS: &[(&str, u32)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

const SCALES: &[(&str, u32)] = &[("dozen", 12), ("hundred", 100), ("thousand", 1000)];

fn lookup(table: &[(&str, u32)], word: &str) -> Option<u32> {
    table.iter().find(|(name, _)| *name == word).map(|(_, v)| *v)
}

fn parse_ones(word: &str) -> Option<u32> {
    lookup(ONES, word)
}

fn parse_tens(word: &str) -> Option<u32> {
    lookup(TENS, word)
}

/// "twenty-three" style compounds.
fn parse_hyphenated(word: &str) -> Option<u32> {
    let (left, right) = word.split_once('-')?;
    let tens = parse_tens(left)?;
    let ones = parse_ones(right).filter(|v| (1..=9).contains(v))?;
    Some(tens + ones)
}

/// Value of a single number word, if it is one.
pub fn word_value(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    parse_ones(&lower)
        .or_else(|| parse_tens(&lower))
        .or_else(|| parse_hyphenated(&lower))
        .or_else(|| lookup(SCALES, &lower))
}

pub fn is_scale_word(word: &str) -> bool {
    lookup(SCALES, &word.to_lowercase()).is_some()
}

/// True when the token reads as a number, whether or not it parses cleanly.
pub fn looks_numeric(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit()) || word_value(token).is_some()
}

/// Parses one numeral token: `"2"`, `"2.5"`, `"1/2"`, `"1,000"` or a number word.
pub fn parse_numeral(token: &str) -> Result<f64, MealParseError> {
    let invalid = || MealParseError::InvalidNumeral {
        token: token.to_string(),
    };

    if let Some(value) = word_value(token) {
        return Ok(value as f64);
    }

    let digits = token.replace(',', "");
    let value = match digits.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().map_err(|_| invalid())?;
            let denominator: f64 = denominator.parse().map_err(|_| invalid())?;
            if denominator == 0.0 {
                return Err(invalid());
            }
            numerator / denominator
        }
        None => digits.parse::<f64>().map_err(|_| invalid())?,
    };

    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Folds a numeral that directly follows another into one quantity.
///
/// "two hundred" multiplies, "twenty five" and "one hundred five" add.
/// Anything else means the later numeral replaces the earlier one.
pub fn combine(previous: f64, next_token: &str, next: f64) -> f64 {
    if is_scale_word(next_token) && previous > 0.0 {
        return previous * next;
    }
    let next_is_word = word_value(next_token).is_some();
    if next_is_word && next < 10.0 && previous >= 20.0 && previous % 10.0 == 0.0 {
        return previous + next;
    }
    if next_is_word && next < 100.0 && previous >= 100.0 && previous % 100.0 == 0.0 {
        return previous + next;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digit_forms() {
        assert_eq!(parse_numeral("2").unwrap(), 2.0);
        assert_eq!(parse_numeral("2.5").unwrap(), 2.5);
        assert_eq!(parse_numeral("1/2").unwrap(), 0.5);
        assert_eq!(parse_numeral("1,000").unwrap(), 1000.0);
    }

    #[test]
    fn test_parse_number_words() {
        assert_eq!(parse_numeral("two").unwrap(), 2.0);
        assert_eq!(parse_numeral("Twelve").unwrap(), 12.0);
        assert_eq!(parse_numeral("forty").unwrap(), 40.0);
        assert_eq!(parse_numeral("twenty-three").unwrap(), 23.0);
        assert_eq!(parse_numeral("dozen").unwrap(), 12.0);
    }

    #[test]
    fn test_malformed_numerals_fail() {
        for token in ["2x", "1/0", "abc", "twenty-ten", "-3"] {
            assert_eq!(
                parse_numeral(token),
                Err(MealParseError::InvalidNumeral {
                    token: token.to_string()
                }),
                "token {token}"
            );
        }
    }

    #[test]
    fn test_combine_compound_numbers() {
        assert_eq!(combine(2.0, "hundred", 100.0), 200.0);
        assert_eq!(combine(20.0, "five", 5.0), 25.0);
        assert_eq!(combine(300.0, "twenty", 20.0), 320.0);
        assert_eq!(combine(3.0, "4", 4.0), 4.0);
    }

    #[test]
    fn test_looks_numeric() {
        assert!(looks_numeric("300"));
        assert!(looks_numeric("2x"));
        assert!(looks_numeric("seven"));
        assert!(!looks_numeric("rice"));
    }
}
