//! Price text parsing
//!
//! Catalog prices arrive as display strings ("€25-€50", "€39,99",
//! "€1.299,00"). They are tokenized into numbers; the first two numbers form a
//! range, a single number is a point price, and text without numbers has no
//! price at all. Callers that need a number map "no price" to 0.

/// A price range read from display text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

/// Parse display text into a price range
///
/// Returns `None` when the text contains no number.
pub fn parse_price_range(text: &str) -> Option<PriceRange> {
    let numbers = tokenize_numbers(text);
    match numbers.as_slice() {
        [] => None,
        [single] => Some(PriceRange {
            low: *single,
            high: *single,
        }),
        [low, high, ..] => Some(PriceRange {
            low: *low,
            high: *high,
        }),
    }
}

/// Estimated price of display text: the range midpoint, or 0 when unparsable
pub fn estimate_price(text: &str) -> f64 {
    parse_price_range(text)
        .map(|range| range.midpoint())
        .unwrap_or(0.0)
}

/// Extract every number from the text in order of appearance
///
/// A `.` or `,` followed by exactly three digits groups thousands; followed by
/// any other run of digits it starts the fraction.
fn tokenize_numbers(text: &str) -> Vec<f64> {
    let chars: Vec<char> = text.chars().collect();
    let mut numbers = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if !chars[pos].is_ascii_digit() {
            pos += 1;
            continue;
        }

        let (mut integer, mut next) = take_digits(&chars, pos);
        let mut fraction = String::new();

        while let Some(&separator) = chars.get(next) {
            if separator != '.' && separator != ',' {
                break;
            }
            let (group, end) = take_digits(&chars, next + 1);
            if group.len() == 3 {
                integer.push_str(&group);
                next = end;
                continue;
            }
            if !group.is_empty() {
                fraction = group;
                next = end;
            }
            break;
        }

        let literal = if fraction.is_empty() {
            integer
        } else {
            format!("{integer}.{fraction}")
        };
        match literal.parse::<f64>() {
            Ok(value) => numbers.push(value),
            Err(err) => tracing::debug!("Skipping unreadable number {:?}: {}", literal, err),
        }
        pos = next;
    }

    numbers
}

fn take_digits(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_midpoint() {
        assert_eq!(estimate_price("€25-€50"), 37.5);
        assert_eq!(estimate_price("€ 30 - 50"), 40.0);
    }

    #[test]
    fn test_single_price() {
        assert_eq!(estimate_price("€100"), 100.0);
        assert_eq!(estimate_price("€39,99"), 39.99);
        assert_eq!(estimate_price("€45.00"), 45.0);
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(estimate_price("€1.299"), 1299.0);
        assert_eq!(estimate_price("€1.299,95"), 1299.95);
    }

    #[test]
    fn test_unparsable_price_is_zero() {
        assert_eq!(estimate_price(""), 0.0);
        assert_eq!(estimate_price("€ Prijs op aanvraag"), 0.0);
        assert!(parse_price_range("gratis").is_none());
    }

    #[test]
    fn test_only_first_two_numbers_form_the_range() {
        let range = parse_price_range("€20-€40 (3 stuks)").unwrap();
        assert_eq!(range.low, 20.0);
        assert_eq!(range.high, 40.0);
    }
}
