//! Line parser: raw shopping-list text → [`ParsedItem`].
//!
//! Recognized shapes (quantity may be glued to the unit):
//!
//! | Input | quantity | unit | name |
//! |-------|----------|------|------|
//! | `2 cups flour` | 2 | cup | flour |
//! | `500g rice` | 500 | g | rice |
//! | `1 1/2 tbsp olive oil` | 1.5 | tbsp | olive oil |
//! | `0,5 kg potatoes` | 0.5 | kg | potatoes |
//! | `1,000 g flour` | 1000 | g | flour |
//! | `melk 1L` | 1 | l | melk |
//! | `3x yoghurt` | 3 | | yoghurt |
//! | `Bananas!` | 1 | | bananas |
//!
//! Any line with at least one non-whitespace character parses; only blank
//! lines fail, with [`ShoppingError::Parse`].

use serde::{Deserialize, Serialize};

use crate::error::ShoppingError;
use crate::models::{ParsedItem, RawLine, UNCATEGORIZED};
use crate::units::{Unit, UnitTable};

/// Locale-dependent parser settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Leading articles/determiners stripped from names (e.g. `de`, `het`,
    /// `een`, `the`). Empty by default.
    #[serde(default)]
    pub articles: Vec<String>,
}

/// A line that could not be parsed, reported instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseFailure {
    pub position: usize,
    pub text: String,
    pub reason: String,
}

/// Result of parsing a batch of lines.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub items: Vec<ParsedItem>,
    pub failures: Vec<ParseFailure>,
}

/// Pure line parser over a fixed [`UnitTable`] and [`ParserConfig`].
#[derive(Debug, Clone)]
pub struct LineParser {
    units: UnitTable,
    articles: Vec<String>,
}

/// A quantity found in the line and how many tokens it spanned.
struct QuantityMatch {
    quantity: f64,
    unit: Unit,
    /// Token that was read as the unit, kept in case it has to become the name.
    unit_token: Option<String>,
    consumed: usize,
}

impl LineParser {
    pub fn new(units: UnitTable, config: &ParserConfig) -> Self {
        let articles = config
            .articles
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        Self { units, articles }
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    /// Parse a single line.
    ///
    /// # Errors
    ///
    /// [`ShoppingError::Parse`] when the line is empty after trimming.
    pub fn parse_line(&self, text: &str, position: usize) -> Result<ParsedItem, ShoppingError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ShoppingError::Parse {
                line: text.to_string(),
                reason: "line is empty".to_string(),
            });
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        let (qty, name_tokens): (Option<QuantityMatch>, &[&str]) =
            match self.leading_quantity(&tokens) {
                Some(m) => {
                    let rest = &tokens[m.consumed..];
                    (Some(m), rest)
                }
                None => match self.trailing_quantity(&tokens) {
                    Some(m) => {
                        let rest = &tokens[..tokens.len() - m.consumed];
                        (Some(m), rest)
                    }
                    None => (None, &tokens[..]),
                },
            };

        let mut name = self.normalize_name(&name_tokens.join(" "));
        let (mut quantity, mut unit) = match &qty {
            Some(m) => (m.quantity, m.unit),
            None => (1.0, Unit::None),
        };

        if name.is_empty() {
            // "3 cloves": the unit word is the only thing that names the item.
            if let Some(token) = qty.as_ref().and_then(|m| m.unit_token.as_deref()) {
                name = self.normalize_name(token);
                unit = Unit::None;
            }
        }
        if name.is_empty() {
            name = collapse_whitespace(&trimmed.to_lowercase());
            quantity = 1.0;
            unit = Unit::None;
        }

        Ok(ParsedItem {
            name,
            quantity: quantity.max(0.0),
            unit,
            category: UNCATEGORIZED.to_string(),
            raw_text: trimmed.to_string(),
            position,
            completed: false,
            source_id: None,
        })
    }

    pub fn parse_raw(&self, line: &RawLine) -> Result<ParsedItem, ShoppingError> {
        self.parse_line(&line.text, line.position)
    }

    /// Parse a batch; unparseable lines are collected as failures.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        for (position, line) in lines.iter().enumerate() {
            let raw = RawLine::new(line.as_ref(), position);
            match self.parse_raw(&raw) {
                Ok(item) => outcome.items.push(item),
                Err(e) => outcome.failures.push(ParseFailure {
                    position: raw.position,
                    text: raw.text,
                    reason: e.to_string(),
                }),
            }
        }
        outcome
    }

    /// Lower-case, strip edge punctuation from every word, drop leading
    /// articles, collapse whitespace.
    pub fn normalize_name(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let mut words: Vec<&str> = lowered
            .split_whitespace()
            .map(|w| w.trim_matches(is_edge_punctuation))
            .filter(|w| !w.is_empty())
            .collect();

        while words.len() > 1 && self.articles.iter().any(|a| a == words[0]) {
            words.remove(0);
        }

        words.join(" ")
    }

    fn leading_quantity(&self, tokens: &[&str]) -> Option<QuantityMatch> {
        let (mut quantity, rest) = split_number(tokens.first()?)?;
        let mut consumed = 1;

        if !rest.is_empty() {
            // "500g", "1L", "2x"
            let unit = match rest.to_lowercase().as_str() {
                "x" => Unit::None,
                _ => self.units.lookup(rest)?,
            };
            let unit_token = (unit != Unit::None).then(|| rest.to_string());
            return Some(QuantityMatch {
                quantity,
                unit,
                unit_token,
                consumed,
            });
        }

        // Mixed number: "1 1/2"
        if let Some(next) = tokens.get(consumed) {
            if next.contains('/') {
                if let Some((frac, "")) = split_number(next) {
                    if frac < 1.0 {
                        quantity += frac;
                        consumed += 1;
                    }
                }
            }
        }

        let mut unit = Unit::None;
        let mut unit_token = None;
        if let Some(next) = tokens.get(consumed) {
            if next.eq_ignore_ascii_case("x") {
                consumed += 1;
            } else if let Some(u) = self.units.lookup(next) {
                unit = u;
                unit_token = Some(next.to_string());
                consumed += 1;
            }
        }

        Some(QuantityMatch {
            quantity,
            unit,
            unit_token,
            consumed,
        })
    }

    fn trailing_quantity(&self, tokens: &[&str]) -> Option<QuantityMatch> {
        if tokens.len() < 2 {
            return None;
        }
        let last = tokens[tokens.len() - 1];

        // "melk 1L", "eggs 6"
        if let Some((quantity, rest)) = split_number(last) {
            let unit = if rest.is_empty() {
                Unit::None
            } else {
                self.units.lookup(rest)?
            };
            return Some(QuantityMatch {
                quantity,
                unit,
                unit_token: None,
                consumed: 1,
            });
        }

        // "melk 1 l"
        if tokens.len() >= 3 {
            let unit = self.units.lookup(last)?;
            let (quantity, rest) = split_number(tokens[tokens.len() - 2])?;
            if rest.is_empty() {
                return Some(QuantityMatch {
                    quantity,
                    unit,
                    unit_token: None,
                    consumed: 2,
                });
            }
        }

        None
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(UnitTable::default(), &ParserConfig::default())
    }
}

/// Split a token into a leading non-negative number and the remainder.
///
/// Accepts `2`, `2.5`, `2,5`, `1/2`, and `1,000` (a comma before exactly
/// three digits groups thousands when the leading group is 1-3 digits
/// without a leading zero). Returns `None` when the token does not
/// start with a digit, the fraction has a zero denominator, or the value
/// does not fit in a finite `f64`.
fn split_number(token: &str) -> Option<(f64, &str)> {
    let bytes = token.as_bytes();
    let digits = |from: usize| {
        bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let int_len = digits(0);
    if int_len == 0 {
        return None;
    }
    let mut whole = token[..int_len].to_string();
    let mut end = int_len;
    let leads_group = int_len <= 3 && bytes[0] != b'0';
    while leads_group && bytes.get(end) == Some(&b',') && digits(end + 1) == 3 {
        whole.push_str(&token[end + 1..end + 4]);
        end += 4;
    }
    let mut value: f64 = whole.parse().ok()?;

    if let Some(&sep) = bytes.get(end) {
        let frac_len = digits(end + 1);
        if frac_len > 0 {
            let frac_str = &token[end + 1..end + 1 + frac_len];
            match sep {
                b'.' | b',' => {
                    value = format!("{}.{}", whole, frac_str).parse().ok()?;
                    end += 1 + frac_len;
                }
                b'/' => {
                    let denom: f64 = frac_str.parse().ok()?;
                    if denom == 0.0 {
                        return None;
                    }
                    value /= denom;
                    end += 1 + frac_len;
                }
                _ => {}
            }
        }
    }

    value.is_finite().then_some((value, &token[end..]))
}

fn is_edge_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '…' | '–' | '—' | '•' | '·' | '“' | '”' | '‘' | '’' | '«' | '»' | '¿' | '¡'
        )
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ParsedItem {
        LineParser::default().parse_line(line, 0).unwrap()
    }

    #[test]
    fn test_split_number() {
        assert_eq!(split_number("2"), Some((2.0, "")));
        assert_eq!(split_number("2.5kg"), Some((2.5, "kg")));
        assert_eq!(split_number("0,5"), Some((0.5, "")));
        assert_eq!(split_number("1/2"), Some((0.5, "")));
        assert_eq!(split_number("1/0"), None);
        assert_eq!(split_number("x2"), None);
        assert_eq!(split_number("3."), Some((3.0, ".")));
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(split_number("1,000"), Some((1000.0, "")));
        assert_eq!(split_number("1,000g"), Some((1000.0, "g")));
        assert_eq!(split_number("12,500,000"), Some((12_500_000.0, "")));
        assert_eq!(split_number("1,250.5"), Some((1250.5, "")));
        assert_eq!(split_number("1,5"), Some((1.5, "")));
        assert_eq!(split_number("1,25"), Some((1.25, "")));
        assert_eq!(split_number("1,0000"), Some((1.0, "")));
        assert_eq!(split_number("0,500"), Some((0.5, "")));
        assert_eq!(split_number("1234,567"), Some((1234.567, "")));

        let item = parse("1,000 g flour");
        assert_eq!((item.quantity, item.unit), (1000.0, Unit::G));
        assert_eq!(item.name, "flour");
        let item = parse("1,5 kg flour");
        assert_eq!((item.quantity, item.unit), (1.5, Unit::Kg));
    }

    #[test]
    fn test_overflowing_number_is_not_a_quantity() {
        let nines = "9".repeat(400);
        assert_eq!(split_number(&nines), None);

        let line = format!("{} g flour", nines);
        let item = parse(&line);
        assert!(item.quantity.is_finite());
        assert_eq!((item.quantity, item.unit), (1.0, Unit::None));

        let item = parse(&format!("flour {}", nines));
        assert!(item.quantity.is_finite());
    }

    #[test]
    fn test_leading_quantity_and_unit() {
        let item = parse("2 cups flour");
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.unit, Unit::Cup);
        assert_eq!(item.name, "flour");
        assert_eq!(item.raw_text, "2 cups flour");
        assert_eq!(item.category, UNCATEGORIZED);
    }

    #[test]
    fn test_glued_unit() {
        let item = parse("500g rice");
        assert_eq!((item.quantity, item.unit), (500.0, Unit::G));
        assert_eq!(item.name, "rice");
    }

    #[test]
    fn test_fractions() {
        let item = parse("1/2 tsp salt");
        assert_eq!((item.quantity, item.unit), (0.5, Unit::Tsp));

        let item = parse("1 1/2 tbsp olive oil");
        assert_eq!(item.quantity, 1.5);
        assert_eq!(item.unit, Unit::Tbsp);
        assert_eq!(item.name, "olive oil");
    }

    #[test]
    fn test_decimal_comma() {
        let item = parse("0,5 kg aardappelen");
        assert_eq!((item.quantity, item.unit), (0.5, Unit::Kg));
        assert_eq!(item.name, "aardappelen");
    }

    #[test]
    fn test_trailing_quantity() {
        let item = parse("melk 1L");
        assert_eq!((item.quantity, item.unit), (1.0, Unit::L));
        assert_eq!(item.name, "melk");

        let item = parse("halfvolle melk 500 ml");
        assert_eq!((item.quantity, item.unit), (500.0, Unit::Ml));
        assert_eq!(item.name, "halfvolle melk");

        let item = parse("eggs 6");
        assert_eq!((item.quantity, item.unit), (6.0, Unit::None));
        assert_eq!(item.name, "eggs");
    }

    #[test]
    fn test_multiplier_marker() {
        let item = parse("3x yoghurt");
        assert_eq!((item.quantity, item.unit), (3.0, Unit::None));
        assert_eq!(item.name, "yoghurt");

        let item = parse("2 x bread");
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.name, "bread");
    }

    #[test]
    fn test_no_quantity_defaults_to_one() {
        let item = parse("  Bananas!  ");
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.unit, Unit::None);
        assert_eq!(item.name, "bananas");
        assert_eq!(item.raw_text, "Bananas!");
    }

    #[test]
    fn test_unit_word_becomes_name_when_nothing_else() {
        let item = parse("3 cloves");
        assert_eq!(item.quantity, 3.0);
        assert_eq!(item.unit, Unit::None);
        assert_eq!(item.name, "cloves");
    }

    #[test]
    fn test_unknown_suffix_is_not_a_quantity() {
        let item = parse("7up");
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.name, "7up");
    }

    #[test]
    fn test_name_normalization() {
        let item = parse("2   Cans   of Tomatoes,");
        assert_eq!(item.name, "cans of tomatoes");

        let parser = LineParser::new(
            UnitTable::default(),
            &ParserConfig {
                articles: vec!["de".into(), "het".into(), "een".into()],
            },
        );
        let item = parser.parse_line("de Kaas", 0).unwrap();
        assert_eq!(item.name, "kaas");
        // An article alone is kept rather than producing an empty name.
        let item = parser.parse_line("een", 0).unwrap();
        assert_eq!(item.name, "een");
    }

    #[test]
    fn test_never_negative() {
        let item = parse("-2 eggs");
        assert!(item.quantity >= 0.0);
    }

    #[test]
    fn test_blank_line_fails() {
        let parser = LineParser::default();
        assert!(matches!(
            parser.parse_line("   ", 3),
            Err(ShoppingError::Parse { .. })
        ));
        assert!(parser.parse_line("", 0).is_err());
    }

    #[test]
    fn test_any_visible_character_parses() {
        let parser = LineParser::default();
        for line in ["2", "!!!", "1/2", "kg", "  x  ", "…", "3 g", "½ lemon", "0"] {
            let item = parser
                .parse_line(line, 0)
                .unwrap_or_else(|e| panic!("{:?} failed: {}", line, e));
            assert!(!item.name.is_empty(), "empty name for {:?}", line);
            assert!(item.quantity >= 0.0);
        }
    }

    #[test]
    fn test_parse_lines_collects_failures() {
        let parser = LineParser::default();
        let outcome = parser.parse_lines(&["milk", " ", "2 eggs"]);
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[1].position, 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].position, 1);
        assert_eq!(outcome.failures[0].text, " ");
    }

    #[test]
    fn test_parse_raw_keeps_position() {
        let parser = LineParser::default();
        let item = parser.parse_raw(&RawLine::new("melk 1L", 7)).unwrap();
        assert_eq!(item.position, 7);
        assert_eq!(item, parser.parse_line("melk 1L", 7).unwrap());
        assert!(parser.parse_raw(&RawLine::new("\t", 2)).is_err());
    }
}
