//! Measurement units, dimension classes, and the alias table the parser uses.
//!
//! Every [`Unit`] belongs to exactly one [`Dimension`] and carries a factor
//! to that dimension's base unit:
//!
//! | Dimension | Units (factor to base) |
//! |-----------|------------------------|
//! | mass      | g (1), kg (1000) |
//! | volume    | ml (1), tsp (5), tbsp (15), cup (240), l (1000) |
//! | count     | `""` (1), piece (1), clove (1), pinch (1) |
//!
//! Units in different dimensions are never converted into each other.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Class of mutually convertible units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mass,
    Volume,
    Count,
}

/// The fixed set of units an item quantity can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    /// Unit-less count ("3 eggs").
    #[default]
    None,
    Ml,
    L,
    G,
    Kg,
    Piece,
    Tbsp,
    Tsp,
    Cup,
    Clove,
    Pinch,
}

impl Unit {
    pub const ALL: [Unit; 11] = [
        Unit::None,
        Unit::Ml,
        Unit::L,
        Unit::G,
        Unit::Kg,
        Unit::Piece,
        Unit::Tbsp,
        Unit::Tsp,
        Unit::Cup,
        Unit::Clove,
        Unit::Pinch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::None => "",
            Unit::Ml => "ml",
            Unit::L => "l",
            Unit::G => "g",
            Unit::Kg => "kg",
            Unit::Piece => "piece",
            Unit::Tbsp => "tbsp",
            Unit::Tsp => "tsp",
            Unit::Cup => "cup",
            Unit::Clove => "clove",
            Unit::Pinch => "pinch",
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::G | Unit::Kg => Dimension::Mass,
            Unit::Ml | Unit::L | Unit::Tbsp | Unit::Tsp | Unit::Cup => Dimension::Volume,
            Unit::None | Unit::Piece | Unit::Clove | Unit::Pinch => Dimension::Count,
        }
    }

    /// Multiplier converting a quantity in this unit to the dimension base
    /// (grams, milliliters, or plain count).
    pub fn factor(&self) -> f64 {
        match self {
            Unit::Kg | Unit::L => 1000.0,
            Unit::Cup => 240.0,
            Unit::Tbsp => 15.0,
            Unit::Tsp => 5.0,
            Unit::G | Unit::Ml => 1.0,
            Unit::None | Unit::Piece | Unit::Clove | Unit::Pinch => 1.0,
        }
    }

    pub fn to_base(&self, quantity: f64) -> f64 {
        quantity * self.factor()
    }

    pub fn from_base(&self, base_quantity: f64) -> f64 {
        base_quantity / self.factor()
    }

    pub fn is_comparable(&self, other: &Unit) -> bool {
        self.dimension() == other.dimension()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    /// Parses the canonical unit names only; surface aliases go through
    /// [`UnitTable::lookup`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Unit::ALL
            .iter()
            .find(|u| u.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown unit: '{}'", s))
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Surface-token → [`Unit`] table used by the line parser.
///
/// Lookups are case-insensitive and ignore a trailing period ("tbsp.").
/// A trailing plural `s` is tried when the exact token is unknown.
#[derive(Debug, Clone)]
pub struct UnitTable {
    aliases: HashMap<String, Unit>,
}

const DEFAULT_ALIASES: &[(&str, Unit)] = &[
    ("ml", Unit::Ml),
    ("milliliter", Unit::Ml),
    ("millilitre", Unit::Ml),
    ("l", Unit::L),
    ("liter", Unit::L),
    ("litre", Unit::L),
    ("ltr", Unit::L),
    ("g", Unit::G),
    ("gr", Unit::G),
    ("gram", Unit::G),
    ("gramme", Unit::G),
    ("kg", Unit::Kg),
    ("kilo", Unit::Kg),
    ("kilogram", Unit::Kg),
    ("piece", Unit::Piece),
    ("pc", Unit::Piece),
    ("pcs", Unit::Piece),
    ("stuk", Unit::Piece),
    ("stuks", Unit::Piece),
    ("tbsp", Unit::Tbsp),
    ("tablespoon", Unit::Tbsp),
    ("el", Unit::Tbsp),
    ("eetlepel", Unit::Tbsp),
    ("tsp", Unit::Tsp),
    ("teaspoon", Unit::Tsp),
    ("tl", Unit::Tsp),
    ("theelepel", Unit::Tsp),
    ("cup", Unit::Cup),
    ("kop", Unit::Cup),
    ("clove", Unit::Clove),
    ("teen", Unit::Clove),
    ("teentje", Unit::Clove),
    ("teentjes", Unit::Clove),
    ("pinch", Unit::Pinch),
    ("pinches", Unit::Pinch),
    ("snufje", Unit::Pinch),
];

impl UnitTable {
    /// An empty table; nothing is recognized as a unit.
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Register (or override) an alias.
    pub fn insert(&mut self, alias: &str, unit: Unit) {
        self.aliases.insert(alias.trim().to_lowercase(), unit);
    }

    pub fn lookup(&self, token: &str) -> Option<Unit> {
        let token = token.trim().trim_end_matches('.').to_lowercase();
        if token.is_empty() {
            return None;
        }
        if let Some(unit) = self.aliases.get(&token) {
            return Some(*unit);
        }
        // "cups", "cloves", "liters"
        token
            .strip_suffix('s')
            .filter(|stem| stem.len() > 1)
            .and_then(|stem| self.aliases.get(stem))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (alias, unit) in DEFAULT_ALIASES {
            table.insert(alias, *unit);
        }
        table
    }
}
