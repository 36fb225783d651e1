//! Name → category lookup.
//!
//! Resolution order for a normalized name:
//!
//! 1. exact table key;
//! 2. longest key the name starts with (`"eggs"` → `egg`);
//! 3. longest key contained in the name (`"halfvolle melk"` → `melk`,
//!    `"volkorenbrood"` → `brood`);
//! 4. [`UNCATEGORIZED`].
//!
//! Prefix matches need a key of at least [`MIN_PREFIX_KEY_LEN`] characters
//! and substring matches at least [`MIN_SUBSTRING_KEY_LEN`]. Ties on
//! length go to the alphabetically first key, so the result is a pure
//! function of the name and the table.

use std::collections::BTreeMap;

use crate::models::{ParsedItem, UNCATEGORIZED};

pub const MIN_PREFIX_KEY_LEN: usize = 3;
pub const MIN_SUBSTRING_KEY_LEN: usize = 4;

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    // dairy
    ("milk", "dairy"),
    ("melk", "dairy"),
    ("butter", "dairy"),
    ("boter", "dairy"),
    ("cheese", "dairy"),
    ("kaas", "dairy"),
    ("yoghurt", "dairy"),
    ("yogurt", "dairy"),
    ("cream", "dairy"),
    ("room", "dairy"),
    ("egg", "dairy"),
    ("eieren", "dairy"),
    ("kwark", "dairy"),
    // produce
    ("apple", "produce"),
    ("appel", "produce"),
    ("banana", "produce"),
    ("banaan", "produce"),
    ("bananen", "produce"),
    ("lemon", "produce"),
    ("citroen", "produce"),
    ("tomato", "produce"),
    ("tomaat", "produce"),
    ("tomaten", "produce"),
    ("onion", "produce"),
    ("ui", "produce"),
    ("uien", "produce"),
    ("garlic", "produce"),
    ("knoflook", "produce"),
    ("potato", "produce"),
    ("aardappel", "produce"),
    ("carrot", "produce"),
    ("wortel", "produce"),
    ("lettuce", "produce"),
    ("sla", "produce"),
    ("slagroom", "dairy"),
    ("watermelon", "produce"),
    ("watermeloen", "produce"),
    ("spinach", "produce"),
    ("spinazie", "produce"),
    ("cucumber", "produce"),
    ("komkommer", "produce"),
    ("paprika", "produce"),
    ("pepper", "produce"),
    ("broccoli", "produce"),
    ("avocado", "produce"),
    ("mushroom", "produce"),
    ("champignon", "produce"),
    // bakery
    ("bread", "bakery"),
    ("brood", "bakery"),
    ("baguette", "bakery"),
    ("croissant", "bakery"),
    ("tortilla", "bakery"),
    // meat & fish
    ("chicken", "meat"),
    ("kip", "meat"),
    ("beef", "meat"),
    ("rundvlees", "meat"),
    ("gehakt", "meat"),
    ("minced meat", "meat"),
    ("pork", "meat"),
    ("bacon", "meat"),
    ("spek", "meat"),
    ("ham", "meat"),
    ("salmon", "fish"),
    ("zalm", "fish"),
    ("tuna", "fish"),
    ("tonijn", "fish"),
    ("shrimp", "fish"),
    ("garnalen", "fish"),
    // pantry
    ("flour", "pantry"),
    ("bloem", "pantry"),
    ("meel", "pantry"),
    ("rice", "pantry"),
    ("rijst", "pantry"),
    ("pasta", "pantry"),
    ("spaghetti", "pantry"),
    ("noodles", "pantry"),
    ("sugar", "pantry"),
    ("suiker", "pantry"),
    ("olive oil", "pantry"),
    ("olijfolie", "pantry"),
    ("oil", "pantry"),
    ("olie", "pantry"),
    ("vinegar", "pantry"),
    ("azijn", "pantry"),
    ("beans", "pantry"),
    ("bonen", "pantry"),
    ("peanut butter", "pantry"),
    ("pindakaas", "pantry"),
    ("honey", "pantry"),
    ("honing", "pantry"),
    ("oats", "pantry"),
    ("havermout", "pantry"),
    // spices
    ("salt", "spices"),
    ("zout", "spices"),
    ("peper", "spices"),
    ("black pepper", "spices"),
    ("cinnamon", "spices"),
    ("kaneel", "spices"),
    ("cumin", "spices"),
    ("komijn", "spices"),
    ("oregano", "spices"),
    ("basil", "spices"),
    ("basilicum", "spices"),
    // frozen
    ("ice cream", "frozen"),
    ("roomijs", "frozen"),
    ("frozen peas", "frozen"),
    ("diepvries", "frozen"),
    // beverages
    ("coffee", "beverages"),
    ("koffie", "beverages"),
    ("tea", "beverages"),
    ("thee", "beverages"),
    ("juice", "beverages"),
    ("sap", "beverages"),
    ("water", "beverages"),
    ("beer", "beverages"),
    ("bier", "beverages"),
    ("wine", "beverages"),
    ("wijn", "beverages"),
    // household
    ("toilet paper", "household"),
    ("wc-papier", "household"),
    ("detergent", "household"),
    ("wasmiddel", "household"),
    ("dish soap", "household"),
    ("afwasmiddel", "household"),
    ("soap", "household"),
    ("zeep", "household"),
];

/// Static name → category table.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: BTreeMap<String, String>,
}

impl CategoryTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or override an entry. Keys are lower-cased and whitespace-collapsed.
    pub fn insert(&mut self, name: &str, category: &str) {
        let key = name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let category = category.trim().to_lowercase();
        if key.is_empty() || category.is_empty() {
            return;
        }
        self.entries.insert(key, category);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category for a normalized name; [`UNCATEGORIZED`] when nothing matches.
    pub fn lookup(&self, name: &str) -> &str {
        if let Some(cat) = self.entries.get(name) {
            return cat;
        }
        self.longest_match(MIN_PREFIX_KEY_LEN, |key| name.starts_with(key))
            .or_else(|| self.longest_match(MIN_SUBSTRING_KEY_LEN, |key| name.contains(key)))
            .unwrap_or(UNCATEGORIZED)
    }

    fn longest_match(&self, min_len: usize, matches: impl Fn(&str) -> bool) -> Option<&str> {
        let mut best: Option<(&str, &str)> = None;
        for (key, cat) in &self.entries {
            if key.len() < min_len || !matches(key) {
                continue;
            }
            if best.map_or(true, |(k, _)| key.len() > k.len()) {
                best = Some((key.as_str(), cat.as_str()));
            }
        }
        best.map(|(_, cat)| cat)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (name, category) in DEFAULT_CATEGORIES {
            table.insert(name, category);
        }
        table
    }
}

/// Assigns categories to parsed items.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    table: CategoryTable,
}

impl Categorizer {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    pub fn category_for(&self, name: &str) -> &str {
        self.table.lookup(name)
    }

    /// Fill in categories for uncategorized items.
    ///
    /// Items that already carry a category keep it. Returns how many items
    /// end up with a category other than [`UNCATEGORIZED`].
    pub fn categorize(&self, items: &mut [ParsedItem]) -> usize {
        let mut assigned = 0;
        for item in items.iter_mut() {
            if !item.is_categorized() {
                item.category = self.category_for(&item.name).to_string();
            }
            if item.is_categorized() {
                assigned += 1;
            }
        }
        assigned
    }
}
