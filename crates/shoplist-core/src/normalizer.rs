//! [`ShoppingListNormalizer`]: parser + categorizer + merge engine behind one
//! entry point per use case.
//!
//! | Method | Use case |
//! |--------|----------|
//! | [`standardize`](ShoppingListNormalizer::standardize) | one item per line, no merging |
//! | [`normalize`](ShoppingListNormalizer::normalize) | parse, categorize, merge |
//! | [`clean_up`](ShoppingListNormalizer::clean_up) | re-merge items already stored in a list |

use serde::{Deserialize, Serialize};

use crate::categorizer::{CategoryTable, Categorizer};
use crate::merge::{MergeEngine, MergeOptions, MergeStrategy};
use crate::models::{ParsedItem, ShoppingItem};
use crate::parser::{LineParser, ParseFailure, ParserConfig};
use crate::units::UnitTable;

/// Everything needed to build a normalizer.
#[derive(Debug, Clone, Default)]
pub struct NormalizerConfig {
    pub units: UnitTable,
    pub parser: ParserConfig,
    pub categories: CategoryTable,
    pub merge: MergeOptions,
}

/// Output of [`ShoppingListNormalizer::standardize`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardizeOutcome {
    pub items: Vec<ShoppingItem>,
    pub failures: Vec<ParseFailure>,
    pub categories_assigned: usize,
}

/// Output of [`ShoppingListNormalizer::normalize`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeOutcome {
    pub items: Vec<ShoppingItem>,
    pub failures: Vec<ParseFailure>,
    pub items_merged: usize,
    pub duplicates_detected: usize,
    pub categories_assigned: usize,
}

/// Output of [`ShoppingListNormalizer::clean_up`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub items: Vec<ShoppingItem>,
    pub items_merged: usize,
    pub duplicates_detected: usize,
    pub categories_assigned: usize,
}

/// Read-only, shareable pipeline. Build once, use from any number of
/// requests.
#[derive(Debug, Clone, Default)]
pub struct ShoppingListNormalizer {
    parser: LineParser,
    categorizer: Categorizer,
    engine: MergeEngine,
}

impl ShoppingListNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            parser: LineParser::new(config.units, &config.parser),
            categorizer: Categorizer::new(config.categories),
            engine: MergeEngine::new(config.merge),
        }
    }

    pub fn parser(&self) -> &LineParser {
        &self.parser
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    pub fn engine(&self) -> &MergeEngine {
        &self.engine
    }

    /// Parse and categorize each line into its own item, in input order.
    pub fn standardize<S: AsRef<str>>(&self, lines: &[S]) -> StandardizeOutcome {
        let outcome = self.normalize(lines, MergeStrategy::KeepSeparate);
        StandardizeOutcome {
            items: outcome.items,
            failures: outcome.failures,
            categories_assigned: outcome.categories_assigned,
        }
    }

    /// Full pipeline: parse → categorize → merge.
    pub fn normalize<S: AsRef<str>>(&self, lines: &[S], strategy: MergeStrategy) -> NormalizeOutcome {
        let parsed = self.parser.parse_lines(lines);
        let mut items = parsed.items;
        let categories_assigned = self.categorizer.categorize(&mut items);
        let merged = self.engine.merge(items, strategy);

        NormalizeOutcome {
            items: merged.items,
            failures: parsed.failures,
            items_merged: merged.items_merged,
            duplicates_detected: merged.duplicates_detected,
            categories_assigned,
        }
    }

    /// Re-categorize and merge items that are already stored in a list.
    ///
    /// Stored ids survive: a merged item keeps the id of the first stored
    /// member of its group.
    pub fn clean_up(&self, items: &[ShoppingItem], strategy: MergeStrategy) -> CleanupReport {
        let mut parsed: Vec<ParsedItem> = items
            .iter()
            .enumerate()
            .map(|(position, item)| ParsedItem::from_stored(item, position))
            .collect();
        let categories_assigned = self.categorizer.categorize(&mut parsed);
        let merged = self.engine.merge(parsed, strategy);

        CleanupReport {
            items: merged.items,
            items_merged: merged.items_merged,
            duplicates_detected: merged.duplicates_detected,
            categories_assigned,
        }
    }
}
