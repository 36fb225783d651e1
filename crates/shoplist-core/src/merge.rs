//! Merge engine: deduplicates categorized items into [`ShoppingItem`]s.
//!
//! # Algorithm
//!
//! 1. Order items by input position.
//! 2. Group by key = (merge name, unit dimension, completed). The merge name
//!    is case-folded, whitespace-collapsed, with a trailing plural `s`
//!    removed. Items in different dimensions, or with different `completed`
//!    flags, never share a group.
//! 3. `sum` / `max`: convert every member to the dimension base, combine,
//!    and express the result in the smallest unit present in the group
//!    (lowest factor, first appearance on ties). `2 cup + 1 cup` stays
//!    `3 cup`; `1 kg + 200 g` becomes `1200 g`.
//! 4. `keep-separate`: one output item per input item, input order.
//!
//! Groups are emitted in order of their first member. Every input item ends
//! up in exactly one output item, so `items_merged = input - output`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShoppingError;
use crate::models::{ParsedItem, ShoppingItem, UNCATEGORIZED};
use crate::units::{Dimension, Unit};

pub const DEFAULT_NOTES_SEPARATOR: &str = "; ";
pub const DEFAULT_MAX_NOTES_LEN: usize = 500;

const TRUNCATION_MARK: char = '…';

/// How duplicate items are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    #[default]
    Sum,
    Max,
    KeepSeparate,
}

impl MergeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::Sum => "sum",
            MergeStrategy::Max => "max",
            MergeStrategy::KeepSeparate => "keep-separate",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = ShoppingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sum" => Ok(MergeStrategy::Sum),
            "max" => Ok(MergeStrategy::Max),
            "keep-separate" => Ok(MergeStrategy::KeepSeparate),
            other => Err(ShoppingError::InvalidStrategy(other.to_string())),
        }
    }
}

/// Tunables for the audit notes attached to merged items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    pub notes_separator: String,
    /// Upper bound on the notes length in characters, excluding the
    /// truncation mark.
    pub max_notes_len: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            notes_separator: DEFAULT_NOTES_SEPARATOR.to_string(),
            max_notes_len: DEFAULT_MAX_NOTES_LEN,
        }
    }
}

/// Result of one merge run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub items: Vec<ShoppingItem>,
    /// `input - output`; always 0 for `keep-separate`.
    pub items_merged: usize,
    /// How many items share a group with an earlier item, whether or not
    /// the strategy actually merged them.
    pub duplicates_detected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MergeKey {
    name: String,
    dimension: Dimension,
    completed: bool,
}

impl MergeKey {
    fn of(item: &ParsedItem) -> Self {
        Self {
            name: merge_name(&item.name),
            dimension: item.unit.dimension(),
            completed: item.completed,
        }
    }
}

/// Stateless merge engine.
#[derive(Debug, Clone, Default)]
pub struct MergeEngine {
    options: MergeOptions,
}

impl MergeEngine {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    pub fn merge(&self, mut items: Vec<ParsedItem>, strategy: MergeStrategy) -> MergeOutcome {
        if items.is_empty() {
            return MergeOutcome::default();
        }
        items.sort_by_key(|i| i.position);
        let input_count = items.len();

        let mut index: HashMap<MergeKey, usize> = HashMap::new();
        let mut groups: Vec<Vec<ParsedItem>> = Vec::new();

        if strategy == MergeStrategy::KeepSeparate {
            let mut group_count = 0;
            let mut out = Vec::with_capacity(input_count);
            for item in items {
                index.entry(MergeKey::of(&item)).or_insert_with(|| {
                    group_count += 1;
                    group_count - 1
                });
                out.push(self.single(item));
            }
            return MergeOutcome {
                items: out,
                items_merged: 0,
                duplicates_detected: input_count - group_count,
            };
        }

        for item in items {
            let key = MergeKey::of(&item);
            match index.get(&key) {
                Some(&g) => groups[g].push(item),
                None => {
                    index.insert(key, groups.len());
                    groups.push(vec![item]);
                }
            }
        }

        let out: Vec<ShoppingItem> = groups
            .into_iter()
            .map(|members| self.combine(members, strategy))
            .collect();

        MergeOutcome {
            items_merged: input_count - out.len(),
            duplicates_detected: input_count - out.len(),
            items: out,
        }
    }

    fn single(&self, item: ParsedItem) -> ShoppingItem {
        let notes = self.build_notes(std::iter::once(item.raw_text.as_str()));
        ShoppingItem {
            id: item.source_id.unwrap_or_else(new_item_id),
            name: item.name,
            // Unrounded, so a later sum over these items matches a direct sum.
            quantity: item.quantity.max(0.0),
            unit: item.unit,
            category: item.category,
            completed: item.completed,
            notes,
        }
    }

    fn combine(&self, members: Vec<ParsedItem>, strategy: MergeStrategy) -> ShoppingItem {
        let unit = smallest_unit(&members);
        let base_quantities = members.iter().map(|m| m.unit.to_base(m.quantity.max(0.0)));
        let total: f64 = match strategy {
            MergeStrategy::Max => base_quantities.fold(0.0, f64::max),
            _ => base_quantities.sum(),
        };
        let total = if total.is_finite() { total } else { f64::MAX };

        let category = members
            .iter()
            .find(|m| m.is_categorized())
            .map(|m| m.category.clone())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let id = members
            .iter()
            .find_map(|m| m.source_id.clone())
            .unwrap_or_else(new_item_id);
        let notes = self.build_notes(members.iter().map(|m| m.raw_text.as_str()));
        let first = &members[0];

        ShoppingItem {
            id,
            name: first.name.clone(),
            quantity: round_quantity(unit.from_base(total)),
            unit,
            category,
            completed: first.completed,
            notes,
        }
    }

    /// Join distinct raw texts, dropping entries past `max_notes_len`.
    fn build_notes<'a>(&self, texts: impl Iterator<Item = &'a str>) -> Option<String> {
        let max = self.options.max_notes_len;
        let sep = self.options.notes_separator.as_str();
        let mut seen: Vec<&str> = Vec::new();
        let mut notes = String::new();
        let mut len = 0;
        let mut truncated = false;

        for text in texts.map(str::trim).filter(|t| !t.is_empty()) {
            if seen.contains(&text) {
                continue;
            }
            seen.push(text);

            let text_len = text.chars().count();
            let extra = if notes.is_empty() {
                text_len
            } else {
                sep.chars().count() + text_len
            };
            if len + extra > max {
                if notes.is_empty() {
                    notes.extend(text.chars().take(max));
                }
                truncated = true;
                break;
            }
            if !notes.is_empty() {
                notes.push_str(sep);
            }
            notes.push_str(text);
            len += extra;
        }

        if truncated {
            notes.push(TRUNCATION_MARK);
        }
        (!notes.is_empty()).then_some(notes)
    }
}

/// Name used for duplicate detection: case-folded, whitespace-collapsed,
/// trailing plural `s` removed (`"Eggs "` → `"egg"`, `"glass"` unchanged).
pub fn merge_name(name: &str) -> String {
    let folded = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    match folded.strip_suffix('s') {
        Some(stem) if stem.chars().count() >= 3 && !stem.ends_with('s') => stem.to_string(),
        _ => folded,
    }
}

fn smallest_unit(members: &[ParsedItem]) -> Unit {
    let mut best = members[0].unit;
    for m in &members[1..] {
        if m.unit.factor() < best.factor() {
            best = m.unit;
        }
    }
    best
}

fn round_quantity(q: f64) -> f64 {
    let scaled = q * 10_000.0;
    if scaled.is_finite() {
        scaled.round() / 10_000.0
    } else {
        q
    }
}

fn new_item_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
