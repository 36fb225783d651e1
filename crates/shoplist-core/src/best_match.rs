//! Best-match selection over search-oracle candidates, and the per-supermarket
//! price comparison built on it.

use serde::Serialize;

use crate::models::{ProductCandidate, ShoppingItem};

/// Matches kept per shopping item when the caller does not say otherwise.
pub const DEFAULT_MATCH_COUNT: usize = 3;

/// Ranking distance: missing or NaN distances sort last.
fn rank(distance: Option<f64>) -> f64 {
    match distance {
        Some(d) if !d.is_nan() => d,
        _ => f64::INFINITY,
    }
}

/// Return the `count` closest candidates, ascending by distance.
///
/// The sort is stable, so equal distances keep their input order. The
/// input slice is left untouched.
pub fn select_best_matches(candidates: &[ProductCandidate], count: usize) -> Vec<ProductCandidate> {
    let mut ranked: Vec<&ProductCandidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| rank(a.distance).total_cmp(&rank(b.distance)));
    ranked.into_iter().take(count).cloned().collect()
}

/// Candidates the oracle returned for one shopping item.
#[derive(Debug, Clone)]
pub struct ItemMatches {
    pub item: ShoppingItem,
    pub candidates: Vec<ProductCandidate>,
}

/// The product a supermarket would sell for one shopping item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedItem {
    pub item_id: String,
    pub item_name: String,
    pub product_name: String,
    pub price: f64,
    pub unit: String,
    pub distance: Option<f64>,
}

/// One supermarket's basket for the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupermarketComparison {
    pub supermarket_name: String,
    pub items: Vec<PricedItem>,
    pub total: f64,
}

/// Build one basket per supermarket.
///
/// For every supermarket that appears in any candidate set, pick its
/// closest candidate for each shopping item. Items a supermarket has no
/// candidate for are left out of its basket. Baskets are ordered by items
/// covered (most first), then total (cheapest first), then name.
pub fn compare_supermarkets(matches: &[ItemMatches]) -> Vec<SupermarketComparison> {
    let mut baskets: Vec<SupermarketComparison> = Vec::new();

    for m in matches {
        for candidate in select_best_matches(&m.candidates, m.candidates.len()) {
            if !candidate.price.is_finite() || candidate.price < 0.0 {
                continue;
            }
            let idx = match baskets
                .iter()
                .position(|b| b.supermarket_name == candidate.supermarket_name)
            {
                Some(idx) => idx,
                None => {
                    baskets.push(SupermarketComparison {
                        supermarket_name: candidate.supermarket_name.clone(),
                        items: Vec::new(),
                        total: 0.0,
                    });
                    baskets.len() - 1
                }
            };
            let basket = &mut baskets[idx];
            // Candidates are sorted, so the first one per item is the closest.
            if basket.items.iter().any(|p| p.item_id == m.item.id) {
                continue;
            }
            basket.items.push(PricedItem {
                item_id: m.item.id.clone(),
                item_name: m.item.name.clone(),
                product_name: candidate.name,
                price: candidate.price,
                unit: candidate.unit,
                distance: candidate.distance,
            });
        }
    }

    for basket in &mut baskets {
        let total: f64 = basket.items.iter().map(|p| p.price).sum();
        basket.total = (total * 100.0).round() / 100.0;
    }

    baskets.sort_by(|a, b| {
        b.items
            .len()
            .cmp(&a.items.len())
            .then(a.total.total_cmp(&b.total))
            .then(a.supermarket_name.cmp(&b.supermarket_name))
    });
    baskets
}
