//! Basket mining
//!
//! Rows sharing an identical timestamp form one basket (one checkout).
//! Pairs and triples are counted over the baskets holding two or more
//! lines. Repeated products inside a basket are not collapsed.

use crate::data::SalesTable;
use crate::error::{AnalyticsError, Result};
use chrono::NaiveDateTime;
use itertools::Itertools;
use sales_math::{mean, share_pct};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Products sold under one timestamp, in row order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    pub timestamp: NaiveDateTime,
    pub items: Vec<String>,
}

impl Basket {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_multi_item(&self) -> bool {
        self.items.len() > 1
    }
}

/// Aggregate basket statistics over every basket, before any top-N cut
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketStats {
    pub total_transactions: usize,
    pub multi_item_transactions: usize,
    pub multi_item_pct: f64,
    pub mean_items: f64,
    pub max_items: usize,
}

impl BasketStats {
    pub fn from_baskets(baskets: &[Basket]) -> Self {
        let total = baskets.len();
        if total == 0 {
            return Self::default();
        }

        let multi = baskets.iter().filter(|b| b.is_multi_item()).count();
        let sizes: Vec<f64> = baskets.iter().map(|b| b.len() as f64).collect();

        Self {
            total_transactions: total,
            multi_item_transactions: multi,
            multi_item_pct: share_pct(multi as f64, total as f64),
            mean_items: mean(&sizes).unwrap_or(0.0),
            max_items: baskets.iter().map(Basket::len).max().unwrap_or(0),
        }
    }
}

/// A co-purchased pair or triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsetFrequency {
    /// Product names in sorted order
    pub items: Vec<String>,
    /// Number of times the combination appeared across multi-item baskets
    pub frequency: usize,
    /// `100 * frequency / multi-item baskets`
    pub support: f64,
}

/// Result of mining one analysis subset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketAnalysis {
    pub stats: BasketStats,
    pub pairs: Vec<ItemsetFrequency>,
    pub triples: Vec<ItemsetFrequency>,
}

/// Extracts co-purchased products from same-timestamp transactions
#[derive(Debug, Clone, Default)]
pub struct BasketMiner {
    exclusions: BTreeSet<String>,
    top_n: Option<usize>,
}

impl BasketMiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave these products out before grouping baskets
    pub fn with_exclusions<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = products.into_iter().map(Into::into).collect();
        self
    }

    /// Keep only the `n` most frequent pairs and triples
    pub fn with_top_n(mut self, n: Option<usize>) -> Self {
        self.top_n = n;
        self
    }

    /// Group rows into baskets by exact timestamp, earliest first
    pub fn baskets(&self, table: &SalesTable) -> Vec<Basket> {
        let mut grouped: BTreeMap<NaiveDateTime, Vec<String>> = BTreeMap::new();
        for record in table {
            if self.exclusions.contains(record.product()) {
                continue;
            }
            grouped
                .entry(record.timestamp())
                .or_default()
                .push(record.product().to_string());
        }

        grouped
            .into_iter()
            .map(|(timestamp, items)| Basket { timestamp, items })
            .collect()
    }

    /// Mine pairs and triples along with the aggregate statistics
    pub fn mine(&self, table: &SalesTable) -> BasketAnalysis {
        let baskets = self.baskets(table);
        let stats = BasketStats::from_baskets(&baskets);

        let multi: Vec<&Basket> = baskets.iter().filter(|b| b.is_multi_item()).collect();
        let mut pairs = tally_itemsets(&multi, 2);
        let mut triples = tally_itemsets(&multi, 3);
        if let Some(n) = self.top_n {
            pairs.truncate(n);
            triples.truncate(n);
        }

        debug!(
            baskets = stats.total_transactions,
            multi_item = stats.multi_item_transactions,
            pairs = pairs.len(),
            triples = triples.len(),
            "mined baskets"
        );

        BasketAnalysis {
            stats,
            pairs,
            triples,
        }
    }
}

/// Count every size-`k` combination across `baskets`, most frequent first.
///
/// Equal frequencies keep the order in which the combinations first
/// appeared: baskets by timestamp, combinations by sorted position.
/// `k` must be at least 1.
pub fn count_itemsets(baskets: &[&Basket], k: usize) -> Result<Vec<ItemsetFrequency>> {
    if k == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "Itemset size must be greater than zero".to_string(),
        ));
    }
    Ok(tally_itemsets(baskets, k))
}

fn tally_itemsets(baskets: &[&Basket], k: usize) -> Vec<ItemsetFrequency> {
    let mut order: Vec<Vec<String>> = Vec::new();
    let mut counts: HashMap<Vec<String>, usize> = HashMap::new();

    for basket in baskets {
        let mut items = basket.items.clone();
        items.sort();
        for combo in items.into_iter().combinations(k) {
            match counts.get_mut(&combo) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(combo.clone(), 1);
                    order.push(combo);
                }
            }
        }
    }

    let denominator = baskets.len() as f64;
    let mut itemsets: Vec<ItemsetFrequency> = order
        .into_iter()
        .map(|items| {
            let frequency = counts.get(&items).copied().unwrap_or(0);
            ItemsetFrequency {
                support: share_pct(frequency as f64, denominator),
                items,
                frequency,
            }
        })
        .collect();

    // Stable, so ties stay in first-seen order
    itemsets.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    itemsets
}
