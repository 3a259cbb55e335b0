use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use sales_analytics::basket::count_itemsets;
use sales_analytics::utils::generate_sample_sales;
use sales_analytics::{select_period, BasketMiner, Period, SaleRecord, SalesTable};
use std::collections::BTreeSet;

fn at(ts: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn basket_table(baskets: &[(&str, &[&str])]) -> SalesTable {
    baskets
        .iter()
        .flat_map(|(ts, items)| {
            items
                .iter()
                .map(move |item| SaleRecord::new(at(ts), *item, 1))
        })
        .collect()
}

/// Sample sales with repeated products collapsed inside each checkout
fn distinct_sample() -> SalesTable {
    let table = generate_sample_sales(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 30, 11);
    let mut seen = BTreeSet::new();
    table
        .iter()
        .filter(|r| seen.insert((r.timestamp(), r.product().to_string())))
        .cloned()
        .collect()
}

#[test]
fn test_pairs_and_triples_from_checkouts() {
    let table = basket_table(&[
        ("2024-01-01 10:00:00", &["A", "B"][..]),
        ("2024-01-01 11:00:00", &["A", "B", "C"][..]),
        ("2024-01-01 12:00:00", &["A"][..]),
    ]);
    let analysis = BasketMiner::new().mine(&table);

    let pairs: Vec<(String, usize, f64)> = analysis
        .pairs
        .iter()
        .map(|p| (p.items.join("+"), p.frequency, p.support))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("A+B".to_string(), 2, 100.0),
            ("A+C".to_string(), 1, 50.0),
            ("B+C".to_string(), 1, 50.0),
        ]
    );

    assert_eq!(analysis.triples.len(), 1);
    assert_eq!(analysis.triples[0].items, vec!["A", "B", "C"]);
    assert_eq!(analysis.triples[0].frequency, 1);
    assert_eq!(analysis.triples[0].support, 50.0);

    assert_eq!(analysis.stats.total_transactions, 3);
    assert_eq!(analysis.stats.multi_item_transactions, 2);
    assert_eq!(analysis.stats.max_items, 3);
    assert!((analysis.stats.mean_items - 2.0).abs() < 1e-9);
}

#[test]
fn test_timestamps_are_not_rounded() {
    let table = basket_table(&[
        ("2024-01-01 10:00:00", &["A"][..]),
        ("2024-01-01 10:00:01", &["B"][..]),
    ]);
    let analysis = BasketMiner::new().mine(&table);

    assert_eq!(analysis.stats.total_transactions, 2);
    assert!(analysis.pairs.is_empty());
}

#[test]
fn test_top_n_keeps_full_statistics() {
    let table = distinct_sample();
    let full = BasketMiner::new().mine(&table);
    let cut = BasketMiner::new().with_top_n(Some(5)).mine(&table);

    assert_eq!(cut.stats, full.stats);
    assert_eq!(cut.pairs.len(), 5.min(full.pairs.len()));
    assert_eq!(&cut.pairs[..], &full.pairs[..cut.pairs.len()]);
}

#[test]
fn test_pair_frequency_bounded_by_item_counts() {
    let table = distinct_sample();
    let miner = BasketMiner::new();
    let baskets = miner.baskets(&table);
    let analysis = miner.mine(&table);

    let containing = |product: &str| {
        baskets
            .iter()
            .filter(|b| b.is_multi_item() && b.items.iter().any(|i| i == product))
            .count()
    };

    assert!(!analysis.pairs.is_empty());
    for pair in &analysis.pairs {
        let bound = containing(&pair.items[0]).min(containing(&pair.items[1]));
        assert!(pair.frequency <= bound, "{:?} exceeds {}", pair, bound);
    }
}

#[test]
fn test_support_is_a_percentage() {
    let table = distinct_sample();
    let analysis = BasketMiner::new().mine(&table);

    for itemset in analysis.pairs.iter().chain(&analysis.triples) {
        assert!(itemset.support > 0.0 && itemset.support <= 100.0);
    }
}

#[test]
fn test_frequencies_are_sorted_descending() {
    let table = distinct_sample();
    let analysis = BasketMiner::new().mine(&table);

    assert!(analysis
        .pairs
        .windows(2)
        .all(|w| w[0].frequency >= w[1].frequency));
    assert!(analysis
        .triples
        .windows(2)
        .all(|w| w[0].frequency >= w[1].frequency));
}

#[test]
fn test_mining_is_idempotent() {
    let table = generate_sample_sales(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 45, 3);
    let subset = select_period(&table, Period::month(2024, 2).unwrap());
    let miner = BasketMiner::new().with_exclusions(["Pan de campo"]);

    assert_eq!(miner.mine(&subset), miner.mine(&subset));
}

#[test]
fn test_count_itemsets_without_multi_item_baskets() {
    assert!(count_itemsets(&[], 2).unwrap().is_empty());
}
