use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use sales_analytics::utils::generate_sample_sales;
use sales_analytics::{
    comparison_period, select_period, BcgAnalyzer, BcgCategory, ComparisonLabel, Period,
    SaleRecord, SalesTable,
};

fn at(ts: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn sample_table() -> SalesTable {
    generate_sample_sales(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 90, 42)
}

#[test]
fn test_no_baseline_gives_new_product_growth() {
    let table = SalesTable::new(vec![
        SaleRecord::new(at("2024-05-10 10:00:00"), "A", 50),
        SaleRecord::new(at("2024-05-11 10:00:00"), "B", 30),
        SaleRecord::new(at("2024-05-12 10:00:00"), "C", 20),
    ]);
    let matrix = BcgAnalyzer::new().analyze_period(&table, Period::month(2024, 5).unwrap());

    assert_eq!(
        matrix.comparison,
        ComparisonLabel::PreviousMonth { year: 2024, month: 4 }
    );
    let expected = [
        ("A", 50.0, BcgCategory::Star),
        ("B", 30.0, BcgCategory::Star),
        ("C", 20.0, BcgCategory::QuestionMark),
    ];
    for (product, participation, category) in expected {
        let record = matrix.get(product).unwrap();
        assert_relative_eq!(record.participation, participation, epsilon = 1e-9);
        assert_eq!(record.growth_rate, 100.0);
        assert_eq!(record.category, category);
    }
    assert_relative_eq!(matrix.participation_median, 30.0, epsilon = 1e-9);
}

#[test]
fn test_all_data_midpoint_split() {
    let start = at("2024-01-01 00:00:00");
    let records: Vec<SaleRecord> = (0..=10)
        .map(|day| SaleRecord::new(start + Duration::days(day), "A", 1))
        .collect();
    let table = SalesTable::new(records);

    let window = comparison_period(&table, &table, Period::AllData);
    let baseline_dates: Vec<u32> = window
        .baseline
        .dates()
        .iter()
        .map(|d| chrono::Datelike::day(d))
        .collect();
    assert_eq!(baseline_dates, vec![1, 2, 3, 4, 5]);
    // The row exactly at the midpoint belongs to the current half
    assert_eq!(window.current.len(), 6);
    assert_eq!(window.current.time_bounds().unwrap().0, at("2024-01-06 00:00:00"));
    assert_eq!(window.label, ComparisonLabel::Halves);
}

#[test]
fn test_decline_against_previous_month() {
    let table = SalesTable::new(vec![
        SaleRecord::new(at("2024-01-20 10:00:00"), "A", 10),
        SaleRecord::new(at("2024-02-03 10:00:00"), "A", 5),
    ]);
    let matrix = BcgAnalyzer::new().analyze_period(&table, Period::month(2024, 2).unwrap());

    assert_relative_eq!(matrix.get("A").unwrap().growth_rate, -50.0);
}

#[test]
fn test_january_compares_with_previous_december() {
    let table = SalesTable::new(vec![
        SaleRecord::new(at("2023-12-20 10:00:00"), "A", 4),
        SaleRecord::new(at("2024-01-03 10:00:00"), "A", 6),
    ]);
    let matrix = BcgAnalyzer::new().analyze_period(&table, Period::month(2024, 1).unwrap());

    assert_eq!(
        matrix.comparison,
        ComparisonLabel::PreviousMonth { year: 2023, month: 12 }
    );
    assert_relative_eq!(matrix.get("A").unwrap().growth_rate, 50.0);
}

#[test]
fn test_empty_period_yields_empty_matrix() {
    let table = sample_table();
    let matrix = BcgAnalyzer::new().analyze_period(&table, Period::month(2019, 6).unwrap());

    assert!(matrix.is_empty());
    assert_eq!(
        matrix.comparison,
        ComparisonLabel::PreviousMonth { year: 2019, month: 5 }
    );

    let empty = BcgAnalyzer::new().analyze_period(&SalesTable::empty(), Period::AllData);
    assert!(empty.is_empty());
    assert_eq!(empty.comparison, ComparisonLabel::Halves);
}

#[test]
fn test_zero_quantity_rows_do_not_divide_by_zero() {
    let table = SalesTable::new(vec![
        SaleRecord::new(at("2024-01-20 10:00:00"), "A", 0),
        SaleRecord::new(at("2024-02-03 10:00:00"), "A", 0),
        SaleRecord::new(at("2024-02-04 10:00:00"), "B", 0),
    ]);
    let matrix = BcgAnalyzer::new().analyze_period(&table, Period::month(2024, 2).unwrap());

    for record in &matrix.records {
        assert!(record.participation.is_finite());
        assert!(record.growth_rate.is_finite());
    }
}

#[test]
fn test_participation_sums_to_hundred() {
    let table = sample_table();
    for period in [
        Period::AllData,
        Period::month(2024, 1).unwrap(),
        Period::month(2024, 3).unwrap(),
    ] {
        let matrix = BcgAnalyzer::new().analyze_period(&table, period);
        let total: f64 = matrix.records.iter().map(|r| r.participation).sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
    }
}

#[test]
fn test_half_of_products_at_or_above_median() {
    let table = sample_table();
    let matrix = BcgAnalyzer::new().analyze_period(&table, Period::month(2024, 2).unwrap());

    let n = matrix.len();
    let at_or_above = matrix
        .records
        .iter()
        .filter(|r| r.participation >= matrix.participation_median)
        .count();
    let at_or_below = matrix
        .records
        .iter()
        .filter(|r| r.participation <= matrix.participation_median)
        .count();
    assert!(n > 0);
    assert!(at_or_above >= (n + 1) / 2);
    assert!(at_or_below >= (n + 1) / 2);
}

#[test]
fn test_classification_is_a_function_of_the_medians() {
    let table = sample_table();
    let matrix = BcgAnalyzer::new().analyze_period(&table, Period::AllData);

    for record in &matrix.records {
        let expected = BcgCategory::classify(
            record.participation >= matrix.participation_median,
            record.growth_rate >= matrix.growth_median,
        );
        assert_eq!(record.category, expected);
    }

    let counts = matrix.category_counts();
    assert_eq!(counts.len(), BcgCategory::ALL.len());
    assert_eq!(counts.values().sum::<usize>(), matrix.len());
}

#[test]
fn test_analysis_is_idempotent() {
    let table = sample_table();
    let period = Period::month(2024, 3).unwrap();
    let analyzer = BcgAnalyzer::new();

    assert_eq!(
        analyzer.analyze_period(&table, period),
        analyzer.analyze_period(&table, period)
    );

    let analysis = select_period(&table, period);
    let window = comparison_period(&analysis, &table, period);
    assert_eq!(analyzer.analyze(&analysis, &window), analyzer.analyze_period(&table, period));
}
