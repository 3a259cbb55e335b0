use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use sales_analytics::export::{export_to_dir, to_json};
use sales_analytics::utils::generate_sample_sales;
use sales_analytics::{
    load_config, AnalysisReport, BcgCategory, ComparisonBaseline, ItemsetFrequency, Period,
    SalesAnalysis,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Sales analytics for a delicatessen point of sale.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Point-of-sale CSV export. A generated demo dataset is used when omitted.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Period to analyze: "all" or "YYYY-MM".
    #[arg(long, global = true, default_value = "all")]
    period: Period,

    /// Products left out of basket mining, on top of the configured ones.
    #[arg(long, global = true, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Directory receiving the CSV tables and a JSON report.
    #[arg(long, global = true)]
    export: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the periods that have sales.
    Periods,
    /// Classify products on the growth-share matrix.
    Bcg(BcgArgs),
    /// Show the most frequent product pairs and triples.
    Baskets,
    /// Show peak hours, weekday totals and the product ranking.
    Overview(OverviewArgs),
    /// Compare one date against comparable days.
    SpecialDate(SpecialDateArgs),
}

#[derive(Parser)]
struct BcgArgs {
    /// Only list products in this category (e.g., "star", "dog").
    #[arg(long)]
    category: Option<String>,
}

#[derive(Parser)]
struct OverviewArgs {
    /// Number of products in the ranking.
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Also show the detail of one product.
    #[arg(long)]
    product: Option<String>,
}

#[derive(Parser)]
struct SpecialDateArgs {
    /// The date to inspect (format: YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,

    /// Baseline days: "same-weekday" or "overall".
    #[arg(long, default_value = "same-weekday")]
    baseline: ComparisonBaseline,

    /// Number of gainers to list.
    #[arg(long, default_value_t = sales_analytics::special_dates::DEFAULT_TOP_GAINERS)]
    top: usize,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let analysis = open_analysis(&cli)?;

    let report = needs_report(&cli).then(|| analysis.report(cli.period));

    match (&cli.command, &report) {
        (Commands::Periods, _) => print_periods(&analysis),
        (Commands::SpecialDate(args), _) => print_special_date(&analysis, args),
        (Commands::Bcg(args), Some(report)) => print_bcg(report, args)?,
        (Commands::Baskets, Some(report)) => print_baskets(report),
        (Commands::Overview(args), Some(report)) => print_overview(&analysis, report, args),
        (_, None) => {}
    }

    if let (Some(dir), Some(report)) = (&cli.export, &report) {
        export_report(report, dir)?;
    }

    Ok(())
}

/// Whether the period report is computed, once, for printing or export
fn needs_report(cli: &Cli) -> bool {
    cli.export.is_some()
        || matches!(
            cli.command,
            Commands::Bcg(_) | Commands::Baskets | Commands::Overview(_)
        )
}

fn open_analysis(cli: &Cli) -> Result<SalesAnalysis> {
    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    config.basket.exclude.extend(cli.exclude.iter().cloned());

    match &cli.data {
        Some(path) => SalesAnalysis::from_csv(config, path)
            .with_context(|| format!("Failed to load sales from {}", path.display())),
        None => {
            warn!("no --data given, using generated demo sales");
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("invalid demo start date")?;
            Ok(SalesAnalysis::new(config, generate_sample_sales(start, 120, 7)))
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

fn print_periods(analysis: &SalesAnalysis) {
    let locale = analysis.config().locale;
    let mut table = new_table();
    table.set_header(vec!["Period", "Label", "Units"]);
    for period in analysis.periods() {
        let units = sales_analytics::select_period(analysis.table(), period).total_quantity();
        table.add_row(vec![
            period.to_string(),
            period.label(locale),
            units.to_string(),
        ]);
    }
    println!("{table}");
}

fn parse_category(name: &str) -> Result<BcgCategory> {
    let wanted = name.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
    BcgCategory::ALL
        .into_iter()
        .find(|c| c.to_string().to_ascii_lowercase().replace('-', "") == wanted)
        .with_context(|| format!("Unknown BCG category '{}'", name))
}

fn print_bcg(report: &AnalysisReport, args: &BcgArgs) -> Result<()> {
    println!("{} (compared with {})", report.period_label, report.comparison_label);
    if report.bcg.is_empty() {
        println!("No sales in this period.");
        return Ok(());
    }

    let records = match &args.category {
        Some(name) => report.bcg.by_category(parse_category(name)?),
        None => report.bcg.records.iter().collect(),
    };

    let mut table = new_table();
    table.set_header(vec!["Product", "Units", "Share %", "Growth %", "Category"]);
    for record in records {
        table.add_row(vec![
            record.product.clone(),
            record.quantity.to_string(),
            format!("{:.2}", record.participation),
            format!("{:+.1}", record.growth_rate),
            record.category.to_string(),
        ]);
    }
    println!("{table}");
    println!(
        "Medians: share {:.2}%, growth {:+.1}%",
        report.bcg.participation_median, report.bcg.growth_median
    );

    let counts = report
        .bcg
        .category_counts()
        .into_iter()
        .map(|(category, count)| format!("{category}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{counts}");
    Ok(())
}

fn itemset_table(title: &str, itemsets: &[ItemsetFrequency]) {
    if itemsets.is_empty() {
        println!("No {title} found.");
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["Products", "Frequency", "Support %"]);
    for itemset in itemsets {
        table.add_row(vec![
            itemset.items.join(" + "),
            itemset.frequency.to_string(),
            format!("{:.1}", itemset.support),
        ]);
    }
    println!("{table}");
}

fn print_baskets(report: &AnalysisReport) {
    let stats = &report.baskets.stats;
    println!("{}", report.period_label);
    println!(
        "Transactions: {} | multi-item: {} ({:.1}%) | mean items: {:.1} | max items: {}",
        stats.total_transactions,
        stats.multi_item_transactions,
        stats.multi_item_pct,
        stats.mean_items,
        stats.max_items
    );
    itemset_table("pairs", &report.baskets.pairs);
    itemset_table("triples", &report.baskets.triples);
}

fn print_overview(analysis: &SalesAnalysis, report: &AnalysisReport, args: &OverviewArgs) {
    let locale = analysis.config().locale;
    let Some(overview) = &report.overview else {
        println!("No sales in {}.", report.period_label);
        return;
    };

    println!(
        "{}: {} units, busiest at {} {}:00 ({} units)",
        report.period_label,
        overview.total_quantity,
        locale.weekday_name(overview.peak.weekday),
        overview.peak.hour,
        overview.peak.quantity
    );

    let mut by_day = new_table();
    by_day.set_header(vec!["Weekday", "Units"]);
    for (weekday, units) in &overview.by_weekday {
        by_day.add_row(vec![locale.weekday_name(*weekday).to_string(), units.to_string()]);
    }
    println!("{by_day}");

    let mut by_hour = new_table();
    by_hour.set_header(vec!["Hour", "Units"]);
    for (hour, units) in &overview.by_hour {
        by_hour.add_row(vec![format!("{hour}:00"), units.to_string()]);
    }
    println!("{by_hour}");

    let mut ranking = new_table();
    ranking.set_header(vec!["#", "Product", "Units", "Share %"]);
    for (position, record) in report.bcg.ranked_by_quantity(Some(args.top)).iter().enumerate() {
        ranking.add_row(vec![
            (position + 1).to_string(),
            record.product.clone(),
            record.quantity.to_string(),
            format!("{:.2}", record.participation),
        ]);
    }
    println!("{ranking}");

    if let Some(product) = &args.product {
        match analysis.product_detail(report.period, product) {
            Some(detail) => {
                println!(
                    "{}: {} units, share {:.2}%, growth {:+.1}%",
                    detail.product, detail.total_quantity, detail.participation, detail.growth_rate
                );
                let mut daily = new_table();
                daily.set_header(vec!["Date", "Units"]);
                for (date, units) in &detail.daily {
                    daily.add_row(vec![date.to_string(), units.to_string()]);
                }
                println!("{daily}");
            }
            None => println!("No sales of '{}' in {}.", product, report.period_label),
        }
    }
}

fn print_special_date(analysis: &SalesAnalysis, args: &SpecialDateArgs) {
    let locale = analysis.config().locale;
    let Some(comparison) = analysis.special_date(args.date, args.baseline) else {
        println!("No sales on {}.", args.date);
        return;
    };

    let against = match comparison.baseline {
        ComparisonBaseline::SameWeekday => {
            format!("average {}", locale.weekday_name(chrono::Datelike::weekday(&args.date)))
        }
        ComparisonBaseline::OverallAverage => "overall average".to_string(),
    };
    println!(
        "{}: {} units vs {} {} units over {} days ({:+.1}%, {:+} units): {}",
        comparison.date,
        comparison.total_on_date,
        against,
        comparison.baseline_average,
        comparison.baseline_days,
        comparison.difference_pct,
        comparison.unit_difference(),
        comparison.activity
    );

    let mut table = new_table();
    table.set_header(vec!["Product", "Sold", "Daily average", "Difference", "Difference %"]);
    for row in comparison.top_gainers(args.top) {
        table.add_row(vec![
            row.product.clone(),
            row.quantity_on_date.to_string(),
            format!("{:.1}", row.daily_average),
            format!("{:+.1}", row.difference),
            format!("{:+.1}", row.difference_pct),
        ]);
    }
    println!("{table}");
}

fn export_report(report: &AnalysisReport, dir: &Path) -> Result<()> {
    let files = export_to_dir(
        dir,
        &report.bcg,
        &report.baskets.pairs,
        &report.baskets.triples,
    )?;
    let json_path = dir.join("report.json");
    fs::write(&json_path, to_json(report)?)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    info!(
        bcg = %files.bcg.display(),
        report = %json_path.display(),
        "export complete"
    );
    println!("Exported to {}", dir.display());
    Ok(())
}
