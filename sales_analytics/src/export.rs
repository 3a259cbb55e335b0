//! CSV and JSON writers for analysis results

use crate::basket::ItemsetFrequency;
use crate::bcg::BcgMatrix;
use crate::error::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write the BCG table, one row per product
pub fn write_bcg_csv<W: Write>(matrix: &BcgMatrix, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["product", "quantity", "participation", "growth_rate", "category"])?;
    for record in &matrix.records {
        csv.write_record([
            record.product.clone(),
            record.quantity.to_string(),
            format!("{:.4}", record.participation),
            format!("{:.4}", record.growth_rate),
            record.category.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write pair or triple counts; items are joined with `" + "`
pub fn write_itemsets_csv<W: Write>(itemsets: &[ItemsetFrequency], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["items", "frequency", "support"])?;
    for itemset in itemsets {
        csv.write_record([
            itemset.items.join(" + "),
            itemset.frequency.to_string(),
            format!("{:.4}", itemset.support),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Pretty-printed JSON of any serializable result
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Files written by [`export_to_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub bcg: PathBuf,
    pub pairs: PathBuf,
    pub triples: PathBuf,
}

/// Write `bcg.csv`, `pairs.csv` and `triples.csv` into `dir`, creating it if needed
pub fn export_to_dir<P: AsRef<Path>>(
    dir: P,
    matrix: &BcgMatrix,
    pairs: &[ItemsetFrequency],
    triples: &[ItemsetFrequency],
) -> Result<ExportedFiles> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let files = ExportedFiles {
        bcg: dir.join("bcg.csv"),
        pairs: dir.join("pairs.csv"),
        triples: dir.join("triples.csv"),
    };
    write_bcg_csv(matrix, File::create(&files.bcg)?)?;
    write_itemsets_csv(pairs, File::create(&files.pairs)?)?;
    write_itemsets_csv(triples, File::create(&files.triples)?)?;

    info!(dir = %dir.display(), "exported analysis tables");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::BasketMiner;
    use crate::bcg::BcgAnalyzer;
    use crate::data::{SaleRecord, SalesTable};
    use crate::period::Period;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    fn sample() -> SalesTable {
        let at = |ts: &str| NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap();
        SalesTable::new(vec![
            SaleRecord::new(at("2024-01-01 10:00:00"), "A", 2),
            SaleRecord::new(at("2024-01-01 10:00:00"), "B", 1),
            SaleRecord::new(at("2024-01-02 10:00:00"), "A", 1),
        ])
    }

    #[test]
    fn test_write_bcg_csv() {
        let matrix = BcgAnalyzer::new().analyze_period(&sample(), Period::AllData);
        let mut buffer = Vec::new();
        write_bcg_csv(&matrix, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "product,quantity,participation,growth_rate,category");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("A,3,75.0000,"));
    }

    #[test]
    fn test_write_itemsets_csv() {
        let analysis = BasketMiner::new().mine(&sample());
        let mut buffer = Vec::new();
        write_itemsets_csv(&analysis.pairs, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "items,frequency,support\nA + B,1,100.0000\n");
    }

    #[test]
    fn test_export_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample();
        let matrix = BcgAnalyzer::new().analyze_period(&table, Period::AllData);
        let baskets = BasketMiner::new().mine(&table);

        let files = export_to_dir(dir.path().join("out"), &matrix, &baskets.pairs, &baskets.triples)
            .unwrap();
        assert!(files.bcg.exists());
        assert!(files.pairs.exists());
        let triples = fs::read_to_string(&files.triples).unwrap();
        assert_eq!(triples, "items,frequency,support\n");
    }

    #[test]
    fn test_to_json() {
        let matrix = BcgAnalyzer::new().analyze_period(&sample(), Period::AllData);
        let json = to_json(&matrix).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["records"][0]["product"], "A");
        assert!(json.contains('\n'));
    }
}
