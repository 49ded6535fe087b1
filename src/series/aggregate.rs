use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeSet, HashMap},
    io::Read,
    path::Path,
};
use tracing::{info, warn};

/// Per-indicator aggregate: observed value bounds plus a
/// year → entity → value mapping.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SeriesRecord {
    pub min: f64,
    pub max: f64,
    pub values: HashMap<String, HashMap<String, f64>>,
}

impl SeriesRecord {
    fn new() -> Self {
        SeriesRecord {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            values: HashMap::new(),
        }
    }

    /// Widen the bounds and store the value. Last write wins for a
    /// repeated (period, entity) pair.
    fn observe(&mut self, period: &str, entity: &str, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.values
            .entry(period.to_string())
            .or_default()
            .insert(entity.to_string(), value);
    }
}

/// Stream the raw dataset and aggregate every required column into a
/// `SeriesRecord`. Rows missing either join key are skipped whole;
/// cells that fail numeric parsing are skipped individually. Columns
/// that never yield a valid value are dropped from the result, so the
/// infinity sentinels in a fresh record never reach the artifact.
pub fn aggregate<R: Read>(
    mut reader: csv::Reader<R>,
    required: &BTreeSet<String>,
    entity_column: &str,
    period_column: &str,
) -> Result<HashMap<String, SeriesRecord>> {
    // 1) Resolve header names to positions once, up front.
    let headers = reader.headers().context("reading CSV header row")?.clone();
    let entity_idx = headers.iter().position(|h| h == entity_column);
    let period_idx = headers.iter().position(|h| h == period_column);
    if entity_idx.is_none() {
        warn!(column = entity_column, "entity column missing from header; all rows will be skipped");
    }
    if period_idx.is_none() {
        warn!(column = period_column, "period column missing from header; all rows will be skipped");
    }

    // Required columns absent from the header are simply never
    // observed and fall out in the final prune.
    let targets: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| required.contains(*h))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut out: HashMap<String, SeriesRecord> = required
        .iter()
        .map(|c| (c.clone(), SeriesRecord::new()))
        .collect();

    // 2) Stream rows one record at a time, reusing the buffer.
    let mut record = csv::StringRecord::new();
    let mut rows: u64 = 0;
    while reader
        .read_record(&mut record)
        .context("reading CSV record")?
    {
        rows += 1;
        if rows % 10_000 == 0 {
            info!(rows, "processed rows");
        }

        let entity = entity_idx.and_then(|i| record.get(i)).unwrap_or("").trim();
        let period = period_idx.and_then(|i| record.get(i)).unwrap_or("").trim();
        if entity.is_empty() || period.is_empty() {
            continue;
        }

        for (idx, name) in &targets {
            let cell = record.get(*idx).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            let value = match cell.parse::<f64>() {
                Ok(v) => v,
                Err(_) => continue,
            };
            if let Some(rec) = out.get_mut(name) {
                rec.observe(period, entity, value);
            }
        }
    }
    info!(rows, "finished streaming raw dataset");

    // 3) Prune indicators that never saw a valid value.
    out.retain(|_, rec| !rec.values.is_empty());
    Ok(out)
}

/// Aggregate straight from a CSV file on disk.
pub fn aggregate_file<P: AsRef<Path>>(
    path: P,
    required: &BTreeSet<String>,
    entity_column: &str,
    period_column: &str,
) -> Result<HashMap<String, SeriesRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("raw dataset not found at {}", path.display());
    }
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    aggregate(reader, required, entity_column, period_column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(csv_text: &str, required: &[&str]) -> HashMap<String, SeriesRecord> {
        let required: BTreeSet<String> = required.iter().map(|s| s.to_string()).collect();
        let reader = csv::Reader::from_reader(Cursor::new(csv_text.to_string()));
        aggregate(reader, &required, "country_text_id", "year").unwrap()
    }

    #[test]
    fn last_write_wins_and_bounds_widen() {
        let data = "country_text_id,year,col_x\n\
                    USA,2000,0.5\n\
                    USA,2000,0.7\n";
        let out = run(data, &["col_x"]);
        let rec = &out["col_x"];
        assert_eq!(rec.values["2000"]["USA"], 0.7);
        assert_eq!(rec.min, 0.5);
        assert_eq!(rec.max, 0.7);
    }

    #[test]
    fn column_with_no_valid_values_is_dropped() {
        let data = "country_text_id,year,col_x,col_y\n\
                    USA,2000,0.5,not_a_number\n\
                    SWE,2001,1.5,\n";
        let out = run(data, &["col_x", "col_y", "col_missing"]);
        assert!(out.contains_key("col_x"));
        assert!(!out.contains_key("col_y"));
        assert!(!out.contains_key("col_missing"));
    }

    #[test]
    fn row_missing_period_is_skipped_entirely() {
        let data = "country_text_id,year,col_x\n\
                    USA,,0.5\n\
                    SWE,2001,0.25\n";
        let out = run(data, &["col_x"]);
        let rec = &out["col_x"];
        assert_eq!(rec.values.len(), 1);
        assert_eq!(rec.values["2001"]["SWE"], 0.25);
        assert_eq!(rec.min, 0.25);
    }

    #[test]
    fn row_missing_entity_is_skipped_entirely() {
        let data = "country_text_id,year,col_x\n\
                    ,2000,0.5\n";
        let out = run(data, &["col_x"]);
        assert!(out.is_empty());
    }

    #[test]
    fn bad_cell_does_not_discard_the_rest_of_the_row() {
        let data = "country_text_id,year,col_x,col_y\n\
                    USA,2000,oops,0.9\n";
        let out = run(data, &["col_x", "col_y"]);
        assert!(!out.contains_key("col_x"));
        assert_eq!(out["col_y"].values["2000"]["USA"], 0.9);
    }

    #[test]
    fn only_required_columns_are_aggregated() {
        let data = "country_text_id,year,col_x,col_other\n\
                    USA,2000,0.5,9.9\n";
        let out = run(data, &["col_x"]);
        assert_eq!(out.len(), 1);
        assert!(out.contains_key("col_x"));
    }
}
