use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use chrono::{Days, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, Column, ColumnData, Table, normalize_header};

/// Structural problems the loaders detect themselves, as opposed to
/// I/O and parse errors coming from the format crates.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("file contains no columns")]
    NoColumns,
    #[error("row {row} has {got} cells but the header has {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus string cells, column types inferred
/// * `.json`    – records orientation: `[{ "col": value, ... }, ...]`
/// * `.parquet` – flat Arrow columns (strings re-inferred as dates/numbers)
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

/// Make normalized headers unique: when `date` and `Date` both normalize
/// to `date`, the second column becomes `date_2`.  Name lookups on the
/// table resolve to the first match, so duplicates would otherwise
/// shadow each other.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
    headers
        .into_iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name;
            }
            let mut k = 2;
            loop {
                let candidate = format!("{name}_{k}");
                if seen.insert(candidate.clone()) {
                    return candidate;
                }
                k += 1;
            }
        })
        .collect()
}

/// Assemble a table from normalized headers and row-major raw cells.
/// All three loaders funnel through here so type inference and header
/// deduplication are uniform.
fn build_table(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Table> {
    if headers.is_empty() {
        bail!(LoadError::NoColumns);
    }
    let headers = dedupe_headers(headers);
    for (i, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            bail!(LoadError::RaggedRow {
                row: i,
                got: row.len(),
                expected: headers.len(),
            });
        }
    }

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let cells: Vec<CellValue> = rows.iter().map(|r| r[col_idx].clone()).collect();
            Column {
                name,
                data: ColumnData::infer(&cells),
            }
        })
        .collect();

    Ok(Table::new(columns))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// CSV layout: header row with column names, one record per data row.
/// Cell types are guessed per cell, then decided per column.
fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(CellValue::guess).collect());
    }

    build_table(headers, rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "date": "2022-01-05", "region": "North", "sales_amount": 120.5 },
///   ...
/// ]
/// ```
///
/// The header set is the union of keys across all records; records missing
/// a key get a null cell.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            let name = normalize_header(key);
            if !headers.contains(&name) {
                headers.push(name);
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for rec in records {
        // Already checked above: every record is an object.
        let obj = rec.as_object().unwrap();
        let row = headers
            .iter()
            .map(|name| {
                obj.iter()
                    .find(|(k, _)| normalize_header(k) == *name)
                    .map(|(_, v)| json_to_cell(v))
                    .unwrap_or(CellValue::Null)
            })
            .collect();
        rows.push(row);
    }

    build_table(headers, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::guess(s),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::Text(n.to_string()),
        },
        JsonValue::Bool(b) => CellValue::Text(b.to_string()),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns.
///
/// Supported Arrow types: Utf8/LargeUtf8, Int32/Int64, Float32/Float64,
/// Date32, Boolean.  Anything else is stringified and treated as text.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<CellValue>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if headers.is_empty() {
            headers = schema
                .fields()
                .iter()
                .map(|f| normalize_header(f.name()))
                .collect();
        }

        for row in 0..batch.num_rows() {
            let cells = (0..batch.num_columns())
                .map(|col| extract_cell(batch.column(col), row))
                .collect();
            rows.push(cells);
        }
    }

    if headers.is_empty() {
        bail!(LoadError::NoColumns);
    }
    build_table(headers, rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::guess(s.value(row))
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::guess(s.value(row))
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Number(arr.value(row) as f64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Number(arr.value(row) as f64)
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Number(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Number(arr.value(row))
        }
        DataType::Date32 => {
            let arr = col.as_any().downcast_ref::<Date32Array>().unwrap();
            match date32_to_naive(arr.value(row)) {
                Some(d) => CellValue::Date(d),
                None => CellValue::Null,
            }
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Text(arr.value(row).to_string())
        }
        _ => CellValue::Text(format!("{:?}", col.data_type())),
    }
}

/// Arrow Date32 is days since the Unix epoch.
fn date32_to_naive(days: i32) -> Option<NaiveDate> {
    let epoch = NaiveDate::default(); // 1970-01-01
    if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnType;

    #[test]
    fn csv_round_trip_with_inference() {
        let csv = "\
Date,Region,Sales Amount,Units Sold
2022-01-05,North,120.50,3
2022-01-06,South,80.25,1
2022-01-07,,99.00,2
";
        let table = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["date", "region", "sales_amount", "units_sold"]);
        assert_eq!(
            table.column("date").unwrap().data.column_type(),
            ColumnType::Date
        );
        assert_eq!(
            table.column("sales_amount").unwrap().data.column_type(),
            ColumnType::Numeric
        );
        assert_eq!(table.labels("region").unwrap()[2], None);
    }

    #[test]
    fn colliding_headers_are_deduplicated() {
        // "date" and "Date" normalize to the same name with different
        // inferred types; both columns must survive under distinct names.
        let csv = "\
date,Date,Sales Amount
2022-01-01,5,10.0
2022-01-02,7,20.0
";
        let table = read_csv(csv.as_bytes()).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["date", "date_2", "sales_amount"]);
        assert_eq!(
            table.column("date").unwrap().data.column_type(),
            ColumnType::Date
        );
        assert_eq!(
            table.column("date_2").unwrap().data.column_type(),
            ColumnType::Numeric
        );
        assert_eq!(
            table.numeric_column_names(),
            vec!["date_2", "sales_amount"]
        );
    }

    #[test]
    fn csv_header_only_is_a_valid_empty_table() {
        let table = read_csv("date,region,sales\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_names().count(), 3);
    }

    #[test]
    fn csv_without_columns_is_rejected() {
        let err = read_csv("".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no columns"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("sales.xlsx")).unwrap_err();
        assert!(err.to_string().contains("unsupported file extension"));
    }

    #[test]
    fn json_records_union_of_keys() {
        let dir = std::env::temp_dir().join("datalens_loader_json_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rows.json");
        std::fs::write(
            &path,
            r#"[
                {"date": "2022-01-05", "sales": 10.0},
                {"date": "2022-01-06", "sales": 20.0, "region": "North"}
            ]"#,
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.column("region").unwrap().data.labels(),
            vec![None, Some("North".to_string())]
        );
        assert_eq!(
            table.numeric("sales").unwrap(),
            &[Some(10.0), Some(20.0)][..]
        );
    }

    #[test]
    fn date32_conversion() {
        assert_eq!(
            date32_to_naive(0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert_eq!(
            date32_to_naive(19358),
            NaiveDate::from_ymd_opt(2023, 1, 1)
        );
        assert_eq!(
            date32_to_naive(-1),
            NaiveDate::from_ymd_opt(1969, 12, 31)
        );
    }
}
