use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{RawRecord, RawValue};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read the raw catalog rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; cells are text, `listed_in` usually a string-encoded list
/// * `.json`    – `[{ "title": ..., "listed_in": [...] }, ...]`
/// * `.parquet` – any mix of string / numeric / bool / list-of-string columns
///
/// Cells are kept loosely typed; canonicalisation happens in the normalizer.
pub fn load_file(path: &Path) -> Result<Vec<RawRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One row per record. Short rows are accepted; their trailing columns are
/// simply missing from the resulting [`RawRecord`].
fn load_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), csv_cell(value)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// CSV carries no types, so every non-empty cell stays text. Titles like
/// "007" must survive; years are parsed later by the normalizer.
fn csv_cell(s: &str) -> RawValue {
    if s.is_empty() {
        RawValue::Null
    } else {
        RawValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')` shape.
fn load_json(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<RawRecord> {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_raw(val)))
                .collect())
        })
        .collect()
}

fn json_to_raw(val: &JsonValue) -> RawValue {
    match val {
        JsonValue::String(s) => RawValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                RawValue::Float(f)
            } else {
                RawValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => RawValue::Bool(*b),
        JsonValue::Array(items) => RawValue::List(items.iter().map(json_to_raw).collect()),
        JsonValue::Null => RawValue::Null,
        other => RawValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load every column of every row group. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();

        for row in 0..batch.num_rows() {
            let record: RawRecord = names
                .iter()
                .enumerate()
                .map(|(col_idx, name)| {
                    (name.clone(), arrow_value(batch.column(col_idx).as_ref(), row))
                })
                .collect();
            rows.push(record);
        }
    }

    Ok(rows)
}

// -- Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn arrow_value(col: &dyn Array, row: usize) -> RawValue {
    if col.is_null(row) {
        return RawValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => RawValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RawValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => RawValue::Integer(i64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => RawValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => RawValue::Float(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => RawValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => RawValue::Bool(col.as_boolean().value(row)),
        DataType::List(_) => list_value(&col.as_list::<i32>().value(row)),
        DataType::LargeList(_) => list_value(&col.as_list::<i64>().value(row)),
        other => RawValue::String(format!("{other:?}")),
    }
}

fn list_value(values: &ArrayRef) -> RawValue {
    RawValue::List(
        (0..values.len())
            .map(|i| arrow_value(values.as_ref(), i))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Int64Array, ListBuilder, StringArray, StringBuilder};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    fn temp_with(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_cells_stay_text() {
        let file = temp_with(
            ".csv",
            "title,type,release_year,listed_in,country\n\
             Kota Factory,TV Show,2019,\"['TV Comedies', 'TV Dramas']\",India\n\
             Blank,Movie,bad,,\n\
             Short,Movie\n",
        );
        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["release_year"], RawValue::from("2019"));
        assert_eq!(
            rows[0]["listed_in"],
            RawValue::from("['TV Comedies', 'TV Dramas']")
        );
        assert_eq!(rows[1]["release_year"], RawValue::from("bad"));
        assert_eq!(rows[1]["listed_in"], RawValue::Null);
        assert!(!rows[2].contains_key("country"));
    }

    #[test]
    fn csv_numeric_looking_text_is_not_rewritten() {
        let file = temp_with(
            ".csv",
            "title,type,country,release_year,listed_in\n\
             007,Movie,UK,1962,Action\n\
             1.10,Movie,1e3,2001,Dramas\n",
        );
        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows[0]["title"], RawValue::from("007"));
        assert_eq!(rows[1]["title"], RawValue::from("1.10"));
        assert_eq!(rows[1]["country"], RawValue::from("1e3"));
    }

    #[test]
    fn json_arrays_become_lists() {
        let file = temp_with(
            ".json",
            r#"[{"title": "Dark", "release_year": 2017.0, "listed_in": ["Crime TV Shows", "TV Mysteries"]},
                {"title": null, "type": "Movie"}]"#,
        );
        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["release_year"], RawValue::Float(2017.0));
        assert_eq!(
            rows[0]["listed_in"],
            RawValue::List(vec![
                RawValue::from("Crime TV Shows"),
                RawValue::from("TV Mysteries")
            ])
        );
        assert_eq!(rows[1]["title"], RawValue::Null);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let file = temp_with(".json", r#"{"title": "x"}"#);
        assert!(load_file(file.path()).is_err());
        let file = temp_with(".json", "[1, 2]");
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn parquet_roundtrip_with_list_column() {
        let mut genres = ListBuilder::new(StringBuilder::new());
        genres.values().append_value("Dramas");
        genres.values().append_value("Thrillers");
        genres.append(true);
        genres.append(false);
        let genres = genres.finish();

        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, true),
            Field::new("release_year", DataType::Int64, true),
            Field::new(
                "listed_in",
                DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
                true,
            ),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Roma"), None])),
                Arc::new(Int64Array::from(vec![Some(2018), None])),
                Arc::new(genres),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.as_file().try_clone().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], RawValue::from("Roma"));
        assert_eq!(rows[0]["release_year"], RawValue::Integer(2018));
        assert_eq!(
            rows[0]["listed_in"],
            RawValue::List(vec![RawValue::from("Dramas"), RawValue::from("Thrillers")])
        );
        assert_eq!(rows[1]["title"], RawValue::Null);
        assert_eq!(rows[1]["listed_in"], RawValue::Null);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = temp_with(".xlsx", "whatever");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
