use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeListArray, ListArray, StringArray,
};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{IntensityProfile, MetadataValue, ProfileDataset, ProfileRecord};

/// Column holding the position axis.
pub const POSITION_COLUMN: &str = "position";
/// Column holding the intensity samples.
pub const INTENSITY_COLUMN: &str = "intensity";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset of intensity profiles from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – `position` and `intensity` list columns (recommended)
/// * `.json`    – `[{ "position": [...], "intensity": [...], ...meta }, ...]`
/// * `.csv`     – columns `position` and `intensity` holding semicolon-separated floats
pub fn load_file(path: &Path) -> Result<ProfileDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    info!(
        "loaded {} profile(s) with {} metadata column(s) from {}",
        dataset.len(),
        dataset.column_names.len(),
        path.display()
    );
    Ok(dataset)
}

fn record(
    position: Vec<f64>,
    intensity: Vec<f64>,
    metadata: BTreeMap<String, MetadataValue>,
    row: usize,
) -> Result<ProfileRecord> {
    let profile =
        IntensityProfile::new(position, intensity).with_context(|| format!("Row {row}"))?;
    Ok(ProfileRecord { profile, metadata })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "position": [-0.1, -0.0999, ...],
///     "intensity": [0.003, 0.004, ...],
///     "slit_um": 50,
///     "laser": "red"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ProfileDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;
    debug!("JSON file holds {} record(s)", rows.len());

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let position = json_array_to_f64(obj.get(POSITION_COLUMN), i, POSITION_COLUMN)?;
        let intensity = json_array_to_f64(obj.get(INTENSITY_COLUMN), i, INTENSITY_COLUMN)?;

        let metadata = obj
            .iter()
            .filter(|(key, _)| *key != POSITION_COLUMN && *key != INTENSITY_COLUMN)
            .map(|(key, val)| (key.clone(), json_to_metadata(val)))
            .collect();

        records.push(record(position, intensity, metadata, i)?);
    }

    Ok(ProfileDataset::from_records(records))
}

fn json_array_to_f64(val: Option<&JsonValue>, row: usize, col: &str) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .with_context(|| format!("Row {row}: missing or invalid '{col}' array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .with_context(|| format!("Row {row}, {col}[{j}]: not a number"))
        })
        .collect()
}

fn json_to_metadata(val: &JsonValue) -> MetadataValue {
    match val {
        JsonValue::String(s) => MetadataValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                MetadataValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                MetadataValue::Float(f)
            } else {
                MetadataValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => MetadataValue::Bool(*b),
        JsonValue::Null => MetadataValue::Null,
        other => MetadataValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, one profile per row.
/// `position` and `intensity` cells contain semicolon-separated floats:
///   `"-0.1;-0.0999;-0.0998"`, `"0.003;0.004;0.004"`
/// All other columns are treated as metadata.
fn load_csv(path: &Path) -> Result<ProfileDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let x_idx = headers
        .iter()
        .position(|h| h == POSITION_COLUMN)
        .context("CSV missing 'position' column")?;
    let y_idx = headers
        .iter()
        .position(|h| h == INTENSITY_COLUMN)
        .context("CSV missing 'intensity' column")?;
    debug!("CSV columns: {headers:?}");

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let position =
            parse_semicolon_floats(row.get(x_idx).unwrap_or(""), row_no, POSITION_COLUMN)?;
        let intensity =
            parse_semicolon_floats(row.get(y_idx).unwrap_or(""), row_no, INTENSITY_COLUMN)?;

        let metadata = row
            .iter()
            .enumerate()
            .filter(|(col_idx, _)| *col_idx != x_idx && *col_idx != y_idx)
            .map(|(col_idx, value)| (headers[col_idx].clone(), MetadataValue::guess(value)))
            .collect();

        records.push(record(position, intensity, metadata, row_no)?);
    }

    Ok(ProfileDataset::from_records(records))
}

fn parse_semicolon_floats(s: &str, row: usize, col: &str) -> Result<Vec<f64>> {
    s.split(';')
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<f64>()
                .with_context(|| format!("Row {row}, {col}[{j}]: '{tok}' is not a number"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of captures.
///
/// Expected schema:
/// - `position`: List<Float64> or LargeList<Float64>
/// - `intensity`: List<Float64> or LargeList<Float64>
/// - Any other columns are treated as metadata (strings, ints, floats, bools)
///
/// Null list items become NaN and are rejected at ingest.
fn load_parquet(path: &Path) -> Result<ProfileDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();
        debug!("parquet batch with {n_rows} row(s)");

        let x_idx = schema
            .index_of(POSITION_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'position' column"))?;
        let y_idx = schema
            .index_of(INTENSITY_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'intensity' column"))?;

        let x_col = batch.column(x_idx);
        let y_col = batch.column(y_idx);

        let meta_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != x_idx && *i != y_idx)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..n_rows {
            let position = extract_f64_list(x_col, row)
                .with_context(|| format!("Row {row}: failed to read 'position'"))?;
            let intensity = extract_f64_list(y_col, row)
                .with_context(|| format!("Row {row}: failed to read 'intensity'"))?;

            let mut metadata = BTreeMap::new();
            for (col_idx, col_name) in &meta_cols {
                let value = extract_metadata_value(batch.column(*col_idx), row)?;
                metadata.insert(col_name.clone(), value);
            }

            records.push(record(position, intensity, metadata, records.len())?);
        }
    }

    Ok(ProfileDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &Arc<dyn Array>, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values_array = match col.data_type() {
        DataType::List(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<ListArray>()
                .context("expected ListArray")?;
            list_arr.value(row)
        }
        DataType::LargeList(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<LargeListArray>()
                .context("expected LargeListArray")?;
            list_arr.value(row)
        }
        other => bail!("Expected List or LargeList column, got {other:?}"),
    };

    // Camera exports are often Float32
    if let Some(f64_arr) = values_array.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = values_array.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr
            .iter()
            .map(|v| v.map_or(f64::NAN, f64::from))
            .collect())
    } else {
        bail!(
            "List inner type is {:?}, expected Float64 or Float32",
            values_array.data_type()
        )
    }
}

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("column type {:?} does not match its array", col.data_type()))
}

/// Extract a single metadata value from an Arrow column at a given row.
fn extract_metadata_value(col: &Arc<dyn Array>, row: usize) -> Result<MetadataValue> {
    if col.is_null(row) {
        return Ok(MetadataValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => MetadataValue::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => MetadataValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => MetadataValue::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => MetadataValue::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => MetadataValue::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => MetadataValue::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => MetadataValue::Bool(downcast::<BooleanArray>(col)?.value(row)),
        other => MetadataValue::String(format!("{other:?}")),
    };
    Ok(value)
}
