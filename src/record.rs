//! Record normalizer: one flat table row into an [`AttributeRecord`].
//!
//! Values stay untyped strings here; typing happens in the triple builder.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ColumnNames;
use crate::error::{InputError, RecordError};

/// A raw input row: column header to cell text.
pub type RawRow = HashMap<String, String>;

/// One property of one asset, as exported from the building model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub global_id: String,
    pub name: String,
    pub entity_class: String,
    pub property_set: String,
    pub property: String,
    pub value: String,
}

/// Logical fields every record must carry, paired with their configured column.
fn required_fields(columns: &ColumnNames) -> [(&'static str, &str); 6] {
    [
        ("globalId", columns.global_id.as_str()),
        ("name", columns.name.as_str()),
        ("entityClass", columns.entity_class.as_str()),
        ("propertySetName", columns.property_set.as_str()),
        ("propertyName", columns.property.as_str()),
        ("value", columns.value.as_str()),
    ]
}

/// Normalize one raw row. `row_number` is 1-based over data rows and only used in errors.
pub fn normalize(
    row: &RawRow,
    columns: &ColumnNames,
    row_number: usize,
) -> Result<AttributeRecord, RecordError> {
    let take = |(field, column): (&'static str, &str)| {
        row.get(column).cloned().ok_or(RecordError::Malformed {
            row: row_number,
            field,
        })
    };
    let [global_id, name, entity_class, property_set, property, value] = required_fields(columns);
    let record = AttributeRecord {
        global_id: take(global_id)?,
        name: take(name)?,
        entity_class: take(entity_class)?,
        property_set: take(property_set)?,
        property: take(property)?,
        value: take(value)?,
    };

    if record.global_id.trim().is_empty() {
        return Err(RecordError::EmptyIdentifier { row: row_number });
    }
    Ok(record)
}

/// Records read from one table, plus the rows that were rejected.
#[derive(Debug, Default)]
pub struct RecordBatch {
    /// Accepted records, each with its 1-based data row number.
    pub records: Vec<(usize, AttributeRecord)>,
    pub rejected: Vec<RecordError>,
}

impl RecordBatch {
    pub fn rows_read(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

/// Read and normalize every data row of a CSV table.
///
/// A header that lacks a required column is fatal. Short rows are rejected
/// individually, or abort the whole read when `strict` is set.
pub fn read_records(path: &Path, columns: &ColumnNames, strict: bool) -> Result<RecordBatch, InputError> {
    let display = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(&display, e))?;

    let headers = reader.headers().map_err(|e| csv_error(&display, e))?.clone();
    let missing: Vec<&str> = required_fields(columns)
        .iter()
        .map(|(_, column)| *column)
        .filter(|column| !headers.iter().any(|h| h.trim() == *column))
        .collect();
    if !missing.is_empty() {
        return Err(InputError::MissingColumns {
            path: display,
            columns: missing.join(", "),
        });
    }

    let mut batch = RecordBatch::default();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|e| csv_error(&display, e))?;
        let raw: RawRow = headers
            .iter()
            .zip(row.iter())
            .map(|(h, cell)| (h.trim().to_string(), cell.to_string()))
            .collect();

        match normalize(&raw, columns, index + 1) {
            Ok(record) => batch.records.push((index + 1, record)),
            Err(err) => {
                tracing::warn!(row = index + 1, error = %err, "rejecting malformed record");
                batch.rejected.push(err);
            }
        }
    }

    if strict && !batch.rejected.is_empty() {
        let rejected = batch.rejected.len();
        let first = batch.rejected.swap_remove(0);
        return Err(InputError::StrictRejected {
            path: display,
            rejected,
            first: Box::new(first),
        });
    }

    tracing::info!(
        path = %path.display(),
        records = batch.records.len(),
        rejected = batch.rejected.len(),
        "read input table"
    );
    Ok(batch)
}

fn csv_error(path: &str, err: csv::Error) -> InputError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => InputError::Io {
            path: path.to_string(),
            source,
        },
        other => InputError::Csv {
            path: path.to_string(),
            message: format!("{other:?}"),
        },
    }
}
