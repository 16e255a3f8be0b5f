//! Writers for the joined dataset.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;
use xref_model::RunKey;

use crate::error::ExportError;
use crate::record::FlatRecord;

/// Output file for a run's joined data with the given extension.
pub fn joined_data_path(output_dir: &Path, run_key: &RunKey, extension: &str) -> PathBuf {
    output_dir.join(format!("{run_key}_joined_data.{extension}"))
}

/// Write records as a pretty-printed JSON array.
pub fn write_json(path: &Path, records: &[FlatRecord]) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| ExportError::Io {
        operation: "flush",
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write records as CSV, one column per field seen in any record.
///
/// Columns are sorted by name. Missing and null values are empty cells.
pub fn write_csv(path: &Path, records: &[FlatRecord]) -> Result<(), ExportError> {
    let columns: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();

    let csv_error = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_writer(create(path)?);
    writer.write_record(&columns).map_err(csv_error)?;
    for record in records {
        let row = columns
            .iter()
            .map(|column| record.get(*column).map(cell_text).unwrap_or_default());
        writer.write_record(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        operation: "flush",
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn create(path: &Path) -> Result<File, ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }
    File::create(path).map_err(|source| ExportError::Io {
        operation: "create",
        path: path.to_path_buf(),
        source,
    })
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
